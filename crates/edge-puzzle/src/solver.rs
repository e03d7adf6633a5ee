//! Backtracking solver for the 3x3 board.
//!
//! Cells are filled in row-major order. At each cell every unused tile is
//! tried in catalog order, and for each tile the rotations 0 to 3. A candidate
//! only has to match the tile above it and the tile to its left, because the
//! cells east and south of it are always still empty in this scan order.
//!
//! The search runs over a read-only snapshot of the tile edges, so the pool
//! and grid are untouched until a solution is committed.

use std::collections::HashSet;
use std::time::Instant;

use log::{debug, info};
use serde::Serialize;
use smallvec::SmallVec;

use crate::error::{PuzzleError, Result};
use crate::grid::{Grid, CELLS, COLS, ROWS};
use crate::holder::TilePool;
use crate::puzzle::{Direction, Side, TileId};

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Stop after this many solutions (`None` enumerates all of them)
    pub max_solutions: Option<usize>,
}

impl SolverConfig {
    /// Stop at the first solution
    pub fn first() -> Self {
        Self {
            max_solutions: Some(1),
        }
    }
}

/// Where one tile goes, and the orientation it must have there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub tile: TileId,
    /// Target orientation counter, 0 to 3
    pub orientation: u8,
}

/// A complete arrangement, one placement per cell in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    cells: [Placement; CELLS],
}

impl Solution {
    pub fn placement(&self, row: usize, col: usize) -> Option<Placement> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        self.cells.get(row * COLS + col).copied()
    }

    /// Placements as (row, col, placement), row-major
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Placement)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, placement)| (index / COLS, index % COLS, *placement))
    }
}

/// Result of the solver search
#[derive(Debug, Clone, Default)]
pub struct SolverResult {
    /// Solutions in the order they were found
    pub solutions: Vec<Solution>,
    /// Whether the search space was fully exhausted
    pub search_exhausted: bool,
    /// Number of (tile, rotation) candidates accepted at some cell
    pub nodes_visited: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    pub fn first(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    pub fn is_solved(&self) -> bool {
        !self.solutions.is_empty()
    }
}

/// Snapshot of one tile's edges under each of the four extra rotations
#[derive(Debug, Clone)]
struct Candidate {
    id: TileId,
    /// Orientation counter of the tile when the snapshot was taken
    orientation: u8,
    rotations: [[Side; 4]; 4],
}

impl Candidate {
    fn side(&self, turns: u8, direction: Direction) -> Side {
        self.rotations[usize::from(turns)][direction.index()]
    }
}

/// A choice made for the cell at the same depth in the stack
#[derive(Debug, Clone, Copy)]
struct SearchFrame {
    candidate: usize,
    turns: u8,
}

impl SearchFrame {
    /// The choice tried right after this one at the same cell
    fn successor(self) -> (usize, u8) {
        if self.turns < 3 {
            (self.candidate, self.turns + 1)
        } else {
            (self.candidate + 1, 0)
        }
    }
}

fn first_duplicate(ids: impl IntoIterator<Item = TileId>) -> Option<TileId> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

fn snapshot<P: TilePool + ?Sized>(pool: &P) -> Result<Vec<Candidate>> {
    let ids = pool.ids();
    if ids.len() != CELLS {
        return Err(PuzzleError::InvalidTileSet(format!(
            "expected {} tiles, found {}",
            CELLS,
            ids.len()
        )));
    }
    if let Some(duplicate) = first_duplicate(ids.iter().copied()) {
        return Err(PuzzleError::InvalidTileSet(format!(
            "tile {duplicate} appears more than once"
        )));
    }

    ids.into_iter()
        .map(|id| {
            let tile = pool.tile(id).ok_or(PuzzleError::UnknownTile(id))?;
            Ok(Candidate {
                id,
                orientation: tile.orientation(),
                rotations: [0, 1, 2, 3].map(|turns| tile.rotated_sides(turns)),
            })
        })
        .collect()
}

/// Whether a candidate matches the already-filled cells above and to the left.
fn accepts(candidates: &[Candidate], stack: &[SearchFrame], candidate: usize, turns: u8) -> bool {
    let cell = stack.len();
    let tile = &candidates[candidate];

    if cell >= COLS {
        let above = stack[cell - COLS];
        let south = candidates[above.candidate].side(above.turns, Direction::South);
        if !south.compatible(tile.side(turns, Direction::North)) {
            return false;
        }
    }
    if cell % COLS != 0 {
        let left = stack[cell - 1];
        let east = candidates[left.candidate].side(left.turns, Direction::East);
        if !east.compatible(tile.side(turns, Direction::West)) {
            return false;
        }
    }
    true
}

/// Next acceptable (candidate, turns) at the current cell, starting at `from`.
fn next_choice(
    candidates: &[Candidate],
    stack: &[SearchFrame],
    used: u16,
    from: (usize, u8),
) -> Option<SearchFrame> {
    let (start_candidate, start_turns) = from;
    for candidate in start_candidate..candidates.len() {
        if used & (1 << candidate) != 0 {
            continue;
        }
        let first_turn = if candidate == start_candidate {
            start_turns
        } else {
            0
        };
        for turns in first_turn..4 {
            if accepts(candidates, stack, candidate, turns) {
                return Some(SearchFrame { candidate, turns });
            }
        }
    }
    None
}

fn to_solution(candidates: &[Candidate], stack: &[SearchFrame]) -> Solution {
    let mut cells = [Placement {
        tile: TileId(0),
        orientation: 0,
    }; CELLS];
    for (cell, frame) in cells.iter_mut().zip(stack) {
        let candidate = &candidates[frame.candidate];
        *cell = Placement {
            tile: candidate.id,
            orientation: (candidate.orientation + frame.turns) % 4,
        };
    }
    Solution { cells }
}

/// Search for arrangements of the pool's tiles without changing anything.
///
/// Deterministic: the same tiles in the same rotations always produce the
/// same solutions in the same order.
pub fn find_solutions<P: TilePool + ?Sized>(pool: &P, config: &SolverConfig) -> Result<SolverResult> {
    let start_time = Instant::now();
    let candidates = snapshot(pool)?;
    let limit = config.max_solutions.unwrap_or(usize::MAX);

    let mut result = SolverResult::default();
    if limit == 0 {
        result.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
        return Ok(result);
    }

    // Depth of the stack is the index of the cell being filled.
    let mut stack: SmallVec<[SearchFrame; CELLS]> = SmallVec::new();
    let mut used: u16 = 0;
    let mut cursor = (0usize, 0u8);

    loop {
        if stack.len() == CELLS {
            result.solutions.push(to_solution(&candidates, &stack));
            debug!(
                "Solution {} found after {} nodes",
                result.solutions.len(),
                result.nodes_visited
            );
            if result.solutions.len() >= limit {
                break;
            }
        } else if let Some(frame) = next_choice(&candidates, &stack, used, cursor) {
            result.nodes_visited += 1;
            used |= 1 << frame.candidate;
            stack.push(frame);
            cursor = (0, 0);
            continue;
        }

        // Backtrack: undo the last choice and resume after it.
        match stack.pop() {
            Some(frame) => {
                used &= !(1 << frame.candidate);
                cursor = frame.successor();
            }
            None => {
                result.search_exhausted = true;
                break;
            }
        }
    }

    result.time_elapsed_ms = start_time.elapsed().as_millis() as u64;
    debug!(
        "Search finished: {} solutions, {} nodes, exhausted={}",
        result.solutions.len(),
        result.nodes_visited,
        result.search_exhausted
    );
    Ok(result)
}

/// Find the first arrangement in search order.
pub fn find_solution<P: TilePool + ?Sized>(pool: &P) -> Result<SolverResult> {
    find_solutions(pool, &SolverConfig::first())
}

/// Write a solution into the grid.
///
/// Whatever was on the board goes back to the pool first, then every tile is
/// set to its target orientation and placed. Every placement is checked up
/// front, so an invalid solution leaves the grid and pool untouched.
pub fn commit<P: TilePool + ?Sized>(grid: &mut Grid, pool: &mut P, solution: &Solution) -> Result<()> {
    for placement in &solution.cells {
        if pool.tile(placement.tile).is_none() {
            return Err(PuzzleError::UnknownTile(placement.tile));
        }
    }
    if let Some(duplicate) = first_duplicate(solution.cells.iter().map(|p| p.tile)) {
        return Err(PuzzleError::InvalidTileSet(format!(
            "tile {duplicate} is placed more than once"
        )));
    }

    grid.reset(pool);
    for (row, col, placement) in solution.iter() {
        if let Some(tile) = pool.tile_mut(placement.tile) {
            tile.rotate_to(placement.orientation);
        }
        pool.take(placement.tile);
        grid.place(placement.tile, row as i32, col as i32)?;
    }
    Ok(())
}

/// Solve the board in place.
///
/// On failure the grid and every tile rotation are left as they were.
pub fn solve<P: TilePool + ?Sized>(grid: &mut Grid, pool: &mut P) -> Result<SolverResult> {
    let result = find_solution(pool)?;
    let Some(solution) = result.first() else {
        info!(
            "No solution after {} nodes in {}ms",
            result.nodes_visited, result.time_elapsed_ms
        );
        return Err(PuzzleError::Unsolvable { tiles: CELLS });
    };

    commit(grid, pool, solution)?;
    info!(
        "Solved after {} nodes in {}ms",
        result.nodes_visited, result.time_elapsed_ms
    );
    Ok(result)
}
