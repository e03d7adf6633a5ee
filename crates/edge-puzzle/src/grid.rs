//! The 3x3 board of tile placements.
//!
//! The grid records which tile sits in which cell but never owns the tiles;
//! edge lookups go through a [`TilePool`]. Coordinates are signed so callers
//! can ask about positions just off the board, which simply never fit.

use log::{debug, warn};

use crate::error::{PuzzleError, Result};
use crate::holder::TilePool;
use crate::puzzle::{Direction, Tile, TileId};

pub const ROWS: usize = 3;
pub const COLS: usize = 3;
pub const CELLS: usize = ROWS * COLS;

/// Flat row-major index of a cell, or `None` when off the board
fn cell_index(row: i32, col: i32) -> Option<usize> {
    let row = usize::try_from(row).ok()?;
    let col = usize::try_from(col).ok()?;
    (row < ROWS && col < COLS).then_some(row * COLS + col)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: [Option<TileId>; CELLS],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (ROWS, COLS)
    }

    /// Tile id at a cell (bounds-checked)
    pub fn tile_at(&self, row: i32, col: i32) -> Option<TileId> {
        cell_index(row, col).and_then(|index| self.cells[index])
    }

    /// Whether `tile`, at its current rotation, can go into an empty cell.
    ///
    /// Every occupied neighbour is checked, not just north and west, since
    /// interactive placement happens in any order.
    pub fn fits<P: TilePool + ?Sized>(&self, pool: &P, tile: &Tile, row: i32, col: i32) -> bool {
        let Some(index) = cell_index(row, col) else {
            return false;
        };
        if self.cells[index].is_some() {
            return false;
        }

        Direction::ALL.iter().all(|&direction| {
            let (dr, dc) = direction.delta();
            match self.tile_at(row + dr, col + dc) {
                None => true,
                Some(id) => pool.tile(id).is_some_and(|neighbour| {
                    tile.side(direction)
                        .compatible(neighbour.side(direction.opposite()))
                }),
            }
        })
    }

    /// Record `tile` in an empty cell without checking edge compatibility.
    ///
    /// Returns `Ok(false)` and does nothing for off-board coordinates.
    /// Placing into an occupied cell, or placing a tile that already sits
    /// elsewhere on the grid, is a caller bug and reported as an error.
    pub fn place(&mut self, tile: TileId, row: i32, col: i32) -> Result<bool> {
        let Some(index) = cell_index(row, col) else {
            return Ok(false);
        };

        if let Some(occupant) = self.cells[index] {
            warn!("Refusing to place {tile} on occupied cell ({row}, {col})");
            return Err(PuzzleError::CellOccupied {
                row: index / COLS,
                col: index % COLS,
                occupant,
            });
        }
        if let Some((r, c)) = self.position_of(tile) {
            warn!("Refusing to place {tile} twice; it is already at ({r}, {c})");
            return Err(PuzzleError::AlreadyPlaced { tile, row: r, col: c });
        }

        self.cells[index] = Some(tile);
        debug!("Placed {tile} at ({row}, {col})");
        Ok(true)
    }

    /// Clear a cell, returning whatever was there.
    pub fn remove(&mut self, row: i32, col: i32) -> Option<TileId> {
        let index = cell_index(row, col)?;
        let removed = self.cells[index].take();
        if let Some(tile) = removed {
            debug!("Removed {tile} from ({row}, {col})");
        }
        removed
    }

    /// Empty every cell, handing each removed tile back to the pool.
    pub fn reset<P: TilePool + ?Sized>(&mut self, pool: &mut P) -> Vec<TileId> {
        let returned: Vec<TileId> = self.cells.iter_mut().filter_map(Option::take).collect();
        for &tile in &returned {
            pool.give_back(tile);
        }
        debug!("Reset grid, returned {} tiles", returned.len());
        returned
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Occupied cells as (row, col, tile), row-major
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, TileId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|tile| (index / COLS, index % COLS, tile)))
    }

    pub fn position_of(&self, tile: TileId) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|cell| *cell == Some(tile))
            .map(|index| (index / COLS, index % COLS))
    }

    /// Full occupancy with every touching pair of edges compatible.
    ///
    /// Recomputed from the current tile rotations on every call.
    pub fn is_solved<P: TilePool + ?Sized>(&self, pool: &P) -> bool {
        if !self.is_full() {
            return false;
        }

        let side_of = |row: usize, col: usize, direction: Direction| {
            self.cells[row * COLS + col]
                .and_then(|id| pool.tile(id))
                .map(|tile| tile.side(direction))
        };

        for row in 0..ROWS {
            for col in 0..COLS {
                if col + 1 < COLS {
                    match (
                        side_of(row, col, Direction::East),
                        side_of(row, col + 1, Direction::West),
                    ) {
                        (Some(east), Some(west)) if east.compatible(west) => {}
                        _ => return false,
                    }
                }
                if row + 1 < ROWS {
                    match (
                        side_of(row, col, Direction::South),
                        side_of(row + 1, col, Direction::North),
                    ) {
                        (Some(south), Some(north)) if south.compatible(north) => {}
                        _ => return false,
                    }
                }
            }
        }
        true
    }
}
