//! A grid together with the pool that owns its tiles.
//!
//! This is the surface a front end drives: it keeps the holding area in
//! step with the grid so that every tile is either held or on the board.

use log::debug;

use crate::error::{PuzzleError, Result};
use crate::grid::Grid;
use crate::holder::{Holder, TilePool};
use crate::puzzle::{PuzzleConfig, Tile, TileId};
use crate::solver::{self, Solution, SolverResult};

#[derive(Debug, Clone)]
pub struct Board<P: TilePool = Holder> {
    grid: Grid,
    pool: P,
}

impl Board<Holder> {
    pub fn from_config(config: &PuzzleConfig) -> Result<Self> {
        Ok(Self::new(Holder::from_config(config)?))
    }

    /// Empty board with the built-in catalog in the holding area
    pub fn standard() -> Result<Self> {
        Self::from_config(&PuzzleConfig::standard())
    }
}

impl<P: TilePool> Board<P> {
    pub fn new(pool: P) -> Self {
        Self {
            grid: Grid::new(),
            pool,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut P {
        &mut self.pool
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }

    pub fn tile(&self, id: TileId) -> Result<&Tile> {
        self.pool.tile(id).ok_or(PuzzleError::UnknownTile(id))
    }

    /// The tile occupying a cell, if any
    pub fn tile_at(&self, row: i32, col: i32) -> Option<&Tile> {
        self.grid.tile_at(row, col).and_then(|id| self.pool.tile(id))
    }

    /// Whether the tile fits the cell at its current rotation.
    ///
    /// Unknown tiles never fit.
    pub fn fits(&self, id: TileId, row: i32, col: i32) -> bool {
        self.pool
            .tile(id)
            .is_some_and(|tile| self.grid.fits(&self.pool, tile, row, col))
    }

    /// Move a tile from the holding area onto the board without a fit check.
    pub fn place(&mut self, id: TileId, row: i32, col: i32) -> Result<bool> {
        self.tile(id)?;
        let placed = self.grid.place(id, row, col)?;
        if placed {
            self.pool.take(id);
        }
        Ok(placed)
    }

    /// Place the tile only if it fits; returns whether it went down.
    pub fn try_place(&mut self, id: TileId, row: i32, col: i32) -> Result<bool> {
        if !self.fits(id, row, col) {
            debug!("{id} does not fit at ({row}, {col})");
            return Ok(false);
        }
        self.place(id, row, col)
    }

    /// Lift a tile off the board back into the holding area.
    pub fn remove(&mut self, row: i32, col: i32) -> Option<TileId> {
        let removed = self.grid.remove(row, col)?;
        self.pool.give_back(removed);
        Some(removed)
    }

    pub fn reset(&mut self) -> Vec<TileId> {
        self.grid.reset(&mut self.pool)
    }

    pub fn is_solved(&self) -> bool {
        self.grid.is_solved(&self.pool)
    }

    pub fn solve(&mut self) -> Result<SolverResult> {
        solver::solve(&mut self.grid, &mut self.pool)
    }

    /// Lay out a solution found earlier with [`solver::find_solutions`].
    pub fn commit(&mut self, solution: &Solution) -> Result<()> {
        solver::commit(&mut self.grid, &mut self.pool, solution)
    }

    pub fn rotate_clockwise(&mut self, id: TileId) -> Result<()> {
        self.pool
            .tile_mut(id)
            .ok_or(PuzzleError::UnknownTile(id))?
            .rotate_clockwise();
        Ok(())
    }

    pub fn rotate_counter_clockwise(&mut self, id: TileId) -> Result<()> {
        self.pool
            .tile_mut(id)
            .ok_or(PuzzleError::UnknownTile(id))?
            .rotate_counter_clockwise();
        Ok(())
    }
}
