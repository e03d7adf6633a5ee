//! Edge-matching tile puzzle engine.
//!
//! Nine square tiles carry a card-suit marking on each edge and must be laid
//! on a 3x3 board so that every pair of touching edges shows the same suit in
//! opposite polarity. This crate provides the tile model, the board with its
//! fit checks, and a backtracking solver that finds and lays out a full
//! arrangement.

pub mod board;
pub mod error;
pub mod grid;
pub mod holder;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use board::Board;
pub use error::{PuzzleError, Result};
pub use grid::{Grid, CELLS, COLS, ROWS};
pub use holder::{Holder, TilePool};
pub use puzzle::{Direction, Polarity, PuzzleConfig, Side, Suit, Tile, TileId, TileSpec};
pub use solver::{
    commit, find_solution, find_solutions, solve, Placement, Solution, SolverConfig, SolverResult,
};
