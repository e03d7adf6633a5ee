//! Error types for board operations and tile-set loading.

use std::{io, path::PathBuf};
use thiserror::Error;

use crate::puzzle::TileId;

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error("Cell ({row}, {col}) is already occupied by tile {occupant}")]
    CellOccupied {
        row: usize,
        col: usize,
        occupant: TileId,
    },

    #[error("Tile {tile} is already placed at ({row}, {col})")]
    AlreadyPlaced { tile: TileId, row: usize, col: usize },

    #[error("Tile {0} is not part of this puzzle")]
    UnknownTile(TileId),

    #[error("No arrangement of the {tiles} tiles solves the board")]
    Unsolvable { tiles: usize },

    #[error("Invalid tile set: {0}")]
    InvalidTileSet(String),

    #[error("Failed to read tile set {path}")]
    ReadTileSet {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;
