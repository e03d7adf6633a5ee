//! Tile and edge-marking types, plus the JSON tile-set format.
//!
//! A tile set deserializes from a document such as
//! `{"id": "standard", "tiles": [{"north": "club_out", "east": "heart_out", ...}]}`.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, Result};
use crate::grid::CELLS;

/// Symbol family drawn on a tile edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

/// Whether the symbol on an edge points into the tile or out of it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    In,
    Out,
}

impl Polarity {
    pub fn opposite(self) -> Polarity {
        match self {
            Polarity::In => Polarity::Out,
            Polarity::Out => Polarity::In,
        }
    }
}

/// Marking on a single tile edge: a suit in one of two polarities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    ClubIn,
    ClubOut,
    DiamondIn,
    DiamondOut,
    HeartIn,
    HeartOut,
    SpadeIn,
    SpadeOut,
}

impl Side {
    pub const ALL: [Side; 8] = [
        Side::ClubIn,
        Side::ClubOut,
        Side::DiamondIn,
        Side::DiamondOut,
        Side::HeartIn,
        Side::HeartOut,
        Side::SpadeIn,
        Side::SpadeOut,
    ];

    pub fn new(suit: Suit, polarity: Polarity) -> Side {
        match (suit, polarity) {
            (Suit::Club, Polarity::In) => Side::ClubIn,
            (Suit::Club, Polarity::Out) => Side::ClubOut,
            (Suit::Diamond, Polarity::In) => Side::DiamondIn,
            (Suit::Diamond, Polarity::Out) => Side::DiamondOut,
            (Suit::Heart, Polarity::In) => Side::HeartIn,
            (Suit::Heart, Polarity::Out) => Side::HeartOut,
            (Suit::Spade, Polarity::In) => Side::SpadeIn,
            (Suit::Spade, Polarity::Out) => Side::SpadeOut,
        }
    }

    pub fn suit(self) -> Suit {
        match self {
            Side::ClubIn | Side::ClubOut => Suit::Club,
            Side::DiamondIn | Side::DiamondOut => Suit::Diamond,
            Side::HeartIn | Side::HeartOut => Suit::Heart,
            Side::SpadeIn | Side::SpadeOut => Suit::Spade,
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Side::ClubIn | Side::DiamondIn | Side::HeartIn | Side::SpadeIn => Polarity::In,
            Side::ClubOut | Side::DiamondOut | Side::HeartOut | Side::SpadeOut => Polarity::Out,
        }
    }

    /// The only marking this one is compatible with
    pub fn counterpart(self) -> Side {
        Side::new(self.suit(), self.polarity().opposite())
    }

    /// Two touching edges match iff they share a suit and differ in polarity.
    pub fn compatible(self, other: Side) -> bool {
        self.suit() == other.suit() && self.polarity() != other.polarity()
    }
}

/// Cardinal direction of a tile edge, numbered clockwise from north
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    pub fn clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    pub fn counter_clockwise(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    /// (row, col) offset of the neighbouring cell in this direction
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

/// Stable identity of a physical tile, independent of its markings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub usize);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A square tile with four edge markings and a rotation counter.
///
/// `sides` is always stored in the current rotated order, so `side()` is a
/// plain index. `orientation` counts clockwise quarter turns since
/// construction, modulo 4, and moves in lockstep with `sides`.
#[derive(Debug, Clone)]
pub struct Tile {
    id: TileId,
    order: usize,
    sides: [Side; 4],
    orientation: u8,
}

impl Tile {
    /// Create a tile from its sides in north, east, south, west order.
    pub fn new(id: TileId, order: usize, sides: [Side; 4]) -> Self {
        Self {
            id,
            order,
            sides,
            orientation: 0,
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    /// Catalog position, used only for stable ordering
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn side(&self, direction: Direction) -> Side {
        self.sides[direction.index()]
    }

    pub fn sides(&self) -> [Side; 4] {
        self.sides
    }

    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    /// Turn 90 degrees clockwise: the west edge becomes the north edge.
    pub fn rotate_clockwise(&mut self) {
        self.sides.rotate_right(1);
        self.orientation = (self.orientation + 1) % 4;
    }

    /// Turn 90 degrees counter-clockwise: the east edge becomes the north edge.
    pub fn rotate_counter_clockwise(&mut self) {
        self.sides.rotate_left(1);
        self.orientation = (self.orientation + 3) % 4;
    }

    /// Turn clockwise until the orientation counter reads `orientation % 4`.
    pub fn rotate_to(&mut self, orientation: u8) {
        let target = orientation % 4;
        while self.orientation != target {
            self.rotate_clockwise();
        }
    }

    pub fn reset_orientation(&mut self) {
        self.rotate_to(0);
    }

    /// Sides this tile would show after `turns` further clockwise turns
    pub fn rotated_sides(&self, turns: u8) -> [Side; 4] {
        let mut sides = self.sides;
        sides.rotate_right(usize::from(turns % 4));
        sides
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tile {}

impl std::hash::Hash for Tile {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One tile in a tile-set document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub north: Side,
    pub east: Side,
    pub south: Side,
    pub west: Side,
}

impl TileSpec {
    pub fn new(north: Side, east: Side, south: Side, west: Side) -> Self {
        Self {
            north,
            east,
            south,
            west,
        }
    }

    pub fn sides(&self) -> [Side; 4] {
        [self.north, self.east, self.south, self.west]
    }
}

/// A complete tile set for one puzzle instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub tiles: Vec<TileSpec>,
}

impl PuzzleConfig {
    /// The nine-piece card-suit catalog shipped with the game.
    pub fn standard() -> Self {
        use Side::{
            ClubIn, ClubOut, DiamondIn, DiamondOut, HeartIn, HeartOut, SpadeIn, SpadeOut,
        };

        Self {
            id: "standard".to_string(),
            title: "Card Suits".to_string(),
            tiles: vec![
                TileSpec::new(ClubOut, HeartOut, DiamondIn, ClubIn),
                TileSpec::new(SpadeOut, DiamondOut, SpadeIn, HeartIn),
                TileSpec::new(HeartOut, SpadeOut, SpadeIn, ClubIn),
                TileSpec::new(HeartOut, DiamondOut, ClubIn, ClubIn),
                TileSpec::new(SpadeOut, SpadeOut, HeartIn, ClubIn),
                TileSpec::new(HeartOut, DiamondOut, DiamondIn, HeartIn),
                TileSpec::new(SpadeOut, DiamondOut, HeartIn, DiamondIn),
                TileSpec::new(ClubOut, HeartOut, SpadeIn, HeartIn),
                TileSpec::new(DiamondOut, ClubOut, ClubIn, DiamondIn),
            ],
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| PuzzleError::ReadTileSet {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build the tiles, numbering ids and catalog order by position.
    pub fn build_tiles(&self) -> Result<Vec<Tile>> {
        if self.tiles.len() != CELLS {
            return Err(PuzzleError::InvalidTileSet(format!(
                "expected {} tiles, found {}",
                CELLS,
                self.tiles.len()
            )));
        }

        Ok(self
            .tiles
            .iter()
            .enumerate()
            .map(|(index, spec)| Tile::new(TileId(index), index, spec.sides()))
            .collect())
    }
}
