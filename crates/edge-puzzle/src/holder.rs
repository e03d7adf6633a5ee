//! Tile storage and the off-board holding area.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::puzzle::{PuzzleConfig, Tile, TileId};

/// Owner of the tiles a [`Grid`](crate::grid::Grid) refers to.
///
/// The grid only stores ids. It asks the pool for edge data, and hands
/// tiles back through `give_back` when they leave the board.
pub trait TilePool {
    fn tile(&self, id: TileId) -> Option<&Tile>;

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile>;

    /// Every tile regardless of location, in catalog order
    fn ids(&self) -> Vec<TileId>;

    /// A tile left the holding area for the board
    fn take(&mut self, id: TileId);

    /// A tile came back from the board
    fn give_back(&mut self, id: TileId);
}

/// The tile set plus the ordered list of tiles currently off the board.
#[derive(Debug, Clone)]
pub struct Holder {
    tiles: Vec<Tile>,
    held: Vec<TileId>,
}

impl Holder {
    /// Start with every tile held, in the order given.
    pub fn new(tiles: Vec<Tile>) -> Self {
        let held = tiles.iter().map(Tile::id).collect();
        Self { tiles, held }
    }

    pub fn from_config(config: &PuzzleConfig) -> Result<Self> {
        Ok(Self::new(config.build_tiles()?))
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Ids of tiles currently off the board, in display order
    pub fn held(&self) -> &[TileId] {
        &self.held
    }

    pub fn is_held(&self, id: TileId) -> bool {
        self.held.contains(&id)
    }

    /// Whether every tile is back in the holding area
    pub fn is_full(&self) -> bool {
        self.held.len() == self.tiles.len()
    }

    /// Order held tiles by catalog position.
    pub fn sort(&mut self) {
        let tiles = &self.tiles;
        self.held.sort_by_key(|id| {
            tiles
                .iter()
                .find(|tile| tile.id() == *id)
                .map_or(usize::MAX, Tile::order)
        });
    }

    /// Turn every held tile back to orientation 0 and sort them.
    pub fn restore(&mut self) {
        for id in self.held.clone() {
            if let Some(tile) = self.tile_mut(id) {
                tile.reset_orientation();
            }
        }
        self.sort();
    }

    /// Shuffle the held tiles and give each a random number of quarter turns.
    pub fn scramble<R: Rng>(&mut self, rng: &mut R) {
        self.held.shuffle(rng);
        for id in self.held.clone() {
            let turns = rng.gen_range(0..4u8);
            if let Some(tile) = self.tile_mut(id) {
                for _ in 0..turns {
                    tile.rotate_clockwise();
                }
            }
        }
        debug!("Scrambled {} held tiles", self.held.len());
    }
}

impl TilePool for Holder {
    fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id() == id)
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|tile| tile.id() == id)
    }

    fn ids(&self) -> Vec<TileId> {
        let mut tiles: Vec<&Tile> = self.tiles.iter().collect();
        tiles.sort_by_key(|tile| (tile.order(), tile.id()));
        tiles.into_iter().map(Tile::id).collect()
    }

    fn take(&mut self, id: TileId) {
        self.held.retain(|held| *held != id);
    }

    fn give_back(&mut self, id: TileId) {
        if self.tile(id).is_some() && !self.is_held(id) {
            self.held.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn standard_holder() -> Holder {
        Holder::from_config(&PuzzleConfig::standard()).unwrap()
    }

    #[test]
    fn test_take_and_give_back() {
        let mut holder = standard_holder();
        holder.take(TileId(3));
        holder.take(TileId(3));

        assert_eq!(holder.held().len(), 8);
        assert!(!holder.is_held(TileId(3)));
        assert!(!holder.is_full());

        holder.give_back(TileId(3));
        holder.give_back(TileId(3));
        holder.give_back(TileId(42));

        assert!(holder.is_full());
        assert_eq!(holder.held().last(), Some(&TileId(3)));
    }

    #[test]
    fn test_sort_restores_catalog_order() {
        let mut holder = standard_holder();
        holder.take(TileId(0));
        holder.give_back(TileId(0));
        holder.sort();

        let expected: Vec<TileId> = (0..9).map(TileId).collect();
        assert_eq!(holder.held(), expected.as_slice());
        assert_eq!(holder.ids(), expected);
    }

    #[test]
    fn test_scramble_is_deterministic_and_restorable() {
        let mut first = standard_holder();
        let mut second = standard_holder();
        first.scramble(&mut ChaCha8Rng::seed_from_u64(7));
        second.scramble(&mut ChaCha8Rng::seed_from_u64(7));

        assert_eq!(first.held(), second.held());
        for (a, b) in first.tiles().iter().zip(second.tiles()) {
            assert_eq!(a.orientation(), b.orientation());
        }

        first.restore();
        let pristine = standard_holder();
        for (a, b) in first.tiles().iter().zip(pristine.tiles()) {
            assert_eq!(a.orientation(), 0);
            assert_eq!(a.sides(), b.sides());
        }
        assert_eq!(first.held(), pristine.held());
    }
}
