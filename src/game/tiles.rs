use rand::{seq::SliceRandom, Rng};

use crate::models::{Letter, TileId, TileRecord};

/// The bag of letter tiles for one session
#[derive(Debug, Clone)]
pub struct TilePool {
    tiles: Vec<TileRecord>,
}

impl TilePool {
    /// Deal `count` tiles for every `(letter, count)` entry, ids in creation order
    pub fn create(counts: &[(Letter, usize)]) -> Self {
        let tiles = counts
            .iter()
            .flat_map(|&(letter, count)| std::iter::repeat(letter).take(count))
            .enumerate()
            .map(|(id, letter)| TileRecord {
                id,
                letter,
                placed: false,
            })
            .collect();

        Self { tiles }
    }

    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: TileId) -> Option<&TileRecord> {
        self.tiles.get(id)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut TileRecord> {
        self.tiles.get_mut(id)
    }

    pub fn letter_of(&self, id: TileId) -> Option<Letter> {
        self.get(id).map(|t| t.letter)
    }

    /// Tiles still waiting to be played
    pub fn unplaced(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles.iter().filter(|t| !t.placed)
    }

    /// Return every tile to the unplaced state
    pub fn reset_all(&mut self) {
        for tile in &mut self.tiles {
            tile.placed = false;
        }
    }

    /// Random ordering of tile ids for scattering tiles around the board.
    /// Purely cosmetic: game state does not depend on it.
    pub fn scatter_order(&self, rng: &mut impl Rng) -> Vec<TileId> {
        let mut ids: Vec<TileId> = self.tiles.iter().map(|t| t.id).collect();
        ids.shuffle(rng);
        ids
    }
}
