//! In-memory install size cache

use crate::GameId;
use std::collections::HashMap;

/// Previously computed install sizes, keyed by game. Not persisted.
#[derive(Debug, Default)]
pub struct InstallSizeCache {
    sizes: HashMap<GameId, u64>,
}

impl InstallSizeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &GameId) -> Option<u64> {
        self.sizes.get(id).copied()
    }

    pub fn insert(&mut self, id: GameId, size: u64) {
        self.sizes.insert(id, size);
    }

    /// Forget a game's size; returns whether one was cached
    pub fn invalidate(&mut self, id: &GameId) -> bool {
        self.sizes.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.sizes.clear();
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
