//! In-memory world for hosts without a live world handle, and for tests

use std::collections::HashMap;

use super::{BlockAccessor, BlockPosition};
use crate::block::{BlockIdentity, BlockState, NamespacedKey};
use crate::constants::keys::DEFAULT_NAMESPACE;

/// Sparse block map with vertical world bounds
///
/// Positions never set read back as `minecraft:air`.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    blocks: HashMap<BlockPosition, BlockState>,
    min_y: i32,
    max_y: i32,
    air: BlockState,
}

impl WorldSnapshot {
    /// Empty world spanning `min_y..=max_y`
    pub fn new(min_y: i32, max_y: i32) -> Self {
        let air = BlockState::new(BlockIdentity::of(NamespacedKey::from_parts_unchecked(
            DEFAULT_NAMESPACE,
            "air",
        )));

        Self {
            blocks: HashMap::new(),
            min_y,
            max_y,
            air,
        }
    }

    pub fn set(&mut self, pos: BlockPosition, state: BlockState) {
        self.blocks.insert(pos, state);
    }

    /// Builder-style `set`
    pub fn with(mut self, pos: BlockPosition, state: BlockState) -> Self {
        self.set(pos, state);
        self
    }

    pub fn remove(&mut self, pos: BlockPosition) -> Option<BlockState> {
        self.blocks.remove(&pos)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl BlockAccessor for WorldSnapshot {
    fn block_at(&self, pos: BlockPosition) -> BlockState {
        self.blocks.get(&pos).cloned().unwrap_or_else(|| self.air.clone())
    }

    fn is_within_bounds(&self, pos: BlockPosition) -> bool {
        pos.y >= self.min_y && pos.y <= self.max_y
    }
}
