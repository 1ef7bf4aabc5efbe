//! Vein allocation: the pattern contract and the built-in patterns
//!
//! A pattern decides which positions around a broken block belong to one
//! vein-mine operation. Patterns are stateless and only read the world through
//! a [`BlockAccessor`], so one instance can serve any number of concurrent
//! allocations.
//!
//! # Built-in patterns
//!
//! - **Flood fill** (`veinminer:default`): breadth-first through connected
//!   vein blocks
//! - **Layer** (`veinminer:layer`): flood fill confined to the origin's Y plane
//! - **Tube** (`veinminer:tube_x|y|z`): flood fill confined to one axis line

mod flood_fill;
mod layer;
mod position;
mod registry;
mod tube;
mod world_snapshot;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::block::{BlockList, BlockState};
use crate::constants::allocation::{DEFAULT_MAX_VEIN_SIZE, UNBOUNDED};

pub use flood_fill::FloodFillPattern;
pub use layer::LayerPattern;
pub use position::{Axis, BlockPosition, Connectivity};
pub use registry::PatternRegistry;
pub use tube::TubePattern;
pub use world_snapshot::WorldSnapshot;

/// Positions selected for one vein-mine operation
///
/// Ordered so two allocations over the same inputs compare equal.
pub type Vein = BTreeSet<BlockPosition>;

/// Allocation-specific result type
pub type AllocationResult<T> = Result<T, AllocationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("Vein origin {origin} is outside the world bounds")]
    OriginOutOfBounds { origin: BlockPosition },
}

/// Read-only view of the world supplied by the host
pub trait BlockAccessor {
    /// The block at `pos`; hosts return their empty/air block for unloaded space
    fn block_at(&self, pos: BlockPosition) -> BlockState;

    /// Whether `pos` is inside the world's buildable volume
    fn is_within_bounds(&self, pos: BlockPosition) -> bool;
}

/// How neighbours join the vein started at the origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VeinMembership {
    /// Any block matching the included list joins
    #[default]
    AnyListed,
    /// Only blocks of the origin's type (and matching the list) join
    SameType,
}

/// Effective allocation settings for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeinMiningConfig {
    /// Blocks that make up a vein
    pub blocks: BlockList,
    /// Largest number of positions returned, origin included; 0 is unbounded
    pub max_vein_size: u32,
    pub connectivity: Connectivity,
    pub membership: VeinMembership,
}

impl VeinMiningConfig {
    pub fn new(blocks: BlockList) -> Self {
        Self {
            blocks,
            max_vein_size: DEFAULT_MAX_VEIN_SIZE,
            connectivity: Connectivity::default(),
            membership: VeinMembership::default(),
        }
    }

    pub fn with_max_vein_size(mut self, max_vein_size: u32) -> Self {
        self.max_vein_size = max_vein_size;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_membership(mut self, membership: VeinMembership) -> Self {
        self.membership = membership;
        self
    }

    /// Size cap, or `None` when unbounded
    pub fn cap(&self) -> Option<usize> {
        if self.max_vein_size == UNBOUNDED {
            None
        } else {
            Some(self.max_vein_size as usize)
        }
    }
}

/// A strategy selecting the positions of one vein
pub trait VeinMiningPattern: Send + Sync {
    /// Select the vein started by breaking `block` at `origin`
    ///
    /// The result always contains `origin` and never exceeds the config's
    /// max vein size. `aliases` lists blocks that connect vein blocks without
    /// being mined themselves.
    fn allocate(
        &self,
        world: &dyn BlockAccessor,
        origin: BlockPosition,
        block: &BlockState,
        config: &VeinMiningConfig,
        aliases: Option<&BlockList>,
    ) -> AllocationResult<Vein>;
}

/// The vein consisting of only the broken block
pub fn allocate_origin_only(
    world: &dyn BlockAccessor,
    origin: BlockPosition,
) -> AllocationResult<Vein> {
    if !world.is_within_bounds(origin) {
        return Err(AllocationError::OriginOutOfBounds { origin });
    }
    Ok(BTreeSet::from([origin]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::block_list_operations::create_block_list;

    #[test]
    fn test_cap() {
        let config = VeinMiningConfig::new(create_block_list("empty"));
        assert_eq!(config.cap(), Some(DEFAULT_MAX_VEIN_SIZE as usize));
        assert_eq!(config.clone().with_max_vein_size(0).cap(), None);
        assert_eq!(config.with_max_vein_size(1).cap(), Some(1));
    }

    #[test]
    fn test_origin_only() {
        let world = WorldSnapshot::new(0, 255);
        let origin = BlockPosition::new(3, 10, -2);
        let vein = allocate_origin_only(&world, origin).expect("in bounds");
        assert_eq!(vein, BTreeSet::from([origin]));

        let below = BlockPosition::new(0, -1, 0);
        assert_eq!(
            allocate_origin_only(&world, below),
            Err(AllocationError::OriginOutOfBounds { origin: below })
        );
    }
}
