use super::flood_fill::flood_fill;
use super::{
    AllocationResult, Axis, BlockAccessor, BlockPosition, Vein, VeinMiningConfig, VeinMiningPattern,
};
use crate::block::{BlockList, BlockState};

/// Flood fill confined to the line through the origin along one axis
#[derive(Debug, Clone, Copy)]
pub struct TubePattern {
    axis: Axis,
}

impl TubePattern {
    pub const fn new(axis: Axis) -> Self {
        Self { axis }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }
}

impl VeinMiningPattern for TubePattern {
    fn allocate(
        &self,
        world: &dyn BlockAccessor,
        origin: BlockPosition,
        block: &BlockState,
        config: &VeinMiningConfig,
        aliases: Option<&BlockList>,
    ) -> AllocationResult<Vein> {
        let axis = self.axis;
        flood_fill(world, origin, block, config, aliases, move |pos| {
            axis.is_aligned(origin, pos)
        })
    }
}
