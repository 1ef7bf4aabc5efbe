use super::flood_fill::flood_fill;
use super::{AllocationResult, BlockAccessor, BlockPosition, Vein, VeinMiningConfig, VeinMiningPattern};
use crate::block::{BlockList, BlockState};

/// Flood fill confined to the horizontal plane of the origin
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerPattern;

impl VeinMiningPattern for LayerPattern {
    fn allocate(
        &self,
        world: &dyn BlockAccessor,
        origin: BlockPosition,
        block: &BlockState,
        config: &VeinMiningConfig,
        aliases: Option<&BlockList>,
    ) -> AllocationResult<Vein> {
        flood_fill(world, origin, block, config, aliases, |pos| pos.y == origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::block_list_operations::parse_block_list;
    use crate::pattern::{Connectivity, WorldSnapshot};

    fn state(input: &str) -> BlockState {
        BlockState::parse(input).expect("valid state")
    }

    #[test]
    fn test_stays_on_origin_layer() {
        let mut world = WorldSnapshot::new(-64, 319);
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..3 {
                    world.set(BlockPosition::new(x, y, z), state("minecraft:coal_ore"));
                }
            }
        }
        let config = VeinMiningConfig::new(parse_block_list("coal", &["coal_ore"]).expect("valid list"))
            .with_max_vein_size(0)
            .with_connectivity(Connectivity::Full);

        let vein = LayerPattern
            .allocate(&world, BlockPosition::new(1, 1, 1), &state("coal_ore"), &config, None)
            .expect("allocation");
        assert_eq!(vein.len(), 9);
        assert!(vein.iter().all(|pos| pos.y == 1));
    }

    #[test]
    fn test_does_not_bridge_through_other_layers() {
        // Two gold blocks on y=0 connected only via y=1
        let world = WorldSnapshot::new(-64, 319)
            .with(BlockPosition::new(0, 0, 0), state("ore:gold"))
            .with(BlockPosition::new(0, 1, 0), state("ore:gold"))
            .with(BlockPosition::new(1, 1, 0), state("ore:gold"))
            .with(BlockPosition::new(1, 0, 0), state("minecraft:stone"))
            .with(BlockPosition::new(2, 0, 0), state("ore:gold"));
        let config = VeinMiningConfig::new(parse_block_list("gold", &["ore:gold"]).expect("valid list"));

        let vein = LayerPattern
            .allocate(&world, BlockPosition::new(0, 0, 0), &state("ore:gold"), &config, None)
            .expect("allocation");
        assert_eq!(vein.len(), 1);
    }
}
