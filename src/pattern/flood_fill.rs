//! Breadth-first vein traversal
//!
//! Every built-in pattern is this traversal with a different shape filter.
//! The frontier is a FIFO queue and neighbours are expanded in the fixed
//! order of [`Connectivity::offsets`], so a given world, origin and config
//! always yield the same vein: the first N vein blocks in BFS order.

use rustc_hash::FxHashSet;
use std::collections::{BTreeSet, VecDeque};

use super::{
    AllocationError, AllocationResult, BlockAccessor, BlockPosition, Vein, VeinMembership,
    VeinMiningConfig, VeinMiningPattern,
};
use crate::block::block_list_operations::contains;
use crate::block::{BlockList, BlockState};

/// Unrestricted flood fill through connected vein blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct FloodFillPattern;

impl VeinMiningPattern for FloodFillPattern {
    fn allocate(
        &self,
        world: &dyn BlockAccessor,
        origin: BlockPosition,
        block: &BlockState,
        config: &VeinMiningConfig,
        aliases: Option<&BlockList>,
    ) -> AllocationResult<Vein> {
        flood_fill(world, origin, block, config, aliases, |_| true)
    }
}

#[derive(Clone, Copy)]
struct FrontierNode {
    pos: BlockPosition,
    /// Reached through an alias block rather than a vein block
    bridge: bool,
}

/// Shared traversal; `in_shape` rejects positions outside the pattern's shape
///
/// Alias blocks bridge one gap: they are entered only from a vein block,
/// expanded like vein blocks, but never added to the result or counted
/// toward the cap.
pub(super) fn flood_fill<F>(
    world: &dyn BlockAccessor,
    origin: BlockPosition,
    block: &BlockState,
    config: &VeinMiningConfig,
    aliases: Option<&BlockList>,
    in_shape: F,
) -> AllocationResult<Vein>
where
    F: Fn(BlockPosition) -> bool,
{
    if !world.is_within_bounds(origin) {
        log::warn!(
            "[FloodFill::allocate] Origin {} of {} is out of world bounds",
            origin,
            block
        );
        return Err(AllocationError::OriginOutOfBounds { origin });
    }

    let cap = config.cap();
    let mut vein = BTreeSet::new();
    vein.insert(origin);

    let mut visited = FxHashSet::default();
    visited.insert(origin);

    let mut frontier = VecDeque::new();
    frontier.push_back(FrontierNode {
        pos: origin,
        bridge: false,
    });

    'traversal: while let Some(node) = frontier.pop_front() {
        if is_full(cap, vein.len()) {
            break;
        }

        for &offset in config.connectivity.offsets() {
            let neighbour = node.pos.offset(offset);
            if visited.contains(&neighbour) || !in_shape(neighbour) {
                continue;
            }
            if !world.is_within_bounds(neighbour) {
                visited.insert(neighbour);
                continue;
            }

            let state = world.block_at(neighbour);
            if is_vein_member(config, block, &state) {
                visited.insert(neighbour);
                vein.insert(neighbour);
                frontier.push_back(FrontierNode {
                    pos: neighbour,
                    bridge: false,
                });
                if is_full(cap, vein.len()) {
                    break 'traversal;
                }
            } else if aliases.is_some_and(|aliases| contains(aliases, &state)) {
                // Seen from a bridge the alias stays unvisited: a later vein
                // neighbour may still use it as a bridge.
                if !node.bridge {
                    visited.insert(neighbour);
                    frontier.push_back(FrontierNode {
                        pos: neighbour,
                        bridge: true,
                    });
                }
            } else {
                visited.insert(neighbour);
            }
        }
    }

    log::debug!(
        "[FloodFill::allocate] {} at {}: {} blocks, {} positions visited",
        block,
        origin,
        vein.len(),
        visited.len()
    );
    Ok(vein)
}

fn is_full(cap: Option<usize>, size: usize) -> bool {
    cap.is_some_and(|cap| size >= cap)
}

fn is_vein_member(config: &VeinMiningConfig, origin: &BlockState, state: &BlockState) -> bool {
    match config.membership {
        VeinMembership::AnyListed => contains(&config.blocks, state),
        VeinMembership::SameType => {
            state.identity() == origin.identity() && contains(&config.blocks, state)
        }
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

    fn pos(x: i32, y: i32, z: i32) -> BlockPosition {
        BlockPosition::new(x, y, z)
    }

    fn gold_config(max_vein_size: u32) -> VeinMiningConfig {
        VeinMiningConfig::new(parse_block_list("gold", &["ore:gold"]).expect("valid list"))
            .with_max_vein_size(max_vein_size)
    }

    fn gold_world() -> WorldSnapshot {
        WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(1, 0, 0), state("ore:gold"))
            .with(pos(0, 1, 0), state("ore:gold"))
    }

    #[test]
    fn test_gold_scenario() {
        let world = gold_world();
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(10), None)
            .expect("allocation");
        assert_eq!(
            vein,
            BTreeSet::from([pos(0, 0, 0), pos(1, 0, 0), pos(0, 1, 0)])
        );
    }

    #[test]
    fn test_cap_of_one_returns_origin() {
        let world = gold_world();
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(1), None)
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(0, 0, 0)]));
    }

    #[test]
    fn test_cap_is_never_exceeded() {
        let mut world = WorldSnapshot::new(-64, 319);
        for x in 0..10 {
            for y in 0..10 {
                for z in 0..10 {
                    world.set(pos(x, y, z), state("ore:gold"));
                }
            }
        }

        for cap in [1, 2, 7, 64, 999] {
            let vein = FloodFillPattern
                .allocate(&world, pos(5, 5, 5), &state("ore:gold"), &gold_config(cap), None)
                .expect("allocation");
            assert_eq!(vein.len(), (cap as usize).min(1000));
            assert!(vein.contains(&pos(5, 5, 5)));
        }
    }

    #[test]
    fn test_unbounded_takes_whole_cluster() {
        let mut world = WorldSnapshot::new(-64, 319);
        for x in 0..200 {
            world.set(pos(x, 0, 0), state("ore:gold"));
        }
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(0), None)
            .expect("allocation");
        assert_eq!(vein.len(), 200);
    }

    #[test]
    fn test_cap_keeps_bfs_order() {
        // Line of gold along +x; a cap of 3 keeps the two nearest to the origin
        let mut world = WorldSnapshot::new(-64, 319);
        for x in -5..=5 {
            world.set(pos(x, 0, 0), state("ore:gold"));
        }
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(3), None)
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(-1, 0, 0), pos(0, 0, 0), pos(1, 0, 0)]));
    }

    #[test]
    fn test_isolated_origin() {
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(2, 0, 0), state("ore:gold"))
            .with(pos(1, 0, 0), state("minecraft:stone"));
        for cap in [0, 1, 64] {
            let vein = FloodFillPattern
                .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(cap), None)
                .expect("allocation");
            assert_eq!(vein, BTreeSet::from([pos(0, 0, 0)]));
        }
    }

    #[test]
    fn test_deterministic() {
        let mut world = WorldSnapshot::new(-64, 319);
        for i in 0..30 {
            world.set(pos(i % 4, i / 4, (i * 7) % 3), state("ore:gold"));
        }
        let config = gold_config(9).with_connectivity(Connectivity::Full);
        let first = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &config, None)
            .expect("allocation");
        for _ in 0..10 {
            let again = FloodFillPattern
                .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &config, None)
                .expect("allocation");
            assert_eq!(again, first);
        }
    }

    #[test]
    fn test_diagonals_need_full_connectivity() {
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(1, 1, 1), state("ore:gold"));

        let face = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(10), None)
            .expect("allocation");
        assert_eq!(face.len(), 1);

        let full_config = gold_config(10).with_connectivity(Connectivity::Full);
        let full = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &full_config, None)
            .expect("allocation");
        assert_eq!(full, BTreeSet::from([pos(0, 0, 0), pos(1, 1, 1)]));
    }

    #[test]
    fn test_world_bounds_stop_traversal() {
        let world = WorldSnapshot::new(0, 1)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(0, 1, 0), state("ore:gold"))
            .with(pos(0, 2, 0), state("ore:gold"));
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(10), None)
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(0, 0, 0), pos(0, 1, 0)]));
    }

    #[test]
    fn test_origin_out_of_bounds_is_an_error() {
        let world = WorldSnapshot::new(0, 10);
        let result = FloodFillPattern.allocate(
            &world,
            pos(0, 11, 0),
            &state("ore:gold"),
            &gold_config(10),
            None,
        );
        assert_eq!(
            result,
            Err(AllocationError::OriginOutOfBounds {
                origin: pos(0, 11, 0)
            })
        );
    }

    #[test]
    fn test_any_listed_joins_other_listed_types() {
        let config = VeinMiningConfig::new(
            parse_block_list("ores", &["ore:gold", "ore:iron"]).expect("valid list"),
        );
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(1, 0, 0), state("ore:iron"));
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &config, None)
            .expect("allocation");
        assert_eq!(vein.len(), 2);
    }

    #[test]
    fn test_same_type_excludes_other_listed_types() {
        let config = VeinMiningConfig::new(
            parse_block_list("ores", &["ore:gold", "ore:iron"]).expect("valid list"),
        )
        .with_membership(VeinMembership::SameType);
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(1, 0, 0), state("ore:iron"))
            .with(pos(-1, 0, 0), state("ore:gold"));
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &config, None)
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(-1, 0, 0), pos(0, 0, 0)]));
    }

    #[test]
    fn test_state_predicate_limits_membership() {
        let config = VeinMiningConfig::new(
            parse_block_list("logs", &["minecraft:oak_log[axis=y]"]).expect("valid list"),
        );
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("oak_log[axis=y]"))
            .with(pos(0, 1, 0), state("oak_log[axis=y]"))
            .with(pos(1, 0, 0), state("oak_log[axis=x]"));
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("oak_log[axis=y]"), &config, None)
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(0, 0, 0), pos(0, 1, 0)]));
    }

    #[test]
    fn test_alias_blocks_bridge_but_are_not_mined() {
        let aliases = parse_block_list("aliases", &["ore:deepslate_gold"]).expect("valid list");
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(1, 0, 0), state("ore:deepslate_gold"))
            .with(pos(2, 0, 0), state("ore:gold"));

        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(10), Some(&aliases))
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(0, 0, 0), pos(2, 0, 0)]));

        let without_aliases = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(10), None)
            .expect("allocation");
        assert_eq!(without_aliases, BTreeSet::from([pos(0, 0, 0)]));
    }

    #[test]
    fn test_alias_blocks_bridge_only_one_gap() {
        let aliases = parse_block_list("aliases", &["ore:deepslate_gold"]).expect("valid list");
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(1, 0, 0), state("ore:deepslate_gold"))
            .with(pos(2, 0, 0), state("ore:deepslate_gold"))
            .with(pos(3, 0, 0), state("ore:gold"));
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(10), Some(&aliases))
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(0, 0, 0)]));
    }

    #[test]
    fn test_included_alias_block_is_mined() {
        let aliases = parse_block_list("aliases", &["ore:gold"]).expect("valid list");
        let world = gold_world();
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(10), Some(&aliases))
            .expect("allocation");
        assert_eq!(vein.len(), 3);
    }

    #[test]
    fn test_bridges_do_not_count_toward_cap() {
        let aliases = parse_block_list("aliases", &["ore:deepslate_gold"]).expect("valid list");
        let world = WorldSnapshot::new(-64, 319)
            .with(pos(0, 0, 0), state("ore:gold"))
            .with(pos(1, 0, 0), state("ore:deepslate_gold"))
            .with(pos(2, 0, 0), state("ore:gold"));
        let vein = FloodFillPattern
            .allocate(&world, pos(0, 0, 0), &state("ore:gold"), &gold_config(2), Some(&aliases))
            .expect("allocation");
        assert_eq!(vein, BTreeSet::from([pos(0, 0, 0), pos(2, 0, 0)]));
    }
}
