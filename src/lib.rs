// Vein Miner Core - vein allocation engine and player preference store
//
// Data-oriented layout: plain data structs in *_data modules, transformations
// as free functions in *_operations modules.
// - block: block identities, state predicates and block lists
// - category: tool categories and their registry
// - pattern: vein allocation patterns and the world view they read
// - activation: when a break turns into a vein-mine
// - player: per-player preferences and online sessions
// - persistence: asynchronous per-player preference storage
// - config: TOML configuration and reload handling
// - vein_miner: one call per break event

// Constants module
pub mod constants;

// Core modules
pub mod error;

pub mod activation;
pub mod block;
pub mod category;
pub mod config;
pub mod pattern;
pub mod persistence;
pub mod player;
pub mod vein_miner;

pub use activation::{ActivationStrategy, PlayerState};
pub use block::{BlockIdentity, BlockList, BlockState, NamespacedKey, StatePredicate, VeinMinerBlock};
pub use category::{CategoryRegistryData, ToolCategory, ToolQualifier};
pub use config::{ConfigError, ConfigManager, ConfigResult, VeinMinerConfig};
pub use error::{OptionExt, VeinError, VeinResult};
pub use pattern::{
    allocate_origin_only, AllocationError, BlockAccessor, BlockPosition, Connectivity,
    PatternRegistry, Vein, VeinMembership, VeinMiningConfig, VeinMiningPattern, WorldSnapshot,
};
pub use persistence::{JsonDirectoryBackend, PersistenceError, PreferenceBackend};
#[cfg(feature = "native")]
pub use persistence::{PersistenceTask, PreferenceStore, SaveReceipt};
pub use player::{PlayerId, PlayerPreferences, PreferenceDefaults, PreferenceError};
#[cfg(feature = "native")]
pub use player::PlayerManager;
pub use vein_miner::{BreakEvent, BreakOutcome, VeinMiner};
