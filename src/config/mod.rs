//! Operator configuration
//!
//! A TOML document describes the default player preferences and the tool
//! categories. Loading parses and validates the whole document before any of
//! it is used, so a bad edit never replaces a working configuration.
//!
//! ```toml
//! default_activation_strategy = "sneak"
//! default_pattern = "veinminer:default"
//! default_max_vein_size = 64
//!
//! [[category]]
//! id = "pickaxe"
//! tools = ["iron_pickaxe", "diamond_pickaxe"]
//! blocks = ["gold_ore", "redstone_ore[lit=false]"]
//! aliases = ["stone"]
//! max_vein_size = 32
//! ```

mod config_data;
mod config_operations;
mod error;
mod manager;

pub use config_data::{CategoryConfig, VeinMinerConfig};
pub use config_operations::{
    build_category, build_category_registry, build_pattern_registry, load_config_file,
    parse_config, parse_tool_qualifier,
};
pub use error::{ConfigError, ConfigResult};
pub use manager::ConfigManager;
