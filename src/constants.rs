//! Shared constants for the vein mining core
//!
//! Grouped by the subsystem that owns them. Anything an operator can override
//! lives in `config`; these are the fallbacks used when a value is absent.

/// Namespacing of block, item and pattern keys
pub mod keys {
    /// Namespace assumed when a key is written without one (`stone` -> `minecraft:stone`)
    pub const DEFAULT_NAMESPACE: &str = "minecraft";

    /// Namespace of the built-in vein mining patterns
    pub const PATTERN_NAMESPACE: &str = "veinminer";
}

/// Allocation defaults
pub mod allocation {
    /// Max vein size used when neither the category nor the config sets one
    pub const DEFAULT_MAX_VEIN_SIZE: u32 = 64;

    /// A max vein size of zero means "no limit"
    pub const UNBOUNDED: u32 = 0;
}

/// Built-in pattern key names (within [`keys::PATTERN_NAMESPACE`])
pub mod patterns {
    pub const FLOOD_FILL: &str = "default";
    pub const LAYER: &str = "layer";
    pub const TUBE_X: &str = "tube_x";
    pub const TUBE_Y: &str = "tube_y";
    pub const TUBE_Z: &str = "tube_z";
}

/// Player preference storage layout
pub mod storage {
    /// Extension of per-player preference files
    pub const PLAYER_FILE_EXTENSION: &str = "json";

    /// Suffix of the scratch file written before an atomic rename
    pub const TEMP_FILE_SUFFIX: &str = "tmp";

    pub const FIELD_ACTIVATION_STRATEGY: &str = "activation_strategy_id";
    pub const FIELD_PATTERN: &str = "vein_mining_pattern_id";
    pub const FIELD_DISABLED_CATEGORIES: &str = "disabled_categories";

    /// Directory used when the config does not name one
    pub const DEFAULT_DIRECTORY: &str = "playerdata";
}
