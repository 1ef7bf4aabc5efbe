//! Configuration Error Handling
//!
//! Everything that can go wrong while turning an operator's config into
//! block lists, categories and patterns. A `ConfigError` is fatal to the
//! config unit being loaded, never to the running engine.

/// Config-specific result type
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid key '{input}': {reason}")]
    InvalidKey { input: String, reason: String },

    #[error("Invalid block entry '{input}': {reason}")]
    InvalidBlockEntry { input: String, reason: String },

    #[error("Invalid state predicate '{input}': {reason}")]
    InvalidStatePredicate { input: String, reason: String },

    #[error("Tool category '{id}' is already registered")]
    DuplicateCategory { id: String },

    #[error("Pattern '{key}' is already registered")]
    DuplicatePattern { key: String },

    #[error("Invalid tool category '{id}': {reason}")]
    InvalidCategory { id: String, reason: String },

    #[error("Config parse error: {0}")]
    Parse(String),

    #[error("Config validation failed: {0}")]
    Validation(String),

    #[error("IO error for {path}: {error}")]
    Io { path: String, error: String },
}
