//! Unified error handling for the vein mining core
//!
//! Module-level errors (`ConfigError`, `AllocationError`, `PersistenceError`,
//! `PreferenceError`) convert into [`VeinError`] so hosts can handle a single
//! type at the integration boundary.

use std::error::Error as StdError;
use std::fmt;

use crate::config::ConfigError;
use crate::pattern::AllocationError;
use crate::persistence::PersistenceError;
use crate::player::PreferenceError;

/// Main error type for the vein mining core
#[derive(Debug)]
pub enum VeinError {
    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },
    InvalidBlockSelector {
        input: String,
        reason: String,
    },
    DuplicateCategory {
        id: String,
    },

    // Allocation Errors
    OriginOutOfBounds {
        pos: (i32, i32, i32),
    },

    // Player Errors
    ClientModRequired {
        player: String,
    },
    InvalidPlayerId {
        id: String,
    },

    // Persistence Errors
    SaveFailed {
        player: String,
        error: String,
    },
    LoadFailed {
        player: String,
        error: String,
    },
    CorruptedData {
        reason: String,
    },
    SerializationError {
        context: String,
        error: String,
    },

    // Threading Errors
    ChannelClosed {
        name: String,
    },
    TaskJoinError {
        task: String,
    },

    // System Errors
    IoError {
        path: String,
        error: String,
    },
    ResourceNotFound {
        resource_type: String,
        id: String,
    },

    // Generic fallback for unexpected errors
    Internal {
        message: String,
    },
}

impl fmt::Display for VeinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VeinError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),
            VeinError::InvalidBlockSelector { input, reason } => {
                write!(f, "Invalid block selector '{}': {}", input, reason)
            }
            VeinError::DuplicateCategory { id } => {
                write!(f, "Duplicate tool category id: {}", id)
            }

            VeinError::OriginOutOfBounds { pos } => {
                write!(f, "Vein origin {:?} is outside the world bounds", pos)
            }

            VeinError::ClientModRequired { player } => write!(
                f,
                "Player {} cannot use client activation without the client mod",
                player
            ),
            VeinError::InvalidPlayerId { id } => write!(f, "Invalid player id: '{}'", id),

            VeinError::SaveFailed { player, error } => {
                write!(f, "Save failed for player {}: {}", player, error)
            }
            VeinError::LoadFailed { player, error } => {
                write!(f, "Load failed for player {}: {}", player, error)
            }
            VeinError::CorruptedData { reason } => write!(f, "Data corrupted: {}", reason),
            VeinError::SerializationError { context, error } => {
                write!(f, "Serialization error in {}: {}", context, error)
            }

            VeinError::ChannelClosed { name } => write!(f, "Channel closed: {}", name),
            VeinError::TaskJoinError { task } => write!(f, "Task join error: {}", task),

            VeinError::IoError { path, error } => write!(f, "IO error for {}: {}", path, error),
            VeinError::ResourceNotFound { resource_type, id } => {
                write!(f, "Resource not found: {} '{}'", resource_type, id)
            }

            VeinError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl StdError for VeinError {}

/// Type alias for Results in the vein mining core
pub type VeinResult<T> = Result<T, VeinError>;

// Conversion traits for module errors

impl From<std::io::Error> for VeinError {
    fn from(error: std::io::Error) -> Self {
        VeinError::IoError {
            path: String::new(),
            error: error.to_string(),
        }
    }
}

impl From<ConfigError> for VeinError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidKey { input, reason }
            | ConfigError::InvalidBlockEntry { input, reason }
            | ConfigError::InvalidStatePredicate { input, reason } => {
                VeinError::InvalidBlockSelector { input, reason }
            }
            ConfigError::DuplicateCategory { id } => VeinError::DuplicateCategory { id },
            ConfigError::DuplicatePattern { key } => VeinError::InvalidConfig {
                field: "pattern".to_string(),
                value: key,
                reason: "already registered".to_string(),
            },
            ConfigError::InvalidCategory { id, reason } => VeinError::InvalidConfig {
                field: format!("category.{}", id),
                value: id,
                reason,
            },
            ConfigError::Parse(e) => VeinError::InvalidConfig {
                field: "document".to_string(),
                value: String::new(),
                reason: e,
            },
            ConfigError::Validation(e) => VeinError::InvalidConfig {
                field: "document".to_string(),
                value: String::new(),
                reason: e,
            },
            ConfigError::Io { path, error } => VeinError::IoError { path, error },
        }
    }
}

impl From<AllocationError> for VeinError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::OriginOutOfBounds { origin } => VeinError::OriginOutOfBounds {
                pos: (origin.x, origin.y, origin.z),
            },
        }
    }
}

impl From<PersistenceError> for VeinError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Read { player, source } => VeinError::LoadFailed {
                player,
                error: source.to_string(),
            },
            PersistenceError::Write { player, source } => VeinError::SaveFailed {
                player,
                error: source.to_string(),
            },
            PersistenceError::SerializationError(e) => VeinError::SerializationError {
                context: "persistence".to_string(),
                error: e,
            },
            PersistenceError::CorruptedData { player, reason } => VeinError::CorruptedData {
                reason: format!("{}: {}", player, reason),
            },
            PersistenceError::ChannelClosed(name) => VeinError::ChannelClosed { name },
            PersistenceError::TaskFailed(task) => VeinError::TaskJoinError { task },
            PersistenceError::RuntimeUnavailable => VeinError::Internal {
                message: "no async runtime available for persistence".to_string(),
            },
        }
    }
}

impl From<PreferenceError> for VeinError {
    fn from(err: PreferenceError) -> Self {
        match err {
            PreferenceError::ClientModRequired { player } => {
                VeinError::ClientModRequired { player }
            }
            PreferenceError::InvalidPlayerId { id } => VeinError::InvalidPlayerId { id },
        }
    }
}

// Helper functions for common error patterns

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_vein<F>(self, f: F) -> VeinResult<T>
    where
        F: FnOnce() -> VeinError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_vein<F>(self, f: F) -> VeinResult<T>
    where
        F: FnOnce() -> VeinError,
    {
        self.ok_or_else(f)
    }
}
