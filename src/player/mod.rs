//! Per-player vein mining preferences and online sessions

#[cfg(feature = "native")]
mod player_manager;
mod preferences_data;
pub mod preferences_operations;

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "native")]
pub use player_manager::PlayerManager;
pub use preferences_data::{PlayerPreferences, PreferenceDefaults, PreferenceSnapshot};

/// Player-specific result type
pub type PreferenceResult<T> = Result<T, PreferenceError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("Player {player} cannot use client activation without the client mod")]
    ClientModRequired { player: String },
    #[error("Invalid player id: '{id}'")]
    InvalidPlayerId { id: String },
}

/// Stable player identifier, also the stem of the player's storage file
///
/// Restricted to `[A-Za-z0-9_-]` so it is always a safe file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: &str) -> PreferenceResult<Self> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PreferenceError::InvalidPlayerId { id: id.to_string() });
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlayerId {
    type Error = PreferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PlayerId> for String {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}
