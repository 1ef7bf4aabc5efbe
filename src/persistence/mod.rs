//! Player preference persistence
//!
//! Storage is split in two layers:
//!
//! - a [`PreferenceBackend`] moves raw bytes for one player in and out of
//!   storage, synchronously;
//! - the [`PreferenceStore`] runs backend calls off the caller's thread, one
//!   queue per player so writes for a player land in call order, and hands
//!   back awaitable [`PersistenceTask`]s.
//!
//! The on-disk record format lives in [`record`].

mod json_backend;
pub mod record;

#[cfg(feature = "native")]
mod preference_store;
#[cfg(feature = "native")]
mod task;

pub use json_backend::JsonDirectoryBackend;

#[cfg(feature = "native")]
pub use preference_store::{PreferenceStore, SaveReceipt};
#[cfg(feature = "native")]
pub use task::PersistenceTask;

use crate::player::PlayerId;

/// Persistence-specific result type
pub type PersistenceResult<T> = Result<T, PersistenceError>;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to read record of player {player}: {source}")]
    Read {
        player: String,
        source: std::io::Error,
    },
    #[error("Failed to write record of player {player}: {source}")]
    Write {
        player: String,
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Corrupted data for player {player}: {reason}")]
    CorruptedData { player: String, reason: String },
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
    #[error("Persistence task failed: {0}")]
    TaskFailed(String),
    #[error("No async runtime available for persistence")]
    RuntimeUnavailable,
}

/// Byte-level storage for per-player records
///
/// Implementations block; the store only calls them from blocking worker
/// threads.
pub trait PreferenceBackend: Send + Sync + 'static {
    /// The stored record, or `None` when the player has none
    fn read(&self, player: &PlayerId) -> std::io::Result<Option<Vec<u8>>>;

    /// Replace the player's record
    fn write(&self, player: &PlayerId, contents: &[u8]) -> std::io::Result<()>;
}
