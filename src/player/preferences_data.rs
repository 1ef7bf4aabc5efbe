//! Player Preferences Data
//!
//! NO METHODS. Just data.
//! All transformations happen in preferences_operations.rs

use std::collections::{BTreeSet, HashSet};

use super::PlayerId;
use crate::activation::ActivationStrategy;
use crate::block::NamespacedKey;
use crate::constants::keys::PATTERN_NAMESPACE;
use crate::constants::patterns;

/// One player's live preferences
///
/// Every mutation bumps `revision`; a successful save records the revision it
/// wrote in `persisted_revision`. The record is dirty while the two differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPreferences {
    pub player_id: PlayerId,
    pub activation_strategy: ActivationStrategy,
    pub pattern: NamespacedKey,
    /// Lowercased category ids
    pub disabled_categories: BTreeSet<String>,
    pub revision: u64,
    pub persisted_revision: u64,
}

/// Immutable copy of preferences handed to a save job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceSnapshot {
    pub player_id: PlayerId,
    pub activation_strategy: ActivationStrategy,
    pub pattern: NamespacedKey,
    pub disabled_categories: BTreeSet<String>,
    pub revision: u64,
}

/// Server-side defaults for new players and for fields that fail to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceDefaults {
    pub activation_strategy: ActivationStrategy,
    pub pattern: NamespacedKey,
    /// Pattern keys a stored record may select; `None` accepts any key
    pub known_patterns: Option<HashSet<NamespacedKey>>,
    /// Lowercased category ids a stored record may disable; `None` accepts any
    pub known_categories: Option<HashSet<String>>,
}

impl Default for PreferenceDefaults {
    fn default() -> Self {
        Self {
            activation_strategy: ActivationStrategy::default(),
            pattern: NamespacedKey::from_parts_unchecked(PATTERN_NAMESPACE, patterns::FLOOD_FILL),
            known_patterns: None,
            known_categories: None,
        }
    }
}
