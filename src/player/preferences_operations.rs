//! Player Preferences Operations
//!
//! Free functions over `PlayerPreferences`. Every function that changes a
//! field returns whether anything changed and bumps the revision only then.

use std::collections::BTreeSet;

use super::preferences_data::{PlayerPreferences, PreferenceDefaults, PreferenceSnapshot};
use super::{PlayerId, PreferenceError, PreferenceResult};
use crate::activation::ActivationStrategy;
use crate::block::NamespacedKey;

/// Fresh, clean preferences built from the server defaults
///
/// A `Client` default is replaced by `Sneak` since the player's mod state is
/// not known yet.
pub fn create_preferences(player_id: PlayerId, defaults: &PreferenceDefaults) -> PlayerPreferences {
    let activation_strategy = if defaults.activation_strategy.requires_client() {
        ActivationStrategy::Sneak
    } else {
        defaults.activation_strategy
    };
    PlayerPreferences {
        player_id,
        activation_strategy,
        pattern: defaults.pattern.clone(),
        disabled_categories: BTreeSet::new(),
        revision: 0,
        persisted_revision: 0,
    }
}

/// Whether in-memory state may differ from the last persisted state
pub fn is_dirty(prefs: &PlayerPreferences) -> bool {
    prefs.revision != prefs.persisted_revision
}

/// Force the record dirty, e.g. after loading fields that fell back to defaults
pub fn mark_dirty(prefs: &mut PlayerPreferences) {
    prefs.revision += 1;
}

/// Record that `revision` reached storage
///
/// Changes made after the snapshot was taken keep the record dirty. Returns
/// whether the record is now clean.
pub fn mark_persisted(prefs: &mut PlayerPreferences, revision: u64) -> bool {
    if revision > prefs.persisted_revision && revision <= prefs.revision {
        prefs.persisted_revision = revision;
    }
    !is_dirty(prefs)
}

/// Copy of the persisted fields, tagged with the current revision
pub fn snapshot(prefs: &PlayerPreferences) -> PreferenceSnapshot {
    PreferenceSnapshot {
        player_id: prefs.player_id.clone(),
        activation_strategy: prefs.activation_strategy,
        pattern: prefs.pattern.clone(),
        disabled_categories: prefs.disabled_categories.clone(),
        revision: prefs.revision,
    }
}

/// Change the activation strategy
///
/// `Client` is refused for players without the client mod.
pub fn set_activation_strategy(
    prefs: &mut PlayerPreferences,
    strategy: ActivationStrategy,
    client_mod_installed: bool,
) -> PreferenceResult<bool> {
    if strategy.requires_client() && !client_mod_installed {
        return Err(PreferenceError::ClientModRequired {
            player: prefs.player_id.to_string(),
        });
    }
    if prefs.activation_strategy == strategy {
        return Ok(false);
    }

    prefs.activation_strategy = strategy;
    mark_dirty(prefs);
    Ok(true)
}

/// Select a vein mining pattern
pub fn set_pattern(prefs: &mut PlayerPreferences, pattern: NamespacedKey) -> bool {
    if prefs.pattern == pattern {
        return false;
    }
    prefs.pattern = pattern;
    mark_dirty(prefs);
    true
}

/// Enable or disable vein mining for one category
pub fn set_category_enabled(prefs: &mut PlayerPreferences, category_id: &str, enabled: bool) -> bool {
    let id = category_id.to_ascii_lowercase();
    let changed = if enabled {
        prefs.disabled_categories.remove(&id)
    } else {
        prefs.disabled_categories.insert(id)
    };
    if changed {
        mark_dirty(prefs);
    }
    changed
}

/// Disable every listed category
pub fn disable_all<S: AsRef<str>>(prefs: &mut PlayerPreferences, category_ids: &[S]) -> bool {
    let mut changed = false;
    for id in category_ids {
        changed |= prefs
            .disabled_categories
            .insert(id.as_ref().to_ascii_lowercase());
    }
    if changed {
        mark_dirty(prefs);
    }
    changed
}

/// Clear the disabled set
pub fn enable_all(prefs: &mut PlayerPreferences) -> bool {
    if prefs.disabled_categories.is_empty() {
        return false;
    }
    prefs.disabled_categories.clear();
    mark_dirty(prefs);
    true
}

pub fn is_category_enabled(prefs: &PlayerPreferences, category_id: &str) -> bool {
    !prefs
        .disabled_categories
        .contains(&category_id.to_ascii_lowercase())
}

/// Drop a stored `Client` strategy for a player whose client mod went away
pub fn revoke_client_activation(prefs: &mut PlayerPreferences, fallback: ActivationStrategy) -> bool {
    if !prefs.activation_strategy.requires_client() || fallback.requires_client() {
        return false;
    }
    log::info!(
        "[Preferences::revoke_client_activation] Player {} lost client activation, using {}",
        prefs.player_id,
        fallback
    );
    prefs.activation_strategy = fallback;
    mark_dirty(prefs);
    true
}
