//! JSON record format of one player's preferences
//!
//! ```json
//! {
//!   "activation_strategy_id": "SNEAK",
//!   "vein_mining_pattern_id": "veinminer:default",
//!   "disabled_categories": ["axe", "shovel"]
//! }
//! ```
//!
//! Decoding is lenient per field: a missing or unusable field falls back to
//! the server default and the result is marked dirty so the next save writes
//! a complete record. Unknown fields are ignored. Only a document that is not
//! a JSON object at all is rejected as corrupted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PersistenceError, PersistenceResult};
use crate::activation::ActivationStrategy;
use crate::block::NamespacedKey;
use crate::constants::storage::{
    FIELD_ACTIVATION_STRATEGY, FIELD_DISABLED_CATEGORIES, FIELD_PATTERN,
};
use crate::player::preferences_operations::{create_preferences, mark_dirty};
use crate::player::{PlayerId, PlayerPreferences, PreferenceDefaults, PreferenceSnapshot};

#[derive(Serialize)]
struct StoredRecordRef<'a> {
    activation_strategy_id: &'static str,
    vein_mining_pattern_id: String,
    disabled_categories: Vec<&'a str>,
}

#[derive(Deserialize)]
struct StoredRecord {
    activation_strategy_id: Option<Value>,
    vein_mining_pattern_id: Option<Value>,
    disabled_categories: Option<Value>,
}

/// Serialize a snapshot to its record bytes
pub fn encode(snapshot: &PreferenceSnapshot) -> PersistenceResult<Vec<u8>> {
    let record = StoredRecordRef {
        activation_strategy_id: snapshot.activation_strategy.id(),
        vein_mining_pattern_id: snapshot.pattern.to_string(),
        disabled_categories: snapshot
            .disabled_categories
            .iter()
            .map(String::as_str)
            .collect(),
    };
    serde_json::to_vec_pretty(&record)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Rebuild preferences from record bytes
///
/// Fails only with [`PersistenceError::CorruptedData`].
pub fn decode(
    player: PlayerId,
    bytes: &[u8],
    defaults: &PreferenceDefaults,
) -> PersistenceResult<PlayerPreferences> {
    let corrupted = |reason: String| PersistenceError::CorruptedData {
        player: player.to_string(),
        reason,
    };

    let document: Value = serde_json::from_slice(bytes).map_err(|e| corrupted(e.to_string()))?;
    if !document.is_object() {
        return Err(corrupted("record is not a JSON object".to_string()));
    }
    let stored: StoredRecord =
        serde_json::from_value(document).map_err(|e| corrupted(e.to_string()))?;

    let mut prefs = create_preferences(player, defaults);
    let mut fell_back = false;

    match stored.activation_strategy_id.as_ref().and_then(Value::as_str) {
        Some(name) => match ActivationStrategy::from_name(name) {
            Some(strategy) => prefs.activation_strategy = strategy,
            None => {
                log::warn!(
                    "[PreferenceRecord::decode] Unknown {} '{}' for {}, using {}",
                    FIELD_ACTIVATION_STRATEGY,
                    name,
                    prefs.player_id,
                    prefs.activation_strategy
                );
                fell_back = true;
            }
        },
        None => fell_back = true,
    }

    match stored.vein_mining_pattern_id.as_ref().and_then(Value::as_str) {
        Some(raw) => match NamespacedKey::parse(raw) {
            Ok(key) if is_known_pattern(defaults, &key) => prefs.pattern = key,
            _ => {
                log::warn!(
                    "[PreferenceRecord::decode] Unknown {} '{}' for {}, using {}",
                    FIELD_PATTERN,
                    raw,
                    prefs.player_id,
                    defaults.pattern
                );
                fell_back = true;
            }
        },
        None => fell_back = true,
    }

    match stored.disabled_categories {
        Some(Value::Array(entries)) => {
            for entry in entries {
                let Some(id) = entry.as_str().map(str::to_ascii_lowercase) else {
                    fell_back = true;
                    continue;
                };
                if is_known_category(defaults, &id) {
                    prefs.disabled_categories.insert(id);
                } else {
                    log::debug!(
                        "[PreferenceRecord::decode] Dropping unknown category '{}' for {}",
                        id,
                        prefs.player_id
                    );
                    fell_back = true;
                }
            }
        }
        Some(_) => {
            log::warn!(
                "[PreferenceRecord::decode] {} for {} is not a list, using none",
                FIELD_DISABLED_CATEGORIES,
                prefs.player_id
            );
            fell_back = true;
        }
        None => fell_back = true,
    }

    if fell_back {
        mark_dirty(&mut prefs);
    }
    Ok(prefs)
}

fn is_known_pattern(defaults: &PreferenceDefaults, key: &NamespacedKey) -> bool {
    defaults
        .known_patterns
        .as_ref()
        .map_or(true, |known| known.contains(key))
}

fn is_known_category(defaults: &PreferenceDefaults, id: &str) -> bool {
    defaults
        .known_categories
        .as_ref()
        .map_or(true, |known| known.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::preferences_operations::{is_dirty, set_category_enabled, snapshot};
    use std::collections::HashSet;

    fn alex() -> PlayerId {
        PlayerId::new("alex").expect("valid id")
    }

    fn key(input: &str) -> NamespacedKey {
        NamespacedKey::parse(input).expect("valid key")
    }

    #[test]
    fn test_encode_writes_expected_fields() {
        let mut prefs = create_preferences(alex(), &PreferenceDefaults::default());
        set_category_enabled(&mut prefs, "Axe", false);

        let bytes = encode(&snapshot(&prefs)).expect("encode");
        let value: Value = serde_json::from_slice(&bytes).expect("valid json");
        assert_eq!(value[FIELD_ACTIVATION_STRATEGY], "SNEAK");
        assert_eq!(value[FIELD_PATTERN], "veinminer:default");
        assert_eq!(value[FIELD_DISABLED_CATEGORIES], serde_json::json!(["axe"]));
    }

    #[test]
    fn test_unknown_strategy_falls_back_alone() {
        let json = br#"{
            "activation_strategy_id": "FOO",
            "vein_mining_pattern_id": "veinminer:layer",
            "disabled_categories": ["PICKAXE"]
        }"#;
        let prefs = decode(alex(), json, &PreferenceDefaults::default()).expect("lenient decode");

        assert_eq!(prefs.activation_strategy, ActivationStrategy::Sneak);
        assert_eq!(prefs.pattern, key("veinminer:layer"));
        assert!(prefs.disabled_categories.contains("pickaxe"));
        assert!(is_dirty(&prefs));
    }

    #[test]
    fn test_complete_record_loads_clean() {
        let json = br#"{
            "activation_strategy_id": "always",
            "vein_mining_pattern_id": "veinminer:tube_y",
            "disabled_categories": [],
            "legacy_field": 42
        }"#;
        let prefs = decode(alex(), json, &PreferenceDefaults::default()).expect("decode");

        assert_eq!(prefs.activation_strategy, ActivationStrategy::Always);
        assert_eq!(prefs.pattern, key("veinminer:tube_y"));
        assert!(!is_dirty(&prefs));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let defaults = PreferenceDefaults {
            activation_strategy: ActivationStrategy::Stand,
            ..PreferenceDefaults::default()
        };
        let prefs = decode(alex(), b"{}", &defaults).expect("decode");
        assert_eq!(prefs.activation_strategy, ActivationStrategy::Stand);
        assert_eq!(prefs.pattern, defaults.pattern);
        assert!(prefs.disabled_categories.is_empty());
    }

    #[test]
    fn test_unknown_pattern_and_categories_are_filtered() {
        let defaults = PreferenceDefaults {
            known_patterns: Some(HashSet::from([key("veinminer:default")])),
            known_categories: Some(HashSet::from(["axe".to_string()])),
            ..PreferenceDefaults::default()
        };
        let json = br#"{
            "activation_strategy_id": "SNEAK",
            "vein_mining_pattern_id": "othermod:spiral",
            "disabled_categories": ["axe", "removed", 7]
        }"#;
        let prefs = decode(alex(), json, &defaults).expect("decode");

        assert_eq!(prefs.pattern, key("veinminer:default"));
        assert_eq!(prefs.disabled_categories.len(), 1);
        assert!(prefs.disabled_categories.contains("axe"));
        assert!(is_dirty(&prefs));
    }

    #[test]
    fn test_non_object_is_corrupted() {
        let defaults = PreferenceDefaults::default();
        let cases: [&[u8]; 3] = [b"not json{", b"[1, 2]", b"null"];
        for bytes in cases {
            let result = decode(alex(), bytes, &defaults);
            assert!(matches!(result, Err(PersistenceError::CorruptedData { .. })));
        }
    }
}
