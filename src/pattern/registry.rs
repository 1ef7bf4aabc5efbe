use std::collections::HashMap;
use std::sync::Arc;

use super::{Axis, FloodFillPattern, LayerPattern, TubePattern, VeinMiningPattern};
use crate::block::NamespacedKey;
use crate::config::{ConfigError, ConfigResult};
use crate::constants::keys::PATTERN_NAMESPACE;
use crate::constants::patterns;

/// Registry of selectable patterns, keyed by namespaced key
pub struct PatternRegistry {
    patterns: HashMap<NamespacedKey, Arc<dyn VeinMiningPattern>>,
    /// Keys in registration order
    order: Vec<NamespacedKey>,
    default_key: NamespacedKey,
}

impl PatternRegistry {
    /// Registry holding only the flood fill pattern, which is also the default
    pub fn new() -> Self {
        let default_key = builtin_key(patterns::FLOOD_FILL);
        let mut patterns: HashMap<NamespacedKey, Arc<dyn VeinMiningPattern>> = HashMap::new();
        patterns.insert(default_key.clone(), Arc::new(FloodFillPattern));

        Self {
            patterns,
            order: vec![default_key.clone()],
            default_key,
        }
    }

    /// Registry with every built-in pattern
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let builtins: [(&str, Arc<dyn VeinMiningPattern>); 4] = [
            (patterns::LAYER, Arc::new(LayerPattern)),
            (patterns::TUBE_X, Arc::new(TubePattern::new(Axis::X))),
            (patterns::TUBE_Y, Arc::new(TubePattern::new(Axis::Y))),
            (patterns::TUBE_Z, Arc::new(TubePattern::new(Axis::Z))),
        ];
        for (name, pattern) in builtins {
            let key = builtin_key(name);
            registry.order.push(key.clone());
            registry.patterns.insert(key, pattern);
        }
        registry
    }

    /// Register a pattern under `key`; keys are unique
    pub fn register(
        &mut self,
        key: NamespacedKey,
        pattern: Arc<dyn VeinMiningPattern>,
    ) -> ConfigResult<()> {
        if self.patterns.contains_key(&key) {
            return Err(ConfigError::DuplicatePattern {
                key: key.to_string(),
            });
        }
        log::info!("[PatternRegistry::register] Registered pattern '{}'", key);
        self.order.push(key.clone());
        self.patterns.insert(key, pattern);
        Ok(())
    }

    pub fn get(&self, key: &NamespacedKey) -> Option<Arc<dyn VeinMiningPattern>> {
        self.patterns.get(key).cloned()
    }

    /// The pattern for `key`, or the default pattern and its key when unknown
    pub fn get_or_default(&self, key: &NamespacedKey) -> (NamespacedKey, Arc<dyn VeinMiningPattern>) {
        match self.patterns.get(key) {
            Some(pattern) => (key.clone(), Arc::clone(pattern)),
            None => (self.default_key.clone(), self.default_pattern()),
        }
    }

    pub fn default_key(&self) -> &NamespacedKey {
        &self.default_key
    }

    pub fn default_pattern(&self) -> Arc<dyn VeinMiningPattern> {
        match self.patterns.get(&self.default_key) {
            Some(pattern) => Arc::clone(pattern),
            None => Arc::new(FloodFillPattern),
        }
    }

    /// Change the default; the key must already be registered
    pub fn set_default(&mut self, key: NamespacedKey) -> ConfigResult<()> {
        if !self.patterns.contains_key(&key) {
            return Err(ConfigError::Validation(format!(
                "default pattern '{}' is not registered",
                key
            )));
        }
        self.default_key = key;
        Ok(())
    }

    pub fn contains(&self, key: &NamespacedKey) -> bool {
        self.patterns.contains_key(key)
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> &[NamespacedKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("patterns", &self.order)
            .field("default_key", &self.default_key)
            .finish()
    }
}

fn builtin_key(name: &str) -> NamespacedKey {
    NamespacedKey::from_parts_unchecked(PATTERN_NAMESPACE, name)
}
