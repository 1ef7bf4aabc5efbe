//! Break handling: from one broken block to the vein to break with it
//!
//! `VeinMiner` is the entry point hosts call once per break event. It gates on
//! the player's activation strategy, resolves the tool category, honours the
//! player's disabled categories and runs the player's selected pattern.

use std::collections::HashSet;
use std::sync::Arc;

use crate::activation::{ActivationStrategy, PlayerState};
use crate::block::{BlockState, NamespacedKey};
use crate::category::{category_ids, resolve_category, CategoryRegistryData, ToolCategory};
use crate::config::{
    build_category_registry, build_pattern_registry, ConfigError, ConfigResult, VeinMinerConfig,
};
use crate::error::VeinResult;
use crate::pattern::{BlockAccessor, BlockPosition, PatternRegistry, Vein};
use crate::player::preferences_operations::is_category_enabled;
use crate::player::{PlayerPreferences, PreferenceDefaults};

/// A block broken by a player
#[derive(Debug, Clone)]
pub struct BreakEvent {
    pub origin: BlockPosition,
    pub block: BlockState,
    /// Held item; `None` is an empty hand
    pub tool: Option<NamespacedKey>,
}

/// What to do with a break event
#[derive(Debug, Clone)]
pub enum BreakOutcome {
    /// The player's activation strategy does not fire
    Inactive,
    /// No category covers this tool and block
    NoCategory,
    /// The player disabled the matching category
    CategoryDisabled { category: String },
    /// Break these positions, origin included
    Vein {
        category: Arc<ToolCategory>,
        pattern: NamespacedKey,
        positions: Vein,
    },
}

impl BreakOutcome {
    /// Positions to break; only the origin when vein mining did not apply
    pub fn positions_or_origin(&self, origin: BlockPosition) -> Vein {
        match self {
            BreakOutcome::Vein { positions, .. } => positions.clone(),
            _ => Vein::from([origin]),
        }
    }
}

/// Categories, patterns and defaults of one loaded configuration
#[derive(Debug)]
pub struct VeinMiner {
    categories: CategoryRegistryData,
    patterns: PatternRegistry,
    default_activation: ActivationStrategy,
}

impl VeinMiner {
    pub fn new(
        categories: CategoryRegistryData,
        patterns: PatternRegistry,
        default_activation: ActivationStrategy,
    ) -> Self {
        Self {
            categories,
            patterns,
            default_activation,
        }
    }

    /// Validate a config and build everything it describes
    pub fn from_config(config: &VeinMinerConfig) -> ConfigResult<Self> {
        config
            .validate()
            .map_err(|e| ConfigError::Validation(format!("{:#}", e)))?;

        let categories = build_category_registry(config)?;
        let patterns = build_pattern_registry(config)?;
        let default_activation = ActivationStrategy::default_from_name(&config.default_activation_strategy);

        Ok(Self::new(categories, patterns, default_activation))
    }

    pub fn categories(&self) -> &CategoryRegistryData {
        &self.categories
    }

    pub fn patterns(&self) -> &PatternRegistry {
        &self.patterns
    }

    pub fn default_activation(&self) -> ActivationStrategy {
        self.default_activation
    }

    /// Defaults for new players, restricted to what this config knows
    pub fn preference_defaults(&self) -> PreferenceDefaults {
        PreferenceDefaults {
            activation_strategy: self.default_activation,
            pattern: self.patterns.default_key().clone(),
            known_patterns: Some(self.patterns.keys().iter().cloned().collect()),
            known_categories: Some(
                category_ids(&self.categories)
                    .into_iter()
                    .map(|id| id.to_ascii_lowercase())
                    .collect::<HashSet<_>>(),
            ),
        }
    }

    /// Decide the vein for one break event
    ///
    /// Fails only when the origin is outside the world; callers then break
    /// just the origin block.
    pub fn handle_break(
        &self,
        event: &BreakEvent,
        world: &dyn BlockAccessor,
        prefs: &PlayerPreferences,
        state: &PlayerState,
    ) -> VeinResult<BreakOutcome> {
        if !prefs.activation_strategy.is_active(state) {
            return Ok(BreakOutcome::Inactive);
        }

        let Some(category) = resolve_category(&self.categories, event.tool.as_ref(), &event.block)
        else {
            return Ok(BreakOutcome::NoCategory);
        };

        if !is_category_enabled(prefs, &category.id) {
            return Ok(BreakOutcome::CategoryDisabled {
                category: category.id.clone(),
            });
        }

        let (pattern_key, pattern) = self.patterns.get_or_default(&prefs.pattern);
        let positions = pattern.allocate(
            world,
            event.origin,
            &event.block,
            &category.config,
            category.aliases.as_ref(),
        )?;

        log::debug!(
            "[VeinMiner::handle_break] {} broke {} at {}: {} blocks via {} ({})",
            prefs.player_id,
            event.block,
            event.origin,
            positions.len(),
            category.id,
            pattern_key
        );

        Ok(BreakOutcome::Vein {
            category,
            pattern: pattern_key,
            positions,
        })
    }
}
