//! Configuration Data
//!
//! Serde mirror of the config document. Values stay textual here and are
//! turned into typed registries by config_operations.rs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::block::NamespacedKey;
use crate::constants::allocation::DEFAULT_MAX_VEIN_SIZE;
use crate::constants::keys::PATTERN_NAMESPACE;
use crate::constants::{patterns, storage};
use crate::pattern::{Connectivity, VeinMembership};

/// Tool entry matching every held item
pub const ANY_TOOL: &str = "*";
/// Tool entry matching an empty hand
pub const HAND: &str = "hand";

/// Whole config document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VeinMinerConfig {
    /// Activation strategy of players without a stored preference
    pub default_activation_strategy: String,
    /// Pattern of players without a stored preference
    pub default_pattern: String,
    /// Max vein size of categories that do not set one; 0 is unbounded
    pub default_max_vein_size: u32,
    pub default_connectivity: Connectivity,
    pub default_membership: VeinMembership,
    /// Directory of the per-player preference files
    pub storage_directory: PathBuf,
    #[serde(rename = "category")]
    pub categories: Vec<CategoryConfig>,
}

impl Default for VeinMinerConfig {
    fn default() -> Self {
        Self {
            default_activation_strategy: "sneak".to_string(),
            default_pattern: format!("{}:{}", PATTERN_NAMESPACE, patterns::FLOOD_FILL),
            default_max_vein_size: DEFAULT_MAX_VEIN_SIZE,
            default_connectivity: Connectivity::default(),
            default_membership: VeinMembership::default(),
            storage_directory: PathBuf::from(storage::DEFAULT_DIRECTORY),
            categories: Vec::new(),
        }
    }
}

/// One `[[category]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryConfig {
    pub id: String,
    /// Lower wins
    #[serde(default)]
    pub priority: i32,
    pub max_vein_size: Option<u32>,
    pub connectivity: Option<Connectivity>,
    pub membership: Option<VeinMembership>,
    /// Item keys, `"*"` for any item or `"hand"` for an empty hand; empty means any
    #[serde(default)]
    pub tools: Vec<String>,
    pub blocks: Vec<String>,
    /// Blocks that connect vein blocks without being mined
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl VeinMinerConfig {
    /// Structural checks that need no registry
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = NamespacedKey::parse(&self.default_pattern) {
            return Err(anyhow::anyhow!("VeinMinerConfig: default_pattern: {}", e));
        }

        if self.storage_directory.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("VeinMinerConfig: storage_directory cannot be empty"));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            category.validate()?;
            if !seen.insert(category.id.to_ascii_lowercase()) {
                return Err(anyhow::anyhow!(
                    "VeinMinerConfig: category id '{}' is declared more than once",
                    category.id
                ));
            }
        }

        log::debug!(
            "[VeinMinerConfig] Validation: {} categories, default pattern {}, default max vein size {}",
            self.categories.len(),
            self.default_pattern,
            self.default_max_vein_size
        );
        Ok(())
    }
}

impl CategoryConfig {
    pub fn validate(&self) -> Result<()> {
        let valid_id = !self.id.is_empty()
            && self
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid_id {
            return Err(anyhow::anyhow!(
                "CategoryConfig: id '{}' must be non-empty and use only letters, digits, '_' or '-'",
                self.id
            ));
        }

        if self.blocks.is_empty() {
            return Err(anyhow::anyhow!("CategoryConfig '{}': blocks cannot be empty", self.id));
        }

        let special = self
            .tools
            .iter()
            .filter(|tool| is_special_tool(tool))
            .count();
        if special > 0 && self.tools.len() > 1 {
            return Err(anyhow::anyhow!(
                "CategoryConfig '{}': '{}' and '{}' cannot be combined with other tools",
                self.id,
                ANY_TOOL,
                HAND
            ));
        }

        Ok(())
    }
}

pub(super) fn is_special_tool(tool: &str) -> bool {
    let tool = tool.trim();
    tool == ANY_TOOL || tool.eq_ignore_ascii_case(HAND)
}
