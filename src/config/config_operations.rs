//! Configuration Operations
//!
//! Parse a config document and turn it into the typed registries the
//! allocation engine runs on.

use std::fs;
use std::path::Path;

use super::config_data::{is_special_tool, CategoryConfig, VeinMinerConfig, ANY_TOOL};
use super::{ConfigError, ConfigResult};
use crate::block::block_list_operations::parse_block_list;
use crate::block::NamespacedKey;
use crate::category::{
    create_category_registry, register_category, CategoryRegistryData, ToolCategory,
    ToolQualifier,
};
use crate::pattern::{PatternRegistry, VeinMiningConfig};

/// Parse and validate a TOML config document
pub fn parse_config(text: &str) -> ConfigResult<VeinMinerConfig> {
    let config: VeinMinerConfig =
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config
        .validate()
        .map_err(|e| ConfigError::Validation(format!("{:#}", e)))?;
    Ok(config)
}

/// Read, parse and validate a TOML config file
pub fn load_config_file(path: &Path) -> ConfigResult<VeinMinerConfig> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    log::info!("[Config::load_config_file] Loading {}", path.display());
    parse_config(&text)
}

/// Turn a category's tool entries into a qualifier
///
/// No entries, or the single entry `"*"`, means any tool; `"hand"` means an
/// empty hand.
pub fn parse_tool_qualifier(category_id: &str, tools: &[String]) -> ConfigResult<ToolQualifier> {
    match tools {
        [] => Ok(ToolQualifier::Any),
        [only] if only.trim() == ANY_TOOL => Ok(ToolQualifier::Any),
        [only] if is_special_tool(only) => Ok(ToolQualifier::Hand),
        _ if tools.iter().any(|tool| is_special_tool(tool)) => Err(ConfigError::InvalidCategory {
            id: category_id.to_string(),
            reason: "'*' and 'hand' cannot be combined with other tools".to_string(),
        }),
        _ => {
            let mut items = Vec::with_capacity(tools.len());
            for tool in tools {
                let key = NamespacedKey::parse(tool)?;
                if !items.contains(&key) {
                    items.push(key);
                }
            }
            Ok(ToolQualifier::Items(items))
        }
    }
}

/// Build one category, filling unset values from the document defaults
pub fn build_category(
    config: &VeinMinerConfig,
    category: &CategoryConfig,
) -> ConfigResult<ToolCategory> {
    let tools = parse_tool_qualifier(&category.id, &category.tools)?;
    let blocks = parse_block_list(&category.id, &category.blocks)?;

    let allocation = VeinMiningConfig::new(blocks)
        .with_max_vein_size(category.max_vein_size.unwrap_or(config.default_max_vein_size))
        .with_connectivity(category.connectivity.unwrap_or(config.default_connectivity))
        .with_membership(category.membership.unwrap_or(config.default_membership));

    let mut built = ToolCategory::new(&category.id, tools, allocation).with_priority(category.priority);
    if !category.aliases.is_empty() {
        let aliases = parse_block_list(&format!("{}_aliases", category.id), &category.aliases)?;
        built = built.with_aliases(aliases);
    }
    Ok(built)
}

/// Build the category registry from every `[[category]]` table
pub fn build_category_registry(config: &VeinMinerConfig) -> ConfigResult<CategoryRegistryData> {
    let mut registry = create_category_registry();
    for category in &config.categories {
        let built = build_category(config, category).map_err(|e| match e {
            ConfigError::DuplicateCategory { .. } | ConfigError::InvalidCategory { .. } => e,
            other => ConfigError::InvalidCategory {
                id: category.id.clone(),
                reason: other.to_string(),
            },
        })?;
        register_category(&mut registry, built)?;
    }

    log::info!(
        "[Config::build_category_registry] Built {} tool categories",
        config.categories.len()
    );
    Ok(registry)
}

/// Built-in patterns with the document's default selected
pub fn build_pattern_registry(config: &VeinMinerConfig) -> ConfigResult<PatternRegistry> {
    let mut registry = PatternRegistry::with_defaults();
    let default_key = NamespacedKey::parse(&config.default_pattern)?;
    registry.set_default(default_key)?;
    Ok(registry)
}
