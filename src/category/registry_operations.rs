//! Category Registry Operations
//!
//! Free functions over `CategoryRegistryData`.

use std::sync::Arc;

use super::registry_data::CategoryRegistryData;
use super::ToolCategory;
use crate::block::{BlockState, NamespacedKey};
use crate::config::{ConfigError, ConfigResult};

/// Create an empty category registry
pub fn create_category_registry() -> CategoryRegistryData {
    CategoryRegistryData::default()
}

/// Register a category; ids are unique ignoring case
pub fn register_category(
    data: &mut CategoryRegistryData,
    category: ToolCategory,
) -> ConfigResult<Arc<ToolCategory>> {
    let lookup = category.id.to_ascii_lowercase();
    if data.by_id.contains_key(&lookup) {
        log::error!(
            "[CategoryRegistry::register] Category '{}' is already registered",
            category.id
        );
        return Err(ConfigError::DuplicateCategory { id: category.id });
    }

    let index = data.categories.len();
    let category = Arc::new(category);
    data.categories.push(Arc::clone(&category));
    data.by_id.insert(lookup, index);

    // Stable sort keeps declaration order among equal priorities
    data.match_order.push(index);
    let categories = &data.categories;
    data.match_order.sort_by_key(|&i| categories[i].priority);

    log::debug!(
        "[CategoryRegistry::register] Registered category '{}' (priority {}, tools {})",
        category.id,
        category.priority,
        category.tools
    );

    Ok(category)
}

/// Look up a category by id, ignoring case
pub fn get_category(data: &CategoryRegistryData, id: &str) -> Option<Arc<ToolCategory>> {
    data.by_id
        .get(&id.to_ascii_lowercase())
        .and_then(|&index| data.categories.get(index))
        .cloned()
}

/// The highest-priority category whose tools match `tool` and whose blocks
/// include `block`
pub fn resolve_category(
    data: &CategoryRegistryData,
    tool: Option<&NamespacedKey>,
    block: &BlockState,
) -> Option<Arc<ToolCategory>> {
    data.match_order
        .iter()
        .map(|&index| &data.categories[index])
        .find(|category| category.applies_to(tool, block))
        .cloned()
}

/// Categories usable with `tool`, in priority order
pub fn categories_for_tool(
    data: &CategoryRegistryData,
    tool: Option<&NamespacedKey>,
) -> Vec<Arc<ToolCategory>> {
    data.match_order
        .iter()
        .map(|&index| &data.categories[index])
        .filter(|category| category.tools.matches(tool))
        .cloned()
        .collect()
}

/// Category ids in declaration order
pub fn category_ids(data: &CategoryRegistryData) -> Vec<String> {
    data.categories
        .iter()
        .map(|category| category.id.clone())
        .collect()
}

pub fn category_count(data: &CategoryRegistryData) -> usize {
    data.categories.len()
}

pub fn is_empty(data: &CategoryRegistryData) -> bool {
    data.categories.is_empty()
}
