//! Tool categories and the registry resolving a break to one of them
//!
//! A category bundles the tools it applies to, the blocks it vein-mines and
//! the allocation settings used for them. Lookup is by case-insensitive id;
//! resolution walks categories in priority order.

mod registry_data;
pub mod registry_operations;
mod tool_category;

pub use registry_data::CategoryRegistryData;
pub use registry_operations::{
    categories_for_tool, category_count, category_ids, create_category_registry, get_category,
    register_category, resolve_category,
};
pub use tool_category::{ToolCategory, ToolQualifier};
