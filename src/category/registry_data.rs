//! Category Registry Data
//!
//! NO METHODS. Just data.
//! All transformations happen in registry_operations.rs

use std::collections::HashMap;
use std::sync::Arc;

use super::ToolCategory;

/// Registered categories with their lookup tables
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistryData {
    /// Categories in declaration order
    pub categories: Vec<Arc<ToolCategory>>,
    /// Lowercased id -> index into `categories`
    pub by_id: HashMap<String, usize>,
    /// Indices sorted by priority, ties in declaration order
    pub match_order: Vec<usize>,
}
