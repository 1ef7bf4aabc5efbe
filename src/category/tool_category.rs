use std::fmt;

use crate::block::block_list_operations;
use crate::block::{BlockList, BlockState, NamespacedKey};
use crate::pattern::VeinMiningConfig;

/// Which held items a category applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolQualifier {
    /// Any held item, or none
    Any,
    /// Only an empty hand
    Hand,
    /// Only the listed items
    Items(Vec<NamespacedKey>),
}

impl ToolQualifier {
    /// Whether `tool` qualifies; `None` is an empty hand
    pub fn matches(&self, tool: Option<&NamespacedKey>) -> bool {
        match (self, tool) {
            (ToolQualifier::Any, _) => true,
            (ToolQualifier::Hand, tool) => tool.is_none(),
            (ToolQualifier::Items(items), Some(tool)) => items.contains(tool),
            (ToolQualifier::Items(_), None) => false,
        }
    }
}

impl fmt::Display for ToolQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolQualifier::Any => f.write_str("any"),
            ToolQualifier::Hand => f.write_str("hand"),
            ToolQualifier::Items(items) => {
                let names: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

/// A named configuration bundle, immutable once registered
#[derive(Debug, Clone)]
pub struct ToolCategory {
    /// Unique id; compared case-insensitively
    pub id: String,
    /// Lower wins
    pub priority: i32,
    pub tools: ToolQualifier,
    /// Included blocks and allocation settings
    pub config: VeinMiningConfig,
    /// Blocks that connect vein blocks without being mined
    pub aliases: Option<BlockList>,
}

impl ToolCategory {
    pub fn new(id: &str, tools: ToolQualifier, config: VeinMiningConfig) -> Self {
        Self {
            id: id.to_string(),
            priority: 0,
            tools,
            config,
            aliases: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_aliases(mut self, aliases: BlockList) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Tool qualifies and the block is in the included list
    pub fn applies_to(&self, tool: Option<&NamespacedKey>, block: &BlockState) -> bool {
        self.tools.matches(tool) && block_list_operations::contains(&self.config.blocks, block)
    }

    /// Case-insensitive id comparison
    pub fn has_id(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> NamespacedKey {
        NamespacedKey::parse(name).expect("valid key")
    }

    #[test]
    fn test_qualifier_matching() {
        let pickaxe = item("diamond_pickaxe");
        let shovel = item("iron_shovel");
        let items = ToolQualifier::Items(vec![pickaxe.clone()]);

        assert!(ToolQualifier::Any.matches(None));
        assert!(ToolQualifier::Any.matches(Some(&shovel)));
        assert!(ToolQualifier::Hand.matches(None));
        assert!(!ToolQualifier::Hand.matches(Some(&pickaxe)));
        assert!(items.matches(Some(&pickaxe)));
        assert!(!items.matches(Some(&shovel)));
        assert!(!items.matches(None));
    }

    #[test]
    fn test_applies_to_requires_tool_and_block() {
        let blocks = block_list_operations::parse_block_list("ores", &["gold_ore"]).expect("valid list");
        let category = ToolCategory::new(
            "Pickaxe",
            ToolQualifier::Items(vec![item("diamond_pickaxe")]),
            VeinMiningConfig::new(blocks),
        );
        let gold = BlockState::parse("gold_ore").expect("valid state");
        let dirt = BlockState::parse("dirt").expect("valid state");

        assert!(category.applies_to(Some(&item("diamond_pickaxe")), &gold));
        assert!(!category.applies_to(Some(&item("diamond_pickaxe")), &dirt));
        assert!(!category.applies_to(None, &gold));
        assert!(category.has_id("pickaxe"));
    }
}
