//! Block List Data - Pure DOP
//!
//! NO METHODS beyond entry matching. Just data.
//! All transformations happen in block_list_operations.rs

use std::collections::HashMap;
use std::fmt;

use super::{BlockIdentity, BlockState, StatePredicate};

/// One configured block: an identity plus an optional state filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VeinMinerBlock {
    pub identity: BlockIdentity,
    pub predicate: Option<StatePredicate>,
}

impl VeinMinerBlock {
    /// True if `state` is this block type and satisfies the filter (if any)
    pub fn matches(&self, state: &BlockState) -> bool {
        if state.identity() != &self.identity {
            return false;
        }
        match &self.predicate {
            Some(predicate) => predicate.matches(state),
            None => true,
        }
    }
}

impl fmt::Display for VeinMinerBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity)?;
        if let Some(predicate) = &self.predicate {
            write!(f, "{}", predicate)?;
        }
        Ok(())
    }
}

/// Match rule for one identity in a list
///
/// An unfiltered entry subsumes every filtered one for the same identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRule {
    /// Every state of the block matches
    AnyState,
    /// A state matches if any of these predicates does
    States(Vec<StatePredicate>),
}

/// Named, ordered collection of block entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    /// Name used in logs and config errors
    pub name: String,
    /// Identities in first-insertion order
    pub order: Vec<BlockIdentity>,
    /// Match rule per identity
    pub rules: HashMap<BlockIdentity, EntryRule>,
}
