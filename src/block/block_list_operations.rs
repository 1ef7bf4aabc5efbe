//! Block List Operations - Pure DOP Functions
//!
//! Lists are mutated only while a config is being loaded; during allocation
//! they are read through `contains`.

use std::collections::HashMap;

use super::block_list_data::{BlockList, EntryRule, VeinMinerBlock};
use super::block_state::parse_block_selector;
use super::{BlockIdentity, BlockState, StatePredicate};
use crate::config::ConfigResult;

/// Create an empty block list
pub fn create_block_list(name: &str) -> BlockList {
    BlockList {
        name: name.to_string(),
        order: Vec::new(),
        rules: HashMap::new(),
    }
}

/// Add an entry, returning whether the list changed
///
/// Most-general-wins: an unfiltered entry replaces any filtered entries for
/// the same identity, and a filtered entry is a no-op once the identity is
/// unfiltered. Identical filtered entries are stored once.
pub fn add(list: &mut BlockList, identity: BlockIdentity, predicate: Option<StatePredicate>) -> bool {
    match list.rules.get_mut(&identity) {
        None => {
            let rule = match predicate {
                Some(predicate) => EntryRule::States(vec![predicate]),
                None => EntryRule::AnyState,
            };
            list.order.push(identity.clone());
            list.rules.insert(identity, rule);
            true
        }
        Some(rule) => {
            let EntryRule::States(predicates) = rule else {
                return false;
            };
            match predicate {
                None => {
                    *rule = EntryRule::AnyState;
                    true
                }
                Some(predicate) if predicates.contains(&predicate) => false,
                Some(predicate) => {
                    predicates.push(predicate);
                    true
                }
            }
        }
    }
}

/// Add a parsed entry
pub fn add_block(list: &mut BlockList, block: VeinMinerBlock) -> bool {
    add(list, block.identity, block.predicate)
}

/// Parse `namespace:name[props]` and add it
pub fn add_selector(list: &mut BlockList, selector: &str) -> ConfigResult<bool> {
    let (identity, predicate) = parse_block_selector(selector)?;
    Ok(add(list, identity, predicate))
}

/// Remove every entry for `identity`, returning whether anything was removed
pub fn remove(list: &mut BlockList, identity: &BlockIdentity) -> bool {
    if list.rules.remove(identity).is_none() {
        return false;
    }
    list.order.retain(|existing| existing != identity);
    true
}

/// True if `state` matches an entry of the list
pub fn contains(list: &BlockList, state: &BlockState) -> bool {
    match list.rules.get(state.identity()) {
        Some(EntryRule::AnyState) => true,
        Some(EntryRule::States(predicates)) => predicates.iter().any(|p| p.matches(state)),
        None => false,
    }
}

/// True if the list has any entry (filtered or not) for `identity`
pub fn contains_identity(list: &BlockList, identity: &BlockIdentity) -> bool {
    list.rules.contains_key(identity)
}

/// The first entry matching `state`, in insertion order
pub fn matching_entry(list: &BlockList, state: &BlockState) -> Option<VeinMinerBlock> {
    match list.rules.get(state.identity())? {
        EntryRule::AnyState => Some(VeinMinerBlock {
            identity: state.identity().clone(),
            predicate: None,
        }),
        EntryRule::States(predicates) => predicates
            .iter()
            .find(|p| p.matches(state))
            .map(|p| VeinMinerBlock {
                identity: state.identity().clone(),
                predicate: Some(p.clone()),
            }),
    }
}

/// All entries, identities in insertion order
pub fn entries(list: &BlockList) -> Vec<VeinMinerBlock> {
    let mut result = Vec::with_capacity(list.order.len());
    for identity in &list.order {
        match list.rules.get(identity) {
            Some(EntryRule::AnyState) => result.push(VeinMinerBlock {
                identity: identity.clone(),
                predicate: None,
            }),
            Some(EntryRule::States(predicates)) => {
                result.extend(predicates.iter().map(|p| VeinMinerBlock {
                    identity: identity.clone(),
                    predicate: Some(p.clone()),
                }));
            }
            None => {}
        }
    }
    result
}

/// Number of distinct identities in the list
pub fn len(list: &BlockList) -> usize {
    list.order.len()
}

pub fn is_empty(list: &BlockList) -> bool {
    list.order.is_empty()
}

/// Build a list from config selectors; the first malformed selector fails the whole list
pub fn parse_block_list<S: AsRef<str>>(name: &str, selectors: &[S]) -> ConfigResult<BlockList> {
    let mut list = create_block_list(name);
    for selector in selectors {
        let selector = selector.as_ref();
        if !add_selector(&mut list, selector)? {
            log::debug!(
                "[BlockList::parse] '{}' in list '{}' is covered by an earlier entry",
                selector,
                name
            );
        }
    }
    log::debug!(
        "[BlockList::parse] Built list '{}' with {} block types",
        name,
        len(&list)
    );
    Ok(list)
}
