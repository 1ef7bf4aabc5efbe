//! Block identities and configured block lists
//!
//! - **Keys**: `namespace:name` values shared by blocks, items and patterns
//! - **States**: interned block identities, concrete states and predicates
//! - **Lists**: named collections answering "does this block count?"

pub mod block_cache;
mod block_list_data;
pub mod block_list_operations;
mod block_state;
mod namespaced_key;

pub use block_list_data::{BlockList, EntryRule, VeinMinerBlock};
pub use block_state::{parse_block_selector, BlockIdentity, BlockState, StatePredicate};
pub use namespaced_key::NamespacedKey;
