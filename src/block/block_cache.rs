//! Process-lifetime interning of block identities
//!
//! Every distinct `namespace:name` is materialized once and shared from then
//! on. First access for a key is guarded by the map's shard lock; later
//! lookups are read-only. The cache is only cleared on an explicit config
//! reload.

use dashmap::DashMap;
use lazy_static::lazy_static;

use super::{BlockIdentity, NamespacedKey};

lazy_static! {
    static ref BLOCK_IDENTITIES: DashMap<NamespacedKey, BlockIdentity> = DashMap::new();
}

/// Get the interned identity for `key`, creating it on first sight
pub fn intern(key: NamespacedKey) -> BlockIdentity {
    if let Some(existing) = BLOCK_IDENTITIES.get(&key) {
        return existing.value().clone();
    }

    BLOCK_IDENTITIES
        .entry(key.clone())
        .or_insert_with(|| BlockIdentity::uncached(key))
        .value()
        .clone()
}

/// Drop every interned identity
///
/// Identities already handed out stay valid; equality is structural, so a
/// re-interned key still compares equal to an old handle.
pub fn clear() {
    let dropped = BLOCK_IDENTITIES.len();
    BLOCK_IDENTITIES.clear();
    log::debug!("[BlockCache::clear] Dropped {} interned block identities", dropped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_intern_returns_equal_identities() {
        let key = NamespacedKey::parse("cache_test:deepslate_gold_ore").expect("valid key");
        let a = intern(key.clone());
        let b = intern(key);
        assert_eq!(a, b);
    }

    #[test]
    fn test_concurrent_first_access() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                thread::spawn(|| {
                    intern(NamespacedKey::parse("cache_test:ancient_debris").expect("valid key"))
                })
            })
            .collect();

        let identities: Vec<BlockIdentity> = handles
            .into_iter()
            .map(|h| h.join().expect("intern thread panicked"))
            .collect();

        for identity in &identities[1..] {
            assert_eq!(identity, &identities[0]);
        }
    }

    #[test]
    fn test_identities_survive_clear() {
        let before = BlockIdentity::parse("cache_test:obsidian").expect("valid key");
        clear();
        let after = BlockIdentity::parse("cache_test:obsidian").expect("valid key");
        assert_eq!(before, after);
    }
}
