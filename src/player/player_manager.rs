//! Online player sessions and their preference lifecycle
//!
//! Preferences are created when a player joins, replaced by the stored record
//! once its load completes, and persisted when the player leaves. A record is
//! evicted only after it is known to be on disk, so a failed save on
//! disconnect keeps the dirty record around for the next `save_all`.

use std::collections::HashMap;

use futures::future::join_all;
use parking_lot::RwLock;

use super::preferences_operations::{
    create_preferences, is_dirty, mark_persisted, revoke_client_activation,
    set_activation_strategy,
};
use super::{PlayerId, PlayerPreferences, PreferenceDefaults};
use crate::activation::ActivationStrategy;
use crate::error::{OptionExt, VeinError, VeinResult};
use crate::persistence::{PersistenceResult, PreferenceBackend, PreferenceStore, SaveReceipt};

#[derive(Debug)]
struct PlayerSession {
    preferences: PlayerPreferences,
    online: bool,
    client_mod: bool,
    /// Replaces a stored `Client` strategy while the mod is absent
    fallback: ActivationStrategy,
}

/// Preferences of online players and of offline players still being saved
#[derive(Debug, Default)]
pub struct PlayerManager {
    sessions: RwLock<HashMap<PlayerId, PlayerSession>>,
}

impl PlayerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session
    ///
    /// Returns true when fresh defaults were created and the stored record
    /// should be loaded; false when a record retained from an earlier session
    /// (still being saved) was reused.
    pub fn join(&self, player: PlayerId, defaults: &PreferenceDefaults) -> bool {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get_mut(&player) {
            session.online = true;
            log::debug!("[PlayerManager::join] {} rejoined, reusing retained preferences", player);
            return false;
        }

        log::debug!("[PlayerManager::join] {} joined", player);
        let preferences = create_preferences(player.clone(), defaults);
        let fallback = preferences.activation_strategy;
        sessions.insert(
            player,
            PlayerSession {
                preferences,
                online: true,
                client_mod: false,
                fallback,
            },
        );
        true
    }

    /// Install preferences produced by a store load
    ///
    /// Discarded when the player has left or changed anything since joining.
    /// A stored `Client` strategy is revoked unless the client mod is present.
    pub fn apply_loaded(&self, mut loaded: PlayerPreferences) -> bool {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get_mut(&loaded.player_id) else {
            log::debug!(
                "[PlayerManager::apply_loaded] {} is gone, discarding loaded preferences",
                loaded.player_id
            );
            return false;
        };
        if !session.online || is_dirty(&session.preferences) {
            log::debug!(
                "[PlayerManager::apply_loaded] Keeping live preferences of {}",
                loaded.player_id
            );
            return false;
        }

        if !session.client_mod {
            revoke_client_activation(&mut loaded, session.fallback);
        }
        session.preferences = loaded;
        true
    }

    pub fn is_online(&self, player: &PlayerId) -> bool {
        self.sessions
            .read()
            .get(player)
            .map_or(false, |session| session.online)
    }

    pub fn online_count(&self) -> usize {
        self.sessions.read().values().filter(|session| session.online).count()
    }

    /// Sessions held, offline ones awaiting a save included
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Clone of a player's preferences
    pub fn preferences(&self, player: &PlayerId) -> Option<PlayerPreferences> {
        self.with_preferences(player, |prefs| prefs.clone())
    }

    pub fn with_preferences<R>(
        &self,
        player: &PlayerId,
        f: impl FnOnce(&PlayerPreferences) -> R,
    ) -> Option<R> {
        self.sessions.read().get(player).map(|session| f(&session.preferences))
    }

    pub fn with_preferences_mut<R>(
        &self,
        player: &PlayerId,
        f: impl FnOnce(&mut PlayerPreferences) -> R,
    ) -> Option<R> {
        self.sessions
            .write()
            .get_mut(player)
            .map(|session| f(&mut session.preferences))
    }

    /// Record whether the player's client mod completed its handshake
    ///
    /// Losing the mod replaces a `Client` strategy with `fallback`.
    pub fn set_client_mod(
        &self,
        player: &PlayerId,
        installed: bool,
        fallback: ActivationStrategy,
    ) -> VeinResult<()> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(player).ok_or_vein(|| not_found(player))?;
        session.client_mod = installed;
        if !installed {
            revoke_client_activation(&mut session.preferences, fallback);
        }
        Ok(())
    }

    pub fn has_client_mod(&self, player: &PlayerId) -> bool {
        self.sessions
            .read()
            .get(player)
            .map_or(false, |session| session.client_mod)
    }

    /// Change the strategy, checking `Client` against the session's mod state
    pub fn set_activation_strategy(
        &self,
        player: &PlayerId,
        strategy: ActivationStrategy,
    ) -> VeinResult<bool> {
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(player).ok_or_vein(|| not_found(player))?;
        let client_mod = session.client_mod;
        Ok(set_activation_strategy(&mut session.preferences, strategy, client_mod)?)
    }

    /// End a session, persisting the player's preferences
    ///
    /// Clean preferences are evicted at once. Otherwise the save runs to
    /// completion even if the player rejoins meanwhile; the record is evicted
    /// only if the player is still offline and clean afterwards. On failure
    /// the record stays, still dirty.
    pub async fn disconnect<B: PreferenceBackend>(
        &self,
        player: &PlayerId,
        store: &PreferenceStore<B>,
    ) -> PersistenceResult<()> {
        let pending = {
            let mut sessions = self.sessions.write();
            let Some(session) = sessions.get_mut(player) else {
                return Ok(());
            };
            session.online = false;

            if is_dirty(&session.preferences) {
                store.save(&session.preferences)
            } else {
                sessions.remove(player);
                store.release(player);
                log::debug!("[PlayerManager::disconnect] {} left with nothing to save", player);
                return Ok(());
            }
        };

        match pending.await {
            Ok(receipt) => {
                if self.finish_save(&receipt) {
                    store.release(player);
                }
                log::info!("[PlayerManager::disconnect] Saved preferences of {}", player);
                Ok(())
            }
            Err(e) => {
                log::error!(
                    "[PlayerManager::disconnect] Failed to save {}, keeping preferences in memory: {}",
                    player,
                    e
                );
                Err(e)
            }
        }
    }

    /// Persist every dirty record; returns how many were written
    ///
    /// Every save is attempted. The first failure is returned after the
    /// successful saves have been applied.
    pub async fn save_all<B: PreferenceBackend>(
        &self,
        store: &PreferenceStore<B>,
    ) -> PersistenceResult<usize> {
        let pending: Vec<_> = {
            let sessions = self.sessions.read();
            sessions
                .values()
                .filter(|session| is_dirty(&session.preferences))
                .map(|session| store.save(&session.preferences))
                .collect()
        };
        if pending.is_empty() {
            return Ok(0);
        }

        let mut saved = 0;
        let mut first_error = None;
        for result in join_all(pending).await {
            match result {
                Ok(receipt) => {
                    saved += 1;
                    if self.finish_save(&receipt) {
                        store.release(&receipt.player);
                    }
                }
                Err(e) => {
                    log::error!("[PlayerManager::save_all] Save failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        log::info!("[PlayerManager::save_all] Saved {} player records", saved);
        match first_error {
            Some(e) => Err(e),
            None => Ok(saved),
        }
    }

    /// Apply a receipt; true when the record was evicted
    fn finish_save(&self, receipt: &SaveReceipt) -> bool {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get_mut(&receipt.player) else {
            return false;
        };
        let clean = mark_persisted(&mut session.preferences, receipt.revision);
        if clean && !session.online {
            sessions.remove(&receipt.player);
            return true;
        }
        false
    }
}

fn not_found(player: &PlayerId) -> VeinError {
    VeinError::ResourceNotFound {
        resource_type: "player session".to_string(),
        id: player.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::NamespacedKey;
    use crate::persistence::JsonDirectoryBackend;
    use crate::player::preferences_operations::{set_category_enabled, set_pattern};
    use parking_lot::Mutex;
    use std::io;
    use std::sync::mpsc;
    use tempfile::TempDir;

    struct FailingBackend;

    impl PreferenceBackend for FailingBackend {
        fn read(&self, _player: &PlayerId) -> io::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn write(&self, _player: &PlayerId, _contents: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    /// Holds every write until the test releases it
    struct GatedBackend {
        started: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl PreferenceBackend for GatedBackend {
        fn read(&self, _player: &PlayerId) -> io::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn write(&self, _player: &PlayerId, _contents: &[u8]) -> io::Result<()> {
            let _ = self.started.lock().send(());
            self.release
                .lock()
                .recv()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "gate dropped"))
        }
    }

    fn player(id: &str) -> PlayerId {
        PlayerId::new(id).expect("valid id")
    }

    fn json_store(dir: &TempDir) -> PreferenceStore<JsonDirectoryBackend> {
        PreferenceStore::new(JsonDirectoryBackend::new(dir.path()), PreferenceDefaults::default())
            .expect("runtime")
    }

    #[test]
    fn test_join_and_rejoin() {
        let manager = PlayerManager::new();
        let defaults = PreferenceDefaults::default();

        assert!(manager.join(player("alex"), &defaults));
        assert!(!manager.join(player("alex"), &defaults));
        assert!(manager.is_online(&player("alex")));
        assert_eq!(manager.online_count(), 1);
    }

    #[test]
    fn test_apply_loaded_respects_local_changes() {
        let manager = PlayerManager::new();
        let defaults = PreferenceDefaults::default();
        let alex = player("alex");
        manager.join(alex.clone(), &defaults);

        let mut stored = create_preferences(alex.clone(), &defaults);
        stored.activation_strategy = ActivationStrategy::Always;
        assert!(manager.apply_loaded(stored.clone()));
        assert_eq!(
            manager.preferences(&alex).map(|prefs| prefs.activation_strategy),
            Some(ActivationStrategy::Always)
        );

        manager.with_preferences_mut(&alex, |prefs| set_category_enabled(prefs, "axe", false));
        assert!(!manager.apply_loaded(stored));
        assert!(!manager.apply_loaded(create_preferences(player("ghost"), &defaults)));
    }

    #[test]
    fn test_loaded_client_strategy_needs_mod() {
        let manager = PlayerManager::new();
        let defaults = PreferenceDefaults::default();
        let alex = player("alex");
        let steve = player("steve");
        manager.join(alex.clone(), &defaults);
        manager.join(steve.clone(), &defaults);
        manager
            .set_client_mod(&alex, false, ActivationStrategy::Sneak)
            .expect("session exists");
        manager
            .set_client_mod(&steve, true, ActivationStrategy::Sneak)
            .expect("session exists");

        let mut stored = create_preferences(alex.clone(), &defaults);
        stored.activation_strategy = ActivationStrategy::Client;
        assert!(manager.apply_loaded(stored));
        assert_eq!(
            manager.preferences(&alex).map(|prefs| prefs.activation_strategy),
            Some(ActivationStrategy::Sneak)
        );
        assert_eq!(manager.with_preferences(&alex, is_dirty), Some(true));

        let mut stored = create_preferences(steve.clone(), &defaults);
        stored.activation_strategy = ActivationStrategy::Client;
        assert!(manager.apply_loaded(stored));
        assert_eq!(
            manager.preferences(&steve).map(|prefs| prefs.activation_strategy),
            Some(ActivationStrategy::Client)
        );
    }

    #[test]
    fn test_client_strategy_follows_mod_state() {
        let manager = PlayerManager::new();
        let alex = player("alex");
        manager.join(alex.clone(), &PreferenceDefaults::default());

        assert!(manager.set_activation_strategy(&alex, ActivationStrategy::Client).is_err());
        manager
            .set_client_mod(&alex, true, ActivationStrategy::Sneak)
            .expect("session exists");
        assert!(manager
            .set_activation_strategy(&alex, ActivationStrategy::Client)
            .expect("allowed"));

        manager
            .set_client_mod(&alex, false, ActivationStrategy::Sneak)
            .expect("session exists");
        assert_eq!(
            manager.preferences(&alex).map(|prefs| prefs.activation_strategy),
            Some(ActivationStrategy::Sneak)
        );
        assert!(matches!(
            manager.set_activation_strategy(&player("ghost"), ActivationStrategy::Always),
            Err(VeinError::ResourceNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_clean_disconnect_evicts_without_writing() {
        let dir = TempDir::new().expect("temp dir");
        let store = json_store(&dir);
        let manager = PlayerManager::new();
        let alex = player("alex");
        manager.join(alex.clone(), &store.defaults());

        manager.disconnect(&alex, &store).await.expect("disconnect");
        assert_eq!(manager.session_count(), 0);
        assert!(!dir.path().join("alex.json").exists());
    }

    #[tokio::test]
    async fn test_dirty_disconnect_saves_then_evicts() {
        let dir = TempDir::new().expect("temp dir");
        let store = json_store(&dir);
        let manager = PlayerManager::new();
        let alex = player("alex");
        manager.join(alex.clone(), &store.defaults());
        manager.with_preferences_mut(&alex, |prefs| {
            set_pattern(prefs, NamespacedKey::parse("veinminer:layer").expect("valid key"))
        });

        manager.disconnect(&alex, &store).await.expect("disconnect");
        assert_eq!(manager.session_count(), 0);
        assert_eq!(store.queue_count(), 0);

        let loaded = store.load(&alex).await.expect("load");
        assert_eq!(loaded.pattern.to_string(), "veinminer:layer");
    }

    #[tokio::test]
    async fn test_rejoin_during_save_keeps_record() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let backend = GatedBackend {
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        };
        let store = PreferenceStore::new(backend, PreferenceDefaults::default()).expect("runtime");
        let manager = PlayerManager::new();
        let defaults = store.defaults();
        let alex = player("alex");
        manager.join(alex.clone(), &defaults);
        manager.with_preferences_mut(&alex, |prefs| {
            set_pattern(prefs, NamespacedKey::parse("veinminer:layer").expect("valid key"))
        });

        let (saved, rejoined) = tokio::join!(manager.disconnect(&alex, &store), async {
            tokio::task::spawn_blocking(move || started_rx.recv())
                .await
                .expect("waiter")
                .expect("write started");
            let rejoined = manager.join(alex.clone(), &defaults);
            release_tx.send(()).expect("release write");
            rejoined
        });

        saved.expect("save completes");
        assert!(!rejoined);
        assert!(manager.is_online(&alex));
        assert_eq!(manager.session_count(), 1);
        assert_eq!(
            manager.preferences(&alex).map(|prefs| prefs.pattern.to_string()),
            Some("veinminer:layer".to_string())
        );
        assert_eq!(manager.with_preferences(&alex, is_dirty), Some(false));
    }

    #[tokio::test]
    async fn test_failed_disconnect_keeps_dirty_record() {
        let store =
            PreferenceStore::new(FailingBackend, PreferenceDefaults::default()).expect("runtime");
        let manager = PlayerManager::new();
        let alex = player("alex");
        manager.join(alex.clone(), &store.defaults());
        manager.with_preferences_mut(&alex, |prefs| set_category_enabled(prefs, "hoe", false));

        assert!(manager.disconnect(&alex, &store).await.is_err());
        assert!(!manager.is_online(&alex));
        assert_eq!(manager.with_preferences(&alex, is_dirty), Some(true));

        assert!(manager.save_all(&store).await.is_err());
        assert_eq!(manager.session_count(), 1);
    }

    #[tokio::test]
    async fn test_save_all_writes_only_dirty_records() {
        let dir = TempDir::new().expect("temp dir");
        let store = json_store(&dir);
        let manager = PlayerManager::new();
        let defaults = store.defaults();
        for id in ["alex", "steve", "noor"] {
            manager.join(player(id), &defaults);
        }
        manager.with_preferences_mut(&player("steve"), |prefs| {
            set_category_enabled(prefs, "axe", false)
        });

        assert_eq!(manager.save_all(&store).await.expect("save all"), 1);
        assert!(dir.path().join("steve.json").exists());
        assert!(!dir.path().join("alex.json").exists());
        assert_eq!(manager.with_preferences(&player("steve"), is_dirty), Some(false));

        assert_eq!(manager.save_all(&store).await.expect("save all"), 0);
    }
}
