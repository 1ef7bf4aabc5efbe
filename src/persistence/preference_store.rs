//! Asynchronous preference store with one storage queue per player
//!
//! ```text
//!   PreferenceStore            mpsc (per player)     queue task
//!   ┌──────────────┐  ────────────────────────▶  ┌──────────────────────┐
//!   │ .save()      │                             │ spawn_blocking(write)│
//!   │ .load()      │  ◀────────────────────────  │ spawn_blocking(read) │
//!   └──────────────┘          oneshot            └──────────────────────┘
//! ```
//!
//! Jobs for one player run strictly in submission order; different players'
//! queues run concurrently. Releasing a player drops the queue's sender, so
//! jobs already queued still finish before the queue task exits.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{try_join_all, TryJoinAll};
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task;

use super::task::PersistenceTask;
use super::{record, PersistenceError, PersistenceResult, PreferenceBackend};
use crate::player::preferences_operations::{create_preferences, is_dirty, snapshot};
use crate::player::{PlayerId, PlayerPreferences, PreferenceDefaults, PreferenceSnapshot};

/// Proof that a snapshot reached storage
///
/// Pass `revision` to `preferences_operations::mark_persisted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub player: PlayerId,
    pub revision: u64,
}

enum StorageJob {
    Save {
        snapshot: PreferenceSnapshot,
        reply: oneshot::Sender<PersistenceResult<SaveReceipt>>,
    },
    Load {
        reply: oneshot::Sender<PersistenceResult<PlayerPreferences>>,
    },
}

pub struct PreferenceStore<B: PreferenceBackend> {
    backend: Arc<B>,
    defaults: Arc<RwLock<PreferenceDefaults>>,
    queues: DashMap<PlayerId, mpsc::UnboundedSender<StorageJob>>,
    runtime: Handle,
}

impl<B: PreferenceBackend> PreferenceStore<B> {
    /// Store running its queues on the current tokio runtime
    pub fn new(backend: B, defaults: PreferenceDefaults) -> PersistenceResult<Self> {
        let runtime = Handle::try_current().map_err(|_| PersistenceError::RuntimeUnavailable)?;
        Ok(Self::with_runtime(backend, defaults, runtime))
    }

    /// Store running its queues on `runtime`
    pub fn with_runtime(backend: B, defaults: PreferenceDefaults, runtime: Handle) -> Self {
        Self {
            backend: Arc::new(backend),
            defaults: Arc::new(RwLock::new(defaults)),
            queues: DashMap::new(),
            runtime,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn defaults(&self) -> PreferenceDefaults {
        self.defaults.read().clone()
    }

    /// Replace the defaults used by loads submitted from now on
    pub fn set_defaults(&self, defaults: PreferenceDefaults) {
        *self.defaults.write() = defaults;
    }

    /// Load a player's preferences
    ///
    /// Resolves to defaults when the player has no record, or when the record
    /// is not a JSON object (the file is left untouched). Read failures are
    /// errors.
    pub fn load(&self, player: &PlayerId) -> PersistenceTask<PlayerPreferences> {
        let (reply, receiver) = oneshot::channel();
        match self.submit(player, StorageJob::Load { reply }) {
            Ok(()) => PersistenceTask::pending(receiver),
            Err(e) => PersistenceTask::ready(Err(e)),
        }
    }

    /// Save a player's preferences
    ///
    /// Clean preferences resolve immediately without touching storage. The
    /// caller's preferences are never modified; apply the receipt with
    /// `mark_persisted` once it arrives.
    pub fn save(&self, prefs: &PlayerPreferences) -> PersistenceTask<SaveReceipt> {
        if !is_dirty(prefs) {
            return PersistenceTask::ready(Ok(SaveReceipt {
                player: prefs.player_id.clone(),
                revision: prefs.revision,
            }));
        }

        let (reply, receiver) = oneshot::channel();
        let job = StorageJob::Save {
            snapshot: snapshot(prefs),
            reply,
        };
        match self.submit(&prefs.player_id, job) {
            Ok(()) => PersistenceTask::pending(receiver),
            Err(e) => PersistenceTask::ready(Err(e)),
        }
    }

    /// Load several players; jobs are queued before this returns
    pub fn load_all<'a, I>(&self, players: I) -> TryJoinAll<PersistenceTask<PlayerPreferences>>
    where
        I: IntoIterator<Item = &'a PlayerId>,
    {
        try_join_all(players.into_iter().map(|player| self.load(player)))
    }

    /// Save several players; clean ones complete without storage access
    pub fn save_all<'a, I>(&self, prefs: I) -> TryJoinAll<PersistenceTask<SaveReceipt>>
    where
        I: IntoIterator<Item = &'a PlayerPreferences>,
    {
        try_join_all(prefs.into_iter().map(|prefs| self.save(prefs)))
    }

    /// Retire a player's queue once its pending jobs finish
    pub fn release(&self, player: &PlayerId) {
        if self.queues.remove(player).is_some() {
            log::debug!("[PreferenceStore::release] Released storage queue for {}", player);
        }
    }

    /// Number of players with a live storage queue
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    fn submit(&self, player: &PlayerId, job: StorageJob) -> PersistenceResult<()> {
        let sender = self
            .queues
            .entry(player.clone())
            .or_insert_with(|| self.spawn_queue(player))
            .clone();

        let Err(mpsc::error::SendError(job)) = sender.send(job) else {
            return Ok(());
        };

        // The queue task is gone; start a fresh one
        log::warn!("[PreferenceStore::submit] Storage queue for {} had stopped, restarting", player);
        let sender = self.spawn_queue(player);
        self.queues.insert(player.clone(), sender.clone());
        sender
            .send(job)
            .map_err(|_| PersistenceError::ChannelClosed(format!("storage queue for {}", player)))
    }

    fn spawn_queue(&self, player: &PlayerId) -> mpsc::UnboundedSender<StorageJob> {
        let (sender, jobs) = mpsc::unbounded_channel();
        self.runtime.spawn(run_queue(
            player.clone(),
            Arc::clone(&self.backend),
            Arc::clone(&self.defaults),
            jobs,
        ));
        sender
    }
}

impl<B: PreferenceBackend> std::fmt::Debug for PreferenceStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("queues", &self.queues.len())
            .finish()
    }
}

async fn run_queue<B: PreferenceBackend>(
    player: PlayerId,
    backend: Arc<B>,
    defaults: Arc<RwLock<PreferenceDefaults>>,
    mut jobs: mpsc::UnboundedReceiver<StorageJob>,
) {
    log::debug!("[PreferenceStore::queue] Storage queue for {} started", player);

    while let Some(job) = jobs.recv().await {
        match job {
            StorageJob::Save { snapshot, reply } => {
                let result = write_snapshot(Arc::clone(&backend), snapshot).await;
                if let Err(e) = &result {
                    log::error!("[PreferenceStore::save] Failed to save {}: {}", player, e);
                }
                // The caller may have dropped its task
                let _ = reply.send(result);
            }
            StorageJob::Load { reply } => {
                let defaults = defaults.read().clone();
                let result = read_preferences(Arc::clone(&backend), player.clone(), defaults).await;
                if let Err(e) = &result {
                    log::error!("[PreferenceStore::load] Failed to load {}: {}", player, e);
                }
                let _ = reply.send(result);
            }
        }
    }

    log::debug!("[PreferenceStore::queue] Storage queue for {} stopped", player);
}

async fn write_snapshot<B: PreferenceBackend>(
    backend: Arc<B>,
    snapshot: PreferenceSnapshot,
) -> PersistenceResult<SaveReceipt> {
    let bytes = record::encode(&snapshot)?;
    let player = snapshot.player_id.clone();

    task::spawn_blocking(move || {
        backend
            .write(&player, &bytes)
            .map_err(|source| PersistenceError::Write {
                player: player.to_string(),
                source,
            })
    })
    .await
    .map_err(|e| PersistenceError::TaskFailed(e.to_string()))??;

    Ok(SaveReceipt {
        player: snapshot.player_id,
        revision: snapshot.revision,
    })
}

async fn read_preferences<B: PreferenceBackend>(
    backend: Arc<B>,
    player: PlayerId,
    defaults: PreferenceDefaults,
) -> PersistenceResult<PlayerPreferences> {
    let lookup = player.clone();
    let stored = task::spawn_blocking(move || backend.read(&lookup))
        .await
        .map_err(|e| PersistenceError::TaskFailed(e.to_string()))?
        .map_err(|source| PersistenceError::Read {
            player: player.to_string(),
            source,
        })?;

    let Some(bytes) = stored else {
        return Ok(create_preferences(player, &defaults));
    };

    match record::decode(player.clone(), &bytes, &defaults) {
        Ok(prefs) => Ok(prefs),
        Err(PersistenceError::CorruptedData { reason, .. }) => {
            log::warn!(
                "[PreferenceStore::load] Record for {} is corrupted ({}), using defaults and leaving it in place",
                player,
                reason
            );
            Ok(create_preferences(player, &defaults))
        }
        Err(e) => Err(e),
    }
}
