//! Live configuration with last-good reload semantics

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use super::config_operations::{load_config_file, parse_config};
use super::{ConfigResult, VeinMinerConfig};
use crate::block::block_cache;
use crate::vein_miner::VeinMiner;

struct LoadedConfig {
    config: Arc<VeinMinerConfig>,
    miner: Arc<VeinMiner>,
}

/// Holds the active configuration and the engine built from it
///
/// Readers take cheap `Arc` clones, so a reload never disturbs a break that
/// is being handled with the previous configuration. Hosts that persist
/// preferences should pass the new `VeinMiner::preference_defaults` to their
/// store after a successful reload.
pub struct ConfigManager {
    active: RwLock<LoadedConfig>,
}

impl ConfigManager {
    pub fn new(config: VeinMinerConfig) -> ConfigResult<Self> {
        let miner = VeinMiner::from_config(&config)?;
        log::info!(
            "[ConfigManager::new] Loaded {} tool categories",
            config.categories.len()
        );
        Ok(Self {
            active: RwLock::new(LoadedConfig {
                config: Arc::new(config),
                miner: Arc::new(miner),
            }),
        })
    }

    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        Self::new(parse_config(text)?)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        Self::new(load_config_file(path)?)
    }

    pub fn config(&self) -> Arc<VeinMinerConfig> {
        Arc::clone(&self.active.read().config)
    }

    pub fn miner(&self) -> Arc<VeinMiner> {
        Arc::clone(&self.active.read().miner)
    }

    /// Replace the active configuration
    ///
    /// The new config is validated and built completely first; on any error
    /// the active configuration stays in place. On success the block identity
    /// cache is cleared so identities of blocks the new config dropped are
    /// released.
    pub fn reload(&self, config: VeinMinerConfig) -> ConfigResult<()> {
        if let Err(e) = VeinMiner::from_config(&config) {
            log::error!(
                "[ConfigManager::reload] Rejected new configuration, keeping the active one: {}",
                e
            );
            return Err(e);
        }

        block_cache::clear();
        // Rebuild so the fresh cache holds the new config's identities
        let miner = VeinMiner::from_config(&config)?;

        let categories = config.categories.len();
        *self.active.write() = LoadedConfig {
            config: Arc::new(config),
            miner: Arc::new(miner),
        };
        log::info!(
            "[ConfigManager::reload] Reloaded configuration with {} tool categories",
            categories
        );
        Ok(())
    }

    pub fn reload_from_str(&self, text: &str) -> ConfigResult<()> {
        match parse_config(text) {
            Ok(config) => self.reload(config),
            Err(e) => {
                log::error!(
                    "[ConfigManager::reload_from_str] Rejected new configuration, keeping the active one: {}",
                    e
                );
                Err(e)
            }
        }
    }

    pub fn reload_from_file(&self, path: &Path) -> ConfigResult<()> {
        match load_config_file(path) {
            Ok(config) => self.reload(config),
            Err(e) => {
                log::error!(
                    "[ConfigManager::reload_from_file] Rejected {}, keeping the active configuration: {}",
                    path.display(),
                    e
                );
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("config", &self.active.read().config)
            .finish()
    }
}
