use std::path::PathBuf;

use toml::Value;

use crate::conf::{Conf, home_dir};
use crate::error::ConfigError;
use crate::{GLOBAL_FILE, GLOBAL_KEYS, LOCAL_PATH};

/// A local config store that falls back to a global one.
///
/// Reads check `local` first. Writes always go to `local`; edit `global`
/// directly to change the fallback.
#[derive(Debug, Clone)]
pub struct ChainConf {
    pub local: Conf,
    pub global: Conf,
}

impl ChainConf {
    pub fn new(local: Conf, global: Conf) -> Self {
        Self { local, global }
    }

    /// `.srm/config` under the working directory and `~/.srmconfig`.
    pub fn default_paths() -> (PathBuf, PathBuf) {
        (PathBuf::from(LOCAL_PATH), home_dir().join(GLOBAL_FILE))
    }

    /// The standard pair of stores, not yet loaded. The global store only
    /// accepts [`GLOBAL_KEYS`].
    pub fn with_default_paths() -> Self {
        let (local, global) = Self::default_paths();
        Self::new(
            Conf::new(local),
            Conf::with_valid_keys(global, GLOBAL_KEYS.iter().copied()),
        )
    }

    /// Whether the local store exists.
    pub fn exists(&self) -> bool {
        self.local.exists()
    }

    /// Load both stores. See [`Conf::load`].
    pub fn load(&mut self, create: bool) -> Result<(), ConfigError> {
        self.local.load(create)?;
        self.global.load(create)
    }

    /// Load whichever stores exist and leave the others empty.
    pub fn load_existing(&mut self) -> Result<(), ConfigError> {
        for conf in [&mut self.local, &mut self.global] {
            if conf.exists() {
                conf.load(false)?;
            } else {
                log::debug!("No config at {}", conf.path().display());
            }
        }
        Ok(())
    }

    /// Save both stores.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.local.save()?;
        self.global.save()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.local.get(key).or_else(|| self.global.get(key))
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.local.set(key, value)
    }

    /// Remove a key from the local store. The global value, if any, shows
    /// through afterwards.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.local.remove(key)
    }
}

#[cfg(test)]
#[path = "tests/chain_tests.rs"]
mod tests;
