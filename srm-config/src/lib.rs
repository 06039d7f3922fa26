//! Local and global configuration for srm.
//!
//! Settings live in TOML files: a per-directory store at `.srm/config` and a
//! per-user store at `~/.srmconfig`. [`ChainConf`] reads the local store
//! first and falls back to the global one.

pub mod chain;
pub mod conf;
pub mod error;

pub use chain::ChainConf;
pub use conf::{Conf, parse_value};
pub use error::ConfigError;

/// Local store, relative to the working directory.
pub const LOCAL_PATH: &str = ".srm/config";

/// Global store file name, under the home directory.
pub const GLOBAL_FILE: &str = ".srmconfig";

/// Keys that may be written to the global store.
pub const GLOBAL_KEYS: &[&str] = &[DAT_PATH_KEY];

/// Default DAT file used when a command is not given one.
pub const DAT_PATH_KEY: &str = "dat.path";
