use thiserror::Error;

use srm_config::ConfigError;
use srm_dat::DatError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// DAT parsing, hashing or matching failed
    #[error("DAT error: {0}")]
    Dat(#[from] DatError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No DAT given and none configured
    #[error("No DAT file given. Pass one on the command line or run 'srm config set dat.path <FILE>'")]
    NoDat,

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
