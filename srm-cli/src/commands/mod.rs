pub(crate) mod config;
pub(crate) mod info;
pub(crate) mod init;
pub(crate) mod status;

use std::path::PathBuf;

use srm_config::{ChainConf, DAT_PATH_KEY};

use crate::error::CliError;

/// The DAT given on the command line, else the configured `dat.path`.
pub(crate) fn resolve_dat(arg: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(path) = arg {
        return Ok(path);
    }

    let mut conf = ChainConf::with_default_paths();
    conf.load_existing()?;
    match conf.get(DAT_PATH_KEY) {
        None => Err(CliError::NoDat),
        Some(toml::Value::String(s)) if s.is_empty() => Err(CliError::NoDat),
        Some(toml::Value::String(s)) => {
            log::debug!("Using DAT from config: {s}");
            Ok(PathBuf::from(s))
        }
        Some(other) => Err(CliError::other(format!(
            "Config value '{DAT_PATH_KEY}' must be a string, found {other}"
        ))),
    }
}
