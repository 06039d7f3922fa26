use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use srm_config::ChainConf;

use crate::error::CliError;

/// Create the local config for the working directory.
pub(crate) fn run_init() -> Result<(), CliError> {
    let mut conf = ChainConf::with_default_paths();
    if initialize(&mut conf)? {
        log::info!(
            "{} Initialized {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            conf.local.path().display().if_supports_color(Stdout, |t| t.cyan()),
        );
    } else {
        log::warn!(
            "{}",
            "Directory is already initialized!".if_supports_color(Stdout, |t| t.red())
        );
    }
    Ok(())
}

/// Create the local store if it is missing. `false` if it was already there.
/// The global store is left alone.
fn initialize(conf: &mut ChainConf) -> Result<bool, CliError> {
    if conf.exists() {
        return Ok(false);
    }
    conf.local.load(true)?;
    Ok(true)
}

#[cfg(test)]
#[path = "../tests/init_tests.rs"]
mod tests;
