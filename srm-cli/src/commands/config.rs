use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use srm_config::{ChainConf, Conf, parse_value};

use crate::error::CliError;

fn display_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn not_set(key: &str) -> CliError {
    CliError::other(format!("'{key}' is not set"))
}

fn pick_store(conf: &mut ChainConf, global: bool) -> &mut Conf {
    if global {
        &mut conf.global
    } else {
        &mut conf.local
    }
}

/// Print a value, looking in the local config before the global one.
pub(crate) fn run_config_get(key: &str) -> Result<(), CliError> {
    let mut conf = ChainConf::with_default_paths();
    conf.load_existing()?;
    let value = conf.get(key).ok_or_else(|| not_set(key))?;
    log::info!("{}", display_value(value));
    Ok(())
}

pub(crate) fn run_config_set(key: &str, value: &str, global: bool) -> Result<(), CliError> {
    let mut conf = ChainConf::with_default_paths();
    let store = pick_store(&mut conf, global);
    store.load(true)?;
    store.set(key, parse_value(value))?;
    store.save()?;

    log::info!(
        "{} Set {} in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key.if_supports_color(Stdout, |t| t.bold()),
        store.path().display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn run_config_unset(key: &str, global: bool) -> Result<(), CliError> {
    let mut conf = ChainConf::with_default_paths();
    let store = pick_store(&mut conf, global);
    if !store.exists() {
        return Err(not_set(key));
    }
    store.load(false)?;
    store.remove(key).ok_or_else(|| not_set(key))?;
    store.save()?;

    log::info!(
        "{} Removed {} from {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        key.if_supports_color(Stdout, |t| t.bold()),
        store.path().display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

/// Print the config file paths.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let conf = ChainConf::with_default_paths();
    for (label, store) in [("Local: ", &conf.local), ("Global:", &conf.global)] {
        let status = if store.exists() {
            "(exists)".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
        };
        log::info!(
            "{} {} {}",
            label,
            store.path().display().if_supports_color(Stdout, |t| t.cyan()),
            status,
        );
    }
    Ok(())
}
