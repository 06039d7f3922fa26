//! srm CLI
//!
//! Command-line interface for checking ROM files against DAT catalogs.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};

use cli_types::{Cli, Commands, ConfigAction};
use commands::config::{run_config_get, run_config_path, run_config_set, run_config_unset};
use commands::info::run_info;
use commands::init::run_init;
use commands::status::run_status;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Init => run_init(),
        Commands::Info { dat, json } => run_info(dat, json),
        Commands::Status { dat, json, files } => run_status(dat, &files, json, cli.quiet),
        Commands::Config { action } => match action {
            ConfigAction::Get { key } => run_config_get(&key),
            ConfigAction::Set { key, value, global } => run_config_set(&key, &value, global),
            ConfigAction::Unset { key, global } => run_config_unset(&key, global),
            ConfigAction::Path => run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Route log output to stdout. Normal output is logged at info, so `--quiet`
/// leaves only warnings and errors. `RUST_LOG` overrides both flags.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            Level::Info | Level::Warn => writeln!(buf, "{}", record.args()),
            Level::Error => writeln!(buf, "Error: {}", record.args()),
            level => writeln!(buf, "[{level} {}] {}", record.target(), record.args()),
        })
        .init();
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
