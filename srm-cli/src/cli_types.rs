//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "srm")]
#[command(about = "Match ROM files against DAT catalogs", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Initialize the current directory for srm
    Init,

    /// Show the header and summary of a DAT file
    Info {
        /// DAT file (defaults to the `dat.path` config value)
        dat: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check files against a DAT file by checksum
    Status {
        /// DAT file (defaults to the `dat.path` config value)
        #[arg(short, long)]
        dat: Option<PathBuf>,

        /// Print one JSON object per file instead of text
        #[arg(long)]
        json: bool,

        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Read and write srm configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print a value (local config first, then global)
    Get { key: String },

    /// Set a value in the local config (or the global one with --global)
    Set {
        key: String,
        /// TOML value; anything that doesn't parse is stored as a string
        value: String,
        #[arg(short, long)]
        global: bool,
    },

    /// Remove a value from the local config (or the global one with --global)
    Unset {
        key: String,
        #[arg(short, long)]
        global: bool,
    },

    /// Print the config file locations
    Path,
}
