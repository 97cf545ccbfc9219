use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::core::ConfigError;

/// Inspect and watch live-reloaded JSON/YAML config files.
#[derive(Debug, Parser)]
#[command(name = "livecfg", version)]
pub struct Cli {
    /// JSON or YAML file whose keys act as defaults for keys the config omits
    #[arg(long, global = true, value_name = "FILE")]
    pub defaults: Option<PathBuf>,

    /// Also write logs to a daily rotated file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Commands understood by the CLI.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the merged config in the file's own format
    Show {
        /// Config file to load
        path: PathBuf,
    },

    /// Print the merged config every time the file changes, until Ctrl-C
    Watch {
        /// Config file to watch
        path: PathBuf,

        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },

    /// Rewrite the file in canonical form, filling in defaults
    Normalize {
        /// Config file to rewrite
        path: PathBuf,
    },
}

/// Errors that can occur during CLI command execution.
#[derive(Error, Debug)]
pub enum CliError {
    /// The config store reported an error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The `--defaults` file could not be read or decoded.
    #[error("Invalid defaults file '{path}': {details}")]
    InvalidDefaults {
        /// Path passed with `--defaults`
        path: PathBuf,
        /// Why the file was rejected
        details: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for command execution results.
///
/// Commands return the text to print on success.
pub type CommandResult = Result<String, CliError>;
