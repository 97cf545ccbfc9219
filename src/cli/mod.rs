//! Command-line interface for inspecting and watching config files.
//!
//! The CLI binds the given file to an untyped JSON model, optionally seeded
//! with defaults from another file, and reports what the store sees.

mod commands;
pub mod formatting;
mod types;

#[cfg(test)]
mod tests;

use std::{
    fs,
    path::Path,
    sync::{Arc, RwLock},
    time::Duration,
};

use serde_json::{Map, Value};
use tracing::debug;

use crate::{codec::Format, config_store::ConfigStore};

pub use types::{Cli, CliError, Command, CommandResult};

/// Executes a parsed command line and returns the text to print.
///
/// # Errors
/// Returns `CliError::InvalidDefaults` if the defaults file cannot be used and
/// `CliError::Config` if the config file cannot be bound, saved or watched.
pub async fn run(cli: Cli) -> CommandResult {
    let defaults = load_defaults(cli.defaults.as_deref())?;

    match cli.command {
        Command::Show { path } => commands::show(&bind(&path, defaults, None)?),
        Command::Normalize { path } => commands::normalize(&bind(&path, defaults, None)?),
        Command::Watch { path, interval_ms } => {
            let interval = Duration::from_millis(interval_ms);
            commands::watch(&bind(&path, defaults, Some(interval))?).await
        }
    }
}

fn bind(
    path: &Path,
    defaults: Value,
    poll_interval: Option<Duration>,
) -> Result<ConfigStore<Value>, CliError> {
    let mut builder = ConfigStore::builder(path);
    if let Some(interval) = poll_interval {
        builder = builder.poll_interval(interval);
    }

    Ok(builder.build(Arc::new(RwLock::new(defaults)))?)
}

fn load_defaults(path: Option<&Path>) -> Result<Value, CliError> {
    let Some(path) = path else {
        return Ok(Value::Object(Map::new()));
    };

    debug!(path = %path.display(), "loading defaults");

    let invalid = |details: String| CliError::InvalidDefaults {
        path: path.to_path_buf(),
        details,
    };

    let format = Format::from_path(path).map_err(|e| invalid(e.to_string()))?;
    let bytes = fs::read(path).map_err(|e| invalid(e.to_string()))?;

    format.decode(&bytes).map_err(|e| invalid(e.to_string()))
}
