use serde_json::Value;

use crate::{cli::CommandResult, config_store::ConfigStore};

pub fn normalize(store: &ConfigStore<Value>) -> CommandResult {
    store.save()?;
    Ok(format!("Normalized {}", store.path().display()))
}
