use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::{
    cli::CommandResult,
    codec::Format,
    config_store::ConfigStore,
    core::ConfigError,
};

pub fn show(store: &ConfigStore<Value>) -> CommandResult {
    render(store.format(), &store.model())
}

/// Encodes the model in `format` for printing.
pub fn render(format: Format, model: &RwLock<Value>) -> CommandResult {
    let bytes = {
        let model = model.read().unwrap_or_else(PoisonError::into_inner);
        format.encode(&*model)
    }
    .map_err(|source| ConfigError::Encode { format, source })?;

    Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
}
