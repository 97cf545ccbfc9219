use serde_json::Value;
use tracing::error;

use crate::{
    cli::{
        CommandResult,
        formatting::{format_change_header, format_error},
    },
    config_store::ConfigStore,
};

use super::render;

pub async fn watch(store: &ConfigStore<Value>) -> CommandResult {
    println!("Watching '{}'...", store.path().display());
    println!("Press Ctrl+C to stop");

    let format = store.format();
    let model = store.model();

    store.watch(
        move |changed| match render(format, &model) {
            Ok(output) => println!("{}\n{output}", format_change_header(changed)),
            Err(e) => {
                error!(error = %e, "failed to render config");
                eprintln!("{}", format_error(&e.to_string()));
            }
        },
        true,
    )?;

    tokio::signal::ctrl_c().await?;
    store.stop_watch_and_wait().await;

    Ok("Watch ended".to_string())
}
