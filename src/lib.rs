//! Livecfg - live-reloading configuration binder.
//!
//! Livecfg keeps a JSON or YAML config file and an in-memory model in sync:
//!
//! - The model's initial values act as defaults for keys the file omits
//! - Every reload reapplies those defaults before the file content
//! - A background poll task reloads the model when the file changes
//! - A single callback is notified after each reload
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::{Arc, RwLock};
//!
//! use livecfg::ConfigStore;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Settings {
//!     hello: String,
//!     list: Vec<String>,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> livecfg::Result<()> {
//! let model = Arc::new(RwLock::new(Settings {
//!     hello: "default".to_string(),
//!     list: vec!["1".to_string()],
//! }));
//!
//! let store = ConfigStore::new("settings.yaml", Arc::clone(&model))?;
//! store.watch(|changed| println!("config rebound, changed: {changed}"), true)?;
//!
//! println!("Config loaded: {:?}", store.current());
//! # Ok(())
//! # }
//! ```

/// Format detection and JSON/YAML codecs.
pub mod codec;

/// Core error types and result aliases.
pub mod core;

/// File-backed config store with change watching.
pub mod config_store;

/// Command-line interface for inspecting and watching config files.
pub mod cli;

/// Tracing subscriber setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::codec::Format;
pub use crate::config_store::{ConfigStore, ConfigStoreBuilder};
pub use crate::core::{ConfigError, Result};
