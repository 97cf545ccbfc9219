//! Live binding between a config file and an in-memory model.
//!
//! A [`ConfigStore`] loads a JSON or YAML file into a shared model, falling
//! back to the model's initial values for keys the file does not set, and can
//! poll the file in the background to reload it and notify a callback when it
//! changes.

mod builder;
mod file_creation;
mod file_watching;
mod store;
mod watermark;

#[cfg(test)]
mod tests;

pub use builder::{ConfigStoreBuilder, DEFAULT_POLL_INTERVAL};
pub use store::{ConfigModel, ConfigStore};
