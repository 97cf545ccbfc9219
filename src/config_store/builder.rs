use std::{
    marker::PhantomData,
    path::PathBuf,
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use tracing::info;

use crate::{
    codec::Format,
    core::{ConfigError, Result},
};

use super::store::{ConfigModel, ConfigStore, StoreInner, read_lock};

/// How often a watching store checks the file when no interval is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub(super) struct StoreOptions {
    pub(super) poll_interval: Duration,
    pub(super) create_if_missing: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            create_if_missing: false,
        }
    }
}

/// Configures a [`ConfigStore`] before the initial load.
///
/// ```rust,no_run
/// use std::{sync::{Arc, RwLock}, time::Duration};
///
/// use livecfg::ConfigStore;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Settings {
///     port: u16,
/// }
///
/// let model = Arc::new(RwLock::new(Settings { port: 8080 }));
/// let store = ConfigStore::builder("settings.yaml")
///     .poll_interval(Duration::from_millis(250))
///     .create_if_missing(true)
///     .build(model)?;
/// # Ok::<(), livecfg::ConfigError>(())
/// ```
pub struct ConfigStoreBuilder<T> {
    path: PathBuf,
    options: StoreOptions,
    model: PhantomData<fn() -> T>,
}

impl<T: ConfigModel> ConfigStoreBuilder<T> {
    /// Starts a builder for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: StoreOptions::default(),
            model: PhantomData,
        }
    }

    /// Sets the watch loop's polling interval (at least 10ms).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.options.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Creates an empty file instead of failing when the file is missing.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.options.create_if_missing = create;
        self
    }

    /// Captures the model's current value as defaults and loads the file.
    ///
    /// # Errors
    /// * `ConfigError::UnsupportedFormat` - If the extension is not json, yaml or yml
    /// * `ConfigError::InvalidModelKind` - If the model does not serialize to a struct or map
    /// * `ConfigError::Encode` - If the default snapshot cannot be captured
    /// * Any error returned by [`ConfigStore::load`]
    pub fn build(self, model: Arc<RwLock<T>>) -> Result<ConfigStore<T>> {
        let format = Format::from_path(&self.path)?;

        let default_snapshot = {
            let defaults = read_lock(&model);
            format.encode(&*defaults)
        }
        .map_err(|source| ConfigError::Encode { format, source })?;

        let non_record = format
            .non_record_kind(&default_snapshot)
            .map_err(|source| ConfigError::Decode {
                path: self.path.clone(),
                format,
                source,
            })?;
        if let Some(kind) = non_record {
            return Err(ConfigError::InvalidModelKind { kind });
        }

        let store = ConfigStore {
            inner: Arc::new(StoreInner {
                path: self.path,
                format,
                model,
                default_snapshot,
                watermark: Mutex::new(None),
                on_update: RwLock::new(None),
                watch_handle: Mutex::new(None),
                options: self.options,
            }),
        };

        store.load()?;

        info!(path = %store.path().display(), %format, "config bound");
        Ok(store)
    }
}

impl<T: ConfigModel> ConfigStore<T> {
    /// Starts a [`ConfigStoreBuilder`] for the file at `path`.
    pub fn builder(path: impl Into<PathBuf>) -> ConfigStoreBuilder<T> {
        ConfigStoreBuilder::new(path)
    }
}
