use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument};

use crate::{
    codec::Format,
    core::{ConfigError, Result},
};

use super::{
    builder::{ConfigStoreBuilder, StoreOptions},
    file_creation::create_empty_config_file,
    file_watching::WatchHandle,
    watermark::Watermark,
};

/// A type that can be bound to a config file.
///
/// Blanket-implemented for every serde round-trippable type that can be
/// shared with the background watch task.
pub trait ConfigModel: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> ConfigModel for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Callback invoked after the model was (re)bound; `true` means the file changed.
pub(super) type UpdateCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Binds a config file to a shared in-memory model and keeps them in sync.
///
/// Every load first reapplies the defaults captured at construction and then
/// overlays the file content, so a key removed from the file falls back to
/// its default instead of keeping the previously loaded value.
///
/// The store is a cheap handle; clones share the same binding.
pub struct ConfigStore<T> {
    pub(super) inner: Arc<StoreInner<T>>,
}

pub(super) struct StoreInner<T> {
    pub(super) path: PathBuf,
    pub(super) format: Format,
    pub(super) model: Arc<RwLock<T>>,
    pub(super) default_snapshot: Vec<u8>,
    /// Also serializes loads and saves against each other.
    pub(super) watermark: Mutex<Option<Watermark>>,
    pub(super) on_update: RwLock<Option<UpdateCallback>>,
    pub(super) watch_handle: Mutex<Option<WatchHandle>>,
    pub(super) options: StoreOptions,
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ConfigModel> ConfigStore<T> {
    /// Binds the file at `path` to `model` and performs the initial load.
    ///
    /// The model's current value becomes the default snapshot used for keys
    /// the file does not set. The model has to be shared, a plain value is
    /// rejected at compile time:
    ///
    /// ```compile_fail
    /// use livecfg::ConfigStore;
    ///
    /// #[derive(Default, serde::Serialize, serde::Deserialize)]
    /// struct Settings {
    ///     port: u16,
    /// }
    ///
    /// let store = ConfigStore::new("settings.json", Settings::default());
    /// ```
    ///
    /// # Errors
    /// * `ConfigError::UnsupportedFormat` - If the extension is not json, yaml or yml
    /// * `ConfigError::InvalidModelKind` - If the model does not serialize to a struct or map
    /// * `ConfigError::Encode` - If the default snapshot cannot be captured
    /// * Any error returned by [`ConfigStore::load`]
    pub fn new(path: impl Into<PathBuf>, model: Arc<RwLock<T>>) -> Result<Self> {
        ConfigStoreBuilder::new(path).build(model)
    }

    /// Binds a config file, panicking if that fails, and starts watching it.
    ///
    /// `on_change` is invoked once right away with `false` and then with
    /// `true` after every reload triggered by a file change.
    ///
    /// # Panics
    /// Panics if the store cannot be created or no tokio runtime is running.
    #[allow(clippy::panic)]
    pub fn must_bind<F>(path: impl Into<PathBuf>, model: Arc<RwLock<T>>, on_change: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let store = match Self::new(path, model) {
            Ok(store) => store,
            Err(e) => panic!("failed to bind config: {e}"),
        };

        if let Err(e) = store.watch(on_change, true) {
            panic!("failed to watch {}: {e}", store.inner.path.display());
        }

        store
    }

    /// Reloads the model from disk.
    ///
    /// Defaults are applied first, then every key present in the file. The
    /// model is only replaced once the merged value decoded successfully, so
    /// a failed load leaves it untouched. On success the file's modification
    /// time and size are recorded for change detection.
    ///
    /// # Errors
    /// * `ConfigError::FileNotFound` - If the file is missing and the store does not create it
    /// * `ConfigError::Io` - If the file cannot be read, created or inspected
    /// * `ConfigError::Decode` - If the file content does not decode into the model
    #[instrument(skip(self), fields(path = %self.inner.path.display()))]
    pub fn load(&self) -> Result<()> {
        let inner = &*self.inner;
        let mut watermark = lock(&inner.watermark);

        // Stat before reading: a write racing this load then shows up as a
        // change on the next poll instead of being masked.
        let observed = match fs::metadata(&inner.path) {
            Ok(metadata) => Watermark::from_metadata(&metadata),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if !inner.options.create_if_missing {
                    return Err(ConfigError::FileNotFound {
                        path: inner.path.clone(),
                    });
                }

                create_empty_config_file(&inner.path)?;
                Watermark::observe(&inner.path)?
            }
            Err(e) => return Err(ConfigError::io(e, &inner.path)),
        };

        let contents = fs::read(&inner.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: inner.path.clone(),
            },
            _ => ConfigError::io(e, &inner.path),
        })?;

        let model: T = inner
            .format
            .decode_merged(&inner.default_snapshot, &contents)
            .map_err(|source| ConfigError::Decode {
                path: inner.path.clone(),
                format: inner.format,
                source,
            })?;

        *write_lock(&inner.model) = model;
        *watermark = Some(observed);

        debug!(bytes = contents.len(), ?observed, "config loaded");
        Ok(())
    }

    /// Writes the current model to the file, replacing its content.
    ///
    /// The default snapshot and the change watermark are left alone, so a
    /// running watch loop picks the write up as a change.
    ///
    /// # Errors
    /// * `ConfigError::Encode` - If the model cannot be serialized
    /// * `ConfigError::Io` - If the file cannot be written
    #[instrument(skip(self), fields(path = %self.inner.path.display()))]
    pub fn save(&self) -> Result<()> {
        let inner = &*self.inner;
        let _io_guard = lock(&inner.watermark);

        let output = {
            let model = read_lock(&inner.model);
            inner.format.encode(&*model)
        }
        .map_err(|source| ConfigError::Encode {
            format: inner.format,
            source,
        })?;

        fs::write(&inner.path, &output).map_err(|e| ConfigError::io(e, &inner.path))?;

        info!(bytes = output.len(), "config saved");
        Ok(())
    }
}

impl<T> ConfigStore<T> {
    /// Returns the shared model this store keeps in sync.
    pub fn model(&self) -> Arc<RwLock<T>> {
        Arc::clone(&self.inner.model)
    }

    /// Returns a clone of the current model, handling poisoned locks gracefully.
    pub fn current(&self) -> T
    where
        T: Clone,
    {
        read_lock(&self.inner.model).clone()
    }

    /// Format derived from the file extension.
    pub fn format(&self) -> Format {
        self.inner.format
    }

    /// Path of the bound file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

impl<T> fmt::Display for ConfigStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigStore({}, {})",
            self.inner.path.display(),
            self.inner.format
        )
    }
}

impl<T> fmt::Debug for ConfigStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.inner.path)
            .field("format", &self.inner.format)
            .field("watching", &self.is_watching())
            .finish_non_exhaustive()
    }
}

pub(super) fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(super) fn read_lock<V>(lock: &RwLock<V>) -> RwLockReadGuard<'_, V> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(super) fn write_lock<V>(lock: &RwLock<V>) -> RwLockWriteGuard<'_, V> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
