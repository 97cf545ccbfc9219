use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::watch,
    task::{self, JoinHandle},
    time,
};
use tracing::{debug, error, info, instrument, trace, warn};

use crate::core::{ConfigError, Result};

use super::{
    ConfigStore,
    store::{ConfigModel, UpdateCallback, lock, read_lock, write_lock},
    watermark::Watermark,
};

/// Running poll task together with its stop signal.
pub(super) struct WatchHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl<T: ConfigModel> ConfigStore<T> {
    /// Registers `callback` and starts polling the file for changes.
    ///
    /// Only one callback is kept; registering a new one replaces the previous
    /// registration. With `invoke_immediately` the callback runs once with
    /// `false` before this returns. If the store is already watching only the
    /// registration changes, otherwise a poll task is spawned on the current
    /// tokio runtime. Every poll interval the task compares the file's
    /// modification time and size with the last load; on a difference it
    /// reloads and calls the callback with `true`. Failed reloads are logged
    /// and retried on the next tick.
    ///
    /// # Errors
    /// Returns `ConfigError::RuntimeUnavailable` when called outside a tokio
    /// runtime. Nothing is registered in that case.
    #[instrument(skip(self, callback), fields(path = %self.inner.path.display()))]
    pub fn watch<F>(&self, callback: F, invoke_immediately: bool) -> Result<()>
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| ConfigError::RuntimeUnavailable)?;

        let callback: UpdateCallback = Arc::new(callback);
        *write_lock(&self.inner.on_update) = Some(Arc::clone(&callback));

        if invoke_immediately {
            callback(false);
        }

        let mut watch_handle = lock(&self.inner.watch_handle);
        if watch_handle.as_ref().is_some_and(WatchHandle::is_running) {
            debug!("already watching, callback replaced");
            return Ok(());
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let task = runtime.spawn(self.clone().poll_loop(stop_rx));
        *watch_handle = Some(WatchHandle { stop_tx, task });

        info!(interval = ?self.inner.options.poll_interval, "watching config file");
        Ok(())
    }
}

impl<T> ConfigStore<T> {
    /// Stops the poll task.
    ///
    /// The task is woken right away, but a reload that is already running
    /// still finishes and may still call the callback. Use
    /// [`ConfigStore::stop_watch_and_wait`] to rule that out.
    pub fn stop_watch(&self) {
        if let Some(handle) = lock(&self.inner.watch_handle).take() {
            let _ = handle.stop_tx.send(true);
            info!(path = %self.inner.path.display(), "stopped watching config file");
        }
    }

    /// Stops the poll task and waits until it has exited.
    ///
    /// Once this returns the callback is not invoked by the task anymore.
    pub async fn stop_watch_and_wait(&self) {
        let handle = lock(&self.inner.watch_handle).take();

        if let Some(handle) = handle {
            let _ = handle.stop_tx.send(true);
            if let Err(e) = handle.task.await {
                warn!(error = %e, "config watch task ended abnormally");
            }
            info!(path = %self.inner.path.display(), "stopped watching config file");
        }
    }

    /// Whether a poll task is currently running.
    pub fn is_watching(&self) -> bool {
        lock(&self.inner.watch_handle)
            .as_ref()
            .is_some_and(WatchHandle::is_running)
    }

    /// Invokes the registered callback, if any, with `changed`.
    pub fn emit_change(&self, changed: bool) {
        let callback = read_lock(&self.inner.on_update).clone();

        if let Some(callback) = callback {
            callback(changed);
        }
    }
}

impl<T: ConfigModel> ConfigStore<T> {
    async fn poll_loop(self, mut stop_rx: watch::Receiver<bool>) {
        let interval = self.inner.options.poll_interval;

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                () = time::sleep(interval) => {}
            }

            self.poll_once().await;
        }

        debug!(path = %self.inner.path.display(), "config watch loop exited");
    }

    async fn poll_once(&self) {
        let metadata = match tokio::fs::metadata(&self.inner.path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                trace!(path = %self.inner.path.display(), error = %e, "stat failed, skipping tick");
                return;
            }
        };

        let observed = Watermark::from_metadata(&metadata);
        let unchanged = *lock(&self.inner.watermark) == Some(observed);
        if unchanged {
            return;
        }

        info!(path = %self.inner.path.display(), "config file changed, reloading");

        let store = self.clone();
        let reload = task::spawn_blocking(move || {
            store.load()?;
            store.emit_change(true);
            Ok::<(), ConfigError>(())
        });

        match reload.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!(path = %self.inner.path.display(), error = %e, "failed to reload config");
            }
            Err(e) => {
                error!(path = %self.inner.path.display(), error = %e, "config reload task failed");
            }
        }
    }
}
