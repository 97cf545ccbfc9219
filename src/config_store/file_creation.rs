use std::{fs, path::Path};

use tracing::warn;

use crate::core::{ConfigError, Result};

/// Creates an empty config file (and its parent directories) if it doesn't exist.
pub(super) fn create_empty_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ConfigError::io(e, parent))?;
    }

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| ConfigError::io(e, path))?;

    warn!(path = %path.display(), "config file missing, created an empty one");
    Ok(())
}
