use std::{
    fs::{self, Metadata},
    path::Path,
    time::SystemTime,
};

use crate::core::{ConfigError, Result};

/// Last observed on-disk state of the config file.
///
/// Only metadata is compared: a rewrite that keeps both the modification
/// time and the size goes unnoticed, a touch without content change does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Watermark {
    modified: Option<SystemTime>,
    len: u64,
}

impl Watermark {
    pub(crate) fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        }
    }

    pub(crate) fn observe(path: &Path) -> Result<Self> {
        fs::metadata(path)
            .map(|metadata| Self::from_metadata(&metadata))
            .map_err(|e| ConfigError::io(e, path))
    }
}
