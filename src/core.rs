use std::{io, path::PathBuf, result};

use thiserror::Error;

use crate::codec::{CodecError, Format};

/// Errors produced while binding, loading, saving or watching a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The model does not serialize to a keyed record (struct or map).
    #[error("model must serialize to a struct or map, got {kind}")]
    InvalidModelKind {
        /// Shape the model serialized to (e.g. "sequence", "string")
        kind: &'static str,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported config format '{extension}' for '{path}'")]
    UnsupportedFormat {
        /// Path whose extension was inspected
        path: PathBuf,
        /// Lower-cased extension, empty when the path has none
        extension: String,
    },

    /// The config file does not exist.
    #[error("config file '{path}' not found")]
    FileNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Reading, writing or creating the config file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// Path where the I/O error occurred
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// File content (or the default snapshot) could not be decoded.
    #[error("failed to decode {format} config '{path}': {source}")]
    Decode {
        /// Path of the file being decoded
        path: PathBuf,
        /// Format the content was decoded as
        format: Format,
        /// Codec error details
        #[source]
        source: CodecError,
    },

    /// The model could not be encoded.
    #[error("failed to encode model as {format}: {source}")]
    Encode {
        /// Target format
        format: Format,
        /// Codec error details
        #[source]
        source: CodecError,
    },

    /// Watching needs a Tokio runtime and none is running on this thread.
    #[error("watching requires a running tokio runtime")]
    RuntimeUnavailable,
}

/// A specialized `Result` type for config store operations.
pub type Result<T> = result::Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn io(error: io::Error, path: impl Into<PathBuf>) -> Self {
        ConfigError::Io {
            path: path.into(),
            source: error,
        }
    }
}
