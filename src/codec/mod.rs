//! Format detection and serialization for config files.
//!
//! Each supported format is a [`Codec`] over its own document type. Loading
//! always goes through a document-level merge so that keys missing from the
//! file fall back to the model's defaults.

mod json;
mod merging;
mod yaml;

use std::{fmt, path::Path};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::core::ConfigError;
use json::JsonCodec;
use merging::Document;
use yaml::YamlCodec;

/// Errors raised by the format-specific serializers.
#[derive(Error, Debug)]
pub enum CodecError {
    /// JSON (de)serialization failed
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization failed
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// On-disk format of a config file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

/// Serializer for one on-disk format.
pub(crate) trait Codec {
    /// Untyped document tree the format parses into.
    type Document: Document;

    fn parse(bytes: &[u8]) -> Result<Self::Document, CodecError>;

    fn into_model<T: DeserializeOwned>(document: Self::Document) -> Result<T, CodecError>;

    fn encode<T: Serialize + ?Sized>(model: &T) -> Result<Vec<u8>, CodecError>;
}

impl Format {
    /// Maps a file extension (case-insensitive, without the dot) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Derives the format from a path's extension.
    ///
    /// # Errors
    /// Returns `ConfigError::UnsupportedFormat` if the path has no extension
    /// or the extension is not recognized.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self::from_extension(&extension).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }

    /// Canonical extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    /// Serializes `model` in this format.
    ///
    /// # Errors
    /// Returns the serializer error if the model cannot be represented.
    pub fn encode<T: Serialize + ?Sized>(&self, model: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Format::Json => JsonCodec::encode(model),
            Format::Yaml => YamlCodec::encode(model),
        }
    }

    /// Deserializes a complete value from `bytes`.
    ///
    /// # Errors
    /// Returns the deserializer error if `bytes` are malformed or do not
    /// match `T`.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            Format::Json => JsonCodec::into_model(JsonCodec::parse(bytes)?),
            Format::Yaml => YamlCodec::into_model(YamlCodec::parse(bytes)?),
        }
    }

    /// Decodes `overlay` on top of `defaults`.
    ///
    /// Keys present in `overlay` win, nested maps are merged key by key, and
    /// keys missing from `overlay` keep their value from `defaults`. An empty
    /// overlay yields `defaults` unchanged.
    ///
    /// # Errors
    /// Returns the deserializer error if either input is malformed or the
    /// merged document does not match `T`.
    pub fn decode_merged<T: DeserializeOwned>(
        &self,
        defaults: &[u8],
        overlay: &[u8],
    ) -> Result<T, CodecError> {
        match self {
            Format::Json => merge_decode::<JsonCodec, T>(defaults, overlay),
            Format::Yaml => merge_decode::<YamlCodec, T>(defaults, overlay),
        }
    }

    /// Returns the shape of the document in `bytes` when it is not a map.
    pub(crate) fn non_record_kind(&self, bytes: &[u8]) -> Result<Option<&'static str>, CodecError> {
        fn kind_of<D: Document>(document: &D) -> Option<&'static str> {
            (!document.is_mapping()).then(|| document.kind())
        }

        match self {
            Format::Json => Ok(kind_of(&JsonCodec::parse(bytes)?)),
            Format::Yaml => Ok(kind_of(&YamlCodec::parse(bytes)?)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn merge_decode<C: Codec, T: DeserializeOwned>(
    defaults: &[u8],
    overlay: &[u8],
) -> Result<T, CodecError> {
    let base = C::parse(defaults)?;

    if overlay.is_empty() {
        return C::into_model(base);
    }

    let overlay = C::parse(overlay)?;
    let merged = if overlay.is_blank() {
        base
    } else {
        Document::merge(base, overlay)
    };

    C::into_model(merged)
}
