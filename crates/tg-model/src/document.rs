//! JSON and YAML documents
//!
//! Loading and rendering of panel configs, runtime inputs and taxonomies. Panel
//! configs are scrubbed of `derivedFields` on the way in, so a document that
//! was written by an older tool never re-enters the tree with stale values.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value as JsonValue;

use crate::config::PanelConfig;
use crate::derived::strip_derived_fields;

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl DocumentFormat {
    /// Pick format from a file extension
    ///
    /// # Errors
    /// Returns error if the extension is neither JSON nor YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ModelError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Parse a document into any deserializable type
///
/// # Errors
/// Returns error if the text is not valid for `format` or does not match `T`
pub fn parse_document<T: DeserializeOwned>(
    text: &str,
    format: DocumentFormat,
) -> Result<T, ModelError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
    }
}

/// Render a value as a document
///
/// # Errors
/// Returns error if serialization fails
pub fn render_document<T: Serialize>(value: &T, format: DocumentFormat) -> Result<String, ModelError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

impl PanelConfig {
    /// Load a panel config, dropping any `derivedFields` found in the document
    ///
    /// # Errors
    /// Returns error if the document is invalid or malformed
    pub fn from_document(text: &str, format: DocumentFormat) -> Result<Self, ModelError> {
        let mut value: JsonValue = parse_document(text, format)?;
        let removed = strip_derived_fields(&mut value);
        if removed > 0 {
            return serde_json::from_value(value)
                .map_err(|source| ModelError::Scrubbed { removed, source });
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Errors loading or rendering documents
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Invalid JSON, or JSON that does not match the expected shape
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Invalid YAML, or YAML that does not match the expected shape
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Malformed config after removing derived fields
    #[error("malformed config after removing {removed} derived field record(s): {source}")]
    Scrubbed {
        /// Number of `derivedFields` keys removed
        removed: usize,
        /// Decode failure
        source: serde_json::Error,
    },

    /// Unsupported file extension
    #[error("unknown document format: {0}")]
    UnknownFormat(String),
}
