//! Error types for the mutation gateway and interaction shell
//!
//! Synthesis never fails: missing display names and namespaces fall back to
//! raw identifiers and empty lists. Everything that can go wrong happens on
//! the way back to persistence and is reported here.

use tg_model::{ConfigFingerprint, ObjectPath, PathError};

/// Edit error type
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Path does not resolve in the current tree
    #[error("path '{path}' does not resolve: '{missing}' is missing")]
    Unresolved {
        /// Requested path
        path: ObjectPath,
        /// Longest prefix that was not found
        missing: ObjectPath,
    },

    /// Path crosses a value that is not the container the step needs
    #[error("path '{path}' crosses a non-container value at '{at}'")]
    TypeMismatch {
        /// Requested path
        path: ObjectPath,
        /// Prefix holding the offending value
        at: ObjectPath,
    },

    /// Path writes into a derived-fields record
    #[error("path '{0}' writes into derived fields, which are never persisted")]
    DerivedField(ObjectPath),

    /// Edit result does not decode as persisted configuration
    #[error("edit at '{path}' leaves malformed config: {source}")]
    Malformed {
        /// Requested path
        path: ObjectPath,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },

    /// Derived tree could not be projected to JSON
    #[error("projection failed: {0}")]
    Projection(#[from] serde_json::Error),

    /// Persisted config changed since the render pass was built
    #[error("config changed since render: expected {expected}, found {actual}")]
    StaleBase {
        /// Fingerprint the pass was built from
        expected: ConfigFingerprint,
        /// Fingerprint of the current config
        actual: ConfigFingerprint,
    },

    /// Settings edit without an open settings editor
    #[error("no settings editor is open")]
    NoSettingsTarget,

    /// Path string failed to parse
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
}

impl EditError {
    /// Check if error comes from a path that no longer matches the tree
    ///
    /// These are the errors a host may resolve by re-rendering and retrying.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Unresolved { .. } | Self::StaleBase { .. })
    }

    /// Path the error refers to, if any
    #[must_use]
    pub fn path(&self) -> Option<&ObjectPath> {
        match self {
            Self::Unresolved { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::Malformed { path, .. }
            | Self::DerivedField(path) => Some(path),
            Self::Projection(_) | Self::StaleBase { .. } | Self::NoSettingsTarget | Self::Path(_) => {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_display() {
        let err = EditError::Unresolved {
            path: ObjectPath::group(3).field("visible"),
            missing: ObjectPath::group(3),
        };
        assert_eq!(
            err.to_string(),
            "path '[3].visible' does not resolve: '[3]' is missing"
        );
        assert!(err.is_stale());
    }

    #[test]
    fn stale_base_is_stale() {
        let err = EditError::StaleBase {
            expected: ConfigFingerprint::of_groups(&[]),
            actual: ConfigFingerprint::new([1; 32]),
        };
        assert!(err.is_stale());
        assert!(err.path().is_none());
    }

    #[test]
    fn derived_field_is_not_stale() {
        let path = ObjectPath::group(0).field("derivedFields");
        let err = EditError::DerivedField(path.clone());
        assert!(!err.is_stale());
        assert_eq!(err.path(), Some(&path));
    }

    #[test]
    fn path_error_converts() {
        let err: EditError = PathError::EmptySegment.into();
        assert!(err.to_string().contains("invalid path"));
    }
}
