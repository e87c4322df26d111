//! Options for the topic group panel

use serde::{Deserialize, Serialize};

/// Topic whose namespaces come from live transform frames
pub const DEFAULT_TRANSFORM_TOPIC: &str = "/tf";

/// How edits treat paths that do not resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathMode {
    /// Every container along the path must exist; misses are reported
    #[default]
    Strict,
    /// Missing containers are created, past-the-end indexes append
    CreateMissing,
}

/// Panel options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicGroupsOptions {
    /// Path resolution for edits
    pub path_mode: PathMode,
    /// Transform-frame topic name
    pub transform_topic: String,
}

impl TopicGroupsOptions {
    /// Create default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With path mode
    #[inline]
    #[must_use]
    pub fn with_path_mode(mut self, path_mode: PathMode) -> Self {
        self.path_mode = path_mode;
        self
    }

    /// With transform topic
    #[inline]
    #[must_use]
    pub fn with_transform_topic(mut self, topic: impl Into<String>) -> Self {
        self.transform_topic = topic.into();
        self
    }
}

impl Default for TopicGroupsOptions {
    fn default() -> Self {
        Self {
            path_mode: PathMode::Strict,
            transform_topic: DEFAULT_TRANSFORM_TOPIC.to_string(),
        }
    }
}
