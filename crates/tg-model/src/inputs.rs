//! Runtime inputs supplied fresh for every render pass

use serde::{Deserialize, Serialize};

/// A topic currently offered by the data source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    /// Topic name
    pub name: String,

    /// Message datatype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,

    /// Fixed frame the topic publishes in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_frame: Option<String>,
}

impl Topic {
    /// Create topic by name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datatype: None,
            fixed_frame: None,
        }
    }

    /// With datatype
    #[inline]
    #[must_use]
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }
}

/// A namespace seen in live data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObservedNamespace {
    /// Topic carrying the namespace
    pub topic: String,

    /// Namespace name
    pub name: String,
}

impl ObservedNamespace {
    /// Create observation
    #[inline]
    #[must_use]
    pub fn new(topic: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            name: name.into(),
        }
    }
}

/// Everything live the synthesis pass reads
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeInputs {
    /// Topics that currently exist
    #[serde(default)]
    pub available_topics: Vec<Topic>,

    /// Namespaces reported by the scene builder
    #[serde(default)]
    pub namespaces: Vec<ObservedNamespace>,

    /// Live transform frame identifiers
    #[serde(default)]
    pub available_tfs: Vec<String>,
}

impl RuntimeInputs {
    /// Create empty inputs
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With available topics
    #[inline]
    #[must_use]
    pub fn with_topics(mut self, topics: Vec<Topic>) -> Self {
        self.available_topics = topics;
        self
    }

    /// With observed namespaces
    #[inline]
    #[must_use]
    pub fn with_namespaces(mut self, namespaces: Vec<ObservedNamespace>) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// With transform frame identifiers
    #[inline]
    #[must_use]
    pub fn with_tfs(mut self, tfs: Vec<String>) -> Self {
        self.available_tfs = tfs;
        self
    }
}
