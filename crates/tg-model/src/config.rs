//! Persisted topic group configuration
//!
//! These are the only shapes written to durable storage. They never carry
//! derived fields; see [`crate::derived`] for the view-model counterparts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

fn default_visible() -> bool {
    true
}

/// A group of visualization items
///
/// Generic over the item type so the persisted shape ([`TopicGroupConfig`])
/// and the view-model shape share one definition of the group header fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "I: Deserialize<'de>"))]
pub struct TopicGroup<I> {
    /// Group name shown in the panel header
    pub display_name: String,

    /// Whether the group's items render in the scene
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Whether the group's panel is expanded
    #[serde(default)]
    pub expanded: bool,

    /// Ordered items
    #[serde(default)]
    pub items: Vec<I>,

    /// Fields this version does not know about, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl<I> TopicGroup<I> {
    /// Create a visible, collapsed group without items
    #[inline]
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            visible: true,
            expanded: false,
            items: Vec::new(),
            extra: Map::new(),
        }
    }

    /// With items
    #[inline]
    #[must_use]
    pub fn with_items(mut self, items: Vec<I>) -> Self {
        self.items = items;
        self
    }

    /// With expanded flag
    #[inline]
    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// With visibility flag
    #[inline]
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Rebuild the group with every item mapped through `f`
    ///
    /// Header fields are cloned; the source group is left untouched.
    pub fn map_items<J, F>(&self, f: F) -> TopicGroup<J>
    where
        F: FnMut(&I) -> J,
    {
        TopicGroup {
            display_name: self.display_name.clone(),
            visible: self.visible,
            expanded: self.expanded,
            items: self.items.iter().map(f).collect(),
            extra: self.extra.clone(),
        }
    }
}

/// Persisted group
pub type TopicGroupConfig = TopicGroup<TopicItemConfig>;

/// One visualization item bound to a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicItemConfig {
    /// Topic name, possibly namespace-qualified
    pub topic_name: String,

    /// Display override; wins over taxonomy names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Whether the item renders in the scene
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Namespaces the user narrowed the item to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_namespaces: Option<Vec<String>>,

    /// Per-datatype settings, owned by the settings editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<JsonValue>,

    /// Fields this version does not know about, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl TopicItemConfig {
    /// Create a visible item for `topic_name`
    #[inline]
    #[must_use]
    pub fn new(topic_name: impl Into<String>) -> Self {
        Self {
            topic_name: topic_name.into(),
            display_name: None,
            visible: true,
            selected_namespaces: None,
            settings: None,
            extra: Map::new(),
        }
    }

    /// With display override
    #[inline]
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// With visibility flag
    #[inline]
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// With settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: JsonValue) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// The slice of the 3D panel configuration this workspace reads and writes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    /// Persisted groups
    #[serde(default)]
    pub topic_groups: Vec<TopicGroupConfig>,

    /// Whether the topic picker stays open
    #[serde(default)]
    pub pin_topics: bool,

    /// Other panel settings, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl PanelConfig {
    /// Create config with groups
    #[inline]
    #[must_use]
    pub fn new(topic_groups: Vec<TopicGroupConfig>) -> Self {
        Self {
            topic_groups,
            ..Self::default()
        }
    }

    /// With pin flag
    #[inline]
    #[must_use]
    pub fn with_pin_topics(mut self, pin_topics: bool) -> Self {
        self.pin_topics = pin_topics;
        self
    }
}

/// Partial replacement handed to the persistence collaborator
///
/// Only fields that changed are set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    /// Full replacement group list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_groups: Option<Vec<TopicGroupConfig>>,

    /// New pin flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_topics: Option<bool>,
}

impl ConfigPatch {
    /// Patch replacing the group list
    #[inline]
    #[must_use]
    pub fn topic_groups(topic_groups: Vec<TopicGroupConfig>) -> Self {
        Self {
            topic_groups: Some(topic_groups),
            pin_topics: None,
        }
    }

    /// Patch setting the pin flag
    #[inline]
    #[must_use]
    pub fn pin_topics(pin_topics: bool) -> Self {
        Self {
            topic_groups: None,
            pin_topics: Some(pin_topics),
        }
    }

    /// Check if patch changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topic_groups.is_none() && self.pin_topics.is_none()
    }

    /// Merge patch into a panel config
    pub fn apply_to(self, config: &mut PanelConfig) {
        if let Some(topic_groups) = self.topic_groups {
            config.topic_groups = topic_groups;
        }
        if let Some(pin_topics) = self.pin_topics {
            config.pin_topics = pin_topics;
        }
    }
}
