//! Derived view-model types
//!
//! A [`DerivedTopicGroup`] is the persisted group plus a `derivedFields`
//! record computed for one render pass. Derived values live in their own
//! structs, so going back to the persisted shape ([`DerivedTopicGroup::to_config`])
//! cannot carry them along. The JSON projection keeps the `derivedFields`
//! key, which [`strip_derived_fields`] removes again.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::config::{TopicGroup, TopicGroupConfig, TopicItemConfig};
use crate::path::ObjectPath;

/// Key of the derived-fields record in the JSON projection
pub const DERIVED_FIELDS_KEY: &str = "derivedFields";

/// Group computed for one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTopicGroup {
    /// Persisted header fields and derived items
    #[serde(flatten)]
    pub group: TopicGroup<DerivedTopicItem>,

    /// Values computed for this pass
    pub derived_fields: GroupDerivedFields,
}

impl DerivedTopicGroup {
    /// Panel key
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.derived_fields.id
    }

    /// Items of this group
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[DerivedTopicItem] {
        &self.group.items
    }

    /// Rebuild the persisted group, dropping every derived field
    #[inline]
    #[must_use]
    pub fn to_config(&self) -> TopicGroupConfig {
        self.group.map_items(|item| item.item.clone())
    }
}

/// Derived values attached to a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDerivedFields {
    /// Synthetic identifier, stable for a given name and position
    pub id: String,

    /// Path of the group in the tree
    pub object_path: ObjectPath,

    /// Number of items whose topic is currently available
    pub available_item_count: usize,
}

/// Item computed for one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTopicItem {
    /// Persisted item fields
    #[serde(flatten)]
    pub item: TopicItemConfig,

    /// Values computed for this pass
    pub derived_fields: ItemDerivedFields,
}

impl DerivedTopicItem {
    /// Resolved display name
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.derived_fields.display_name
    }

    /// Whether the topic currently exists
    #[inline]
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.derived_fields.available
    }
}

/// Derived values attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDerivedFields {
    /// Group id plus item position
    pub id: String,

    /// Override, taxonomy name, or raw topic name
    pub display_name: String,

    /// Namespaces known for the topic (empty if none)
    pub available_namespaces: Vec<String>,

    /// Whether the topic is in the available topic list
    pub available: bool,

    /// Path of the item in the tree
    pub object_path: ObjectPath,
}

/// Rebuild the persisted group list from a derived tree
#[must_use]
pub fn to_configs(groups: &[DerivedTopicGroup]) -> Vec<TopicGroupConfig> {
    groups.iter().map(DerivedTopicGroup::to_config).collect()
}

/// Remove every `derivedFields` key, recursively
///
/// Returns the number of keys removed.
pub fn strip_derived_fields(value: &mut JsonValue) -> usize {
    match value {
        JsonValue::Object(map) => {
            let removed = usize::from(map.remove(DERIVED_FIELDS_KEY).is_some());
            removed + map.values_mut().map(strip_derived_fields).sum::<usize>()
        }
        JsonValue::Array(values) => values.iter_mut().map(strip_derived_fields).sum(),
        _ => 0,
    }
}

/// Check if any object below `value` still has a `derivedFields` key
#[must_use]
pub fn contains_derived_fields(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(map) => {
            map.contains_key(DERIVED_FIELDS_KEY) || map.values().any(contains_derived_fields)
        }
        JsonValue::Array(values) => values.iter().any(contains_derived_fields),
        _ => false,
    }
}
