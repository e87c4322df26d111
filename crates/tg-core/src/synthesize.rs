//! Group synthesis
//!
//! Merges persisted groups with display names, namespaces and the available
//! topic list into the derived tree the panel renders. Synthesis is a pure
//! function of its inputs: the same inputs give an equal tree on every call,
//! and the persisted groups are only read.

use std::collections::HashSet;

use tg_model::{
    DerivedTopicGroup, DerivedTopicItem, GroupDerivedFields, ItemDerivedFields, ObjectPath,
    Topic, TopicGroupConfig, TopicItemConfig,
};

use crate::display_names::DisplayNames;
use crate::namespaces::NamespacesByTopic;

/// Lookups shared by every group of one pass
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    /// Labels by topic or extension
    pub display_names: &'a DisplayNames,
    /// Namespaces by topic
    pub namespaces: &'a NamespacesByTopic,
    /// Topics that currently exist
    pub available_topics: &'a [Topic],
}

/// Synthetic group identifier
///
/// Depends only on the group's name and position, so expand state keyed by it
/// survives edits elsewhere in the tree.
#[inline]
#[must_use]
pub fn group_id(display_name: &str, index: usize) -> String {
    format!("{display_name}_{index}")
}

/// Synthetic item identifier
///
/// Group ids end in `_<index>` and item ids in `:<index>`, so the two never
/// coincide.
#[inline]
#[must_use]
pub fn item_id(group_id: &str, index: usize) -> String {
    format!("{group_id}:{index}")
}

/// Build the derived tree for one render pass
#[must_use]
pub fn synthesize(groups: &[TopicGroupConfig], context: &SynthesisContext<'_>) -> Vec<DerivedTopicGroup> {
    let available: HashSet<&str> = context
        .available_topics
        .iter()
        .map(|topic| topic.name.as_str())
        .collect();

    let derived: Vec<_> = groups
        .iter()
        .enumerate()
        .map(|(index, group)| synthesize_group(index, group, context, &available))
        .collect();

    tracing::debug!(
        groups = derived.len(),
        items = derived.iter().map(|group| group.items().len()).sum::<usize>(),
        available_topics = available.len(),
        "synthesized topic groups"
    );
    derived
}

fn synthesize_group(
    index: usize,
    group: &TopicGroupConfig,
    context: &SynthesisContext<'_>,
    available: &HashSet<&str>,
) -> DerivedTopicGroup {
    let id = group_id(&group.display_name, index);
    let object_path = ObjectPath::group(index);

    let mut position = 0;
    let group = group.map_items(|item| {
        let derived = synthesize_item(&id, &object_path, position, item, context, available);
        position += 1;
        derived
    });
    let available_item_count = group.items.iter().filter(|item| item.is_available()).count();

    DerivedTopicGroup {
        group,
        derived_fields: GroupDerivedFields {
            id,
            object_path,
            available_item_count,
        },
    }
}

fn synthesize_item(
    group_id: &str,
    group_path: &ObjectPath,
    index: usize,
    item: &TopicItemConfig,
    context: &SynthesisContext<'_>,
    available: &HashSet<&str>,
) -> DerivedTopicItem {
    let topic = item.topic_name.as_str();
    let display_name = item
        .display_name
        .clone()
        .unwrap_or_else(|| context.display_names.resolve(topic).to_string());

    DerivedTopicItem {
        item: item.clone(),
        derived_fields: ItemDerivedFields {
            id: item_id(group_id, index),
            display_name,
            available_namespaces: context.namespaces.get(topic).to_vec(),
            available: available.contains(topic),
            object_path: group_path.item(index),
        },
    }
}
