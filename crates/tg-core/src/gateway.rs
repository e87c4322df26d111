//! Path-mutation gateway
//!
//! Turns an edit on the derived tree into a persistable group list:
//! 1. project the derived tree to JSON (a deep copy; the rendered tree is
//!    never touched);
//! 2. write the new value at the path;
//! 3. strip every `derivedFields` record and drop null holes from the group
//!    and item arrays;
//! 4. decode into [`TopicGroupConfig`]s, rejecting results that do not fit.

use serde_json::{Map, Value as JsonValue};
use tg_model::{
    strip_derived_fields, DerivedTopicGroup, ObjectPath, PathStep, TopicGroupConfig, ITEMS_KEY,
};

use crate::error::EditError;
use crate::options::PathMode;

/// Apply one edit and return the group list to persist
///
/// # Errors
/// - [`EditError::DerivedField`] if a strict path writes into derived fields
/// - [`EditError::Unresolved`] if a strict path does not resolve
/// - [`EditError::TypeMismatch`] if the path crosses a scalar value
/// - [`EditError::Malformed`] if the result is not valid configuration
pub fn apply_edit(
    groups: &[DerivedTopicGroup],
    path: &ObjectPath,
    new_value: JsonValue,
    mode: PathMode,
) -> Result<Vec<TopicGroupConfig>, EditError> {
    if mode == PathMode::Strict && path.touches_derived_fields() {
        return Err(EditError::DerivedField(path.clone()));
    }

    let mut tree = serde_json::to_value(groups)?;
    match mode {
        PathMode::Strict => write_existing(&mut tree, path, new_value)?,
        PathMode::CreateMissing => write_creating(&mut tree, path, new_value)?,
    }

    let stripped = strip_derived_fields(&mut tree);
    let dropped = compact(&mut tree);
    tracing::debug!(%path, ?mode, stripped, dropped, "applied topic group edit");

    serde_json::from_value(tree).map_err(|source| EditError::Malformed {
        path: path.clone(),
        source,
    })
}

/// Persist expand state: each group is expanded iff its id is active
#[must_use]
pub fn apply_collapse_change<S: AsRef<str>>(
    groups: &[DerivedTopicGroup],
    active_keys: &[S],
) -> Vec<TopicGroupConfig> {
    groups
        .iter()
        .map(|group| {
            let mut config = group.to_config();
            config.expanded = active_keys.iter().any(|key| key.as_ref() == group.id());
            config
        })
        .collect()
}

fn child_mut<'v>(node: &'v mut JsonValue, step: &PathStep) -> Option<&'v mut JsonValue> {
    match (node, step) {
        (JsonValue::Object(map), PathStep::Key(key)) => map.get_mut(key),
        (JsonValue::Array(values), PathStep::Index(index)) => values.get_mut(*index),
        _ => None,
    }
}

/// Write at a path whose containers all exist
///
/// The last step may add a key to an existing object; an index must be in
/// range.
fn write_existing(root: &mut JsonValue, path: &ObjectPath, value: JsonValue) -> Result<(), EditError> {
    let Some((last, parents)) = path.steps().split_last() else {
        *root = value;
        return Ok(());
    };

    let mut node = root;
    for (depth, step) in parents.iter().enumerate() {
        node = match child_mut(node, step) {
            Some(child) if !child.is_null() => child,
            _ => {
                return Err(EditError::Unresolved {
                    path: path.clone(),
                    missing: path.prefix(depth + 1),
                })
            }
        };
    }

    match (node, last) {
        (JsonValue::Object(map), PathStep::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (JsonValue::Array(values), PathStep::Index(index)) => match values.get_mut(*index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EditError::Unresolved {
                path: path.clone(),
                missing: path.clone(),
            }),
        },
        _ => Err(EditError::TypeMismatch {
            path: path.clone(),
            at: path.prefix(parents.len()),
        }),
    }
}

fn empty_container(step: &PathStep) -> JsonValue {
    match step {
        PathStep::Index(_) => JsonValue::Array(Vec::new()),
        PathStep::Key(_) => JsonValue::Object(Map::new()),
    }
}

/// Write at a path, creating what is missing
///
/// A missing or null slot becomes an array when the next step is an index and
/// an object otherwise. An index past the end of an array appends one slot.
fn write_creating(root: &mut JsonValue, path: &ObjectPath, value: JsonValue) -> Result<(), EditError> {
    let steps = path.steps();
    let mut node = root;

    for (depth, step) in steps.iter().enumerate() {
        if node.is_null() {
            *node = empty_container(step);
            tracing::warn!(%path, created = %path.prefix(depth), "created missing container");
        }
        node = match (node, step) {
            (JsonValue::Object(map), PathStep::Key(key)) => {
                map.entry(key.clone()).or_insert(JsonValue::Null)
            }
            (JsonValue::Array(values), PathStep::Index(index)) => {
                let slot = if *index < values.len() {
                    *index
                } else {
                    tracing::warn!(%path, len = values.len(), index, "appended array slot");
                    values.push(JsonValue::Null);
                    values.len() - 1
                };
                &mut values[slot]
            }
            _ => {
                return Err(EditError::TypeMismatch {
                    path: path.clone(),
                    at: path.prefix(depth),
                })
            }
        };
    }

    *node = value;
    Ok(())
}

/// Drop null holes from the group array and every item array
///
/// Also turns a null `items` into an empty list. Returns the number of holes
/// dropped.
fn compact(tree: &mut JsonValue) -> usize {
    let JsonValue::Array(groups) = tree else {
        return 0;
    };
    let before = groups.len();
    groups.retain(|group| !group.is_null());
    let mut dropped = before - groups.len();

    for group in groups.iter_mut() {
        if let Some(items) = group.get_mut(ITEMS_KEY) {
            match items {
                JsonValue::Array(values) => {
                    let before = values.len();
                    values.retain(|item| !item.is_null());
                    dropped += before - values.len();
                }
                JsonValue::Null => *items = JsonValue::Array(Vec::new()),
                _ => {}
            }
        }
    }
    dropped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_names::DisplayNames;
    use crate::namespaces::NamespacesByTopic;
    use crate::synthesize::{synthesize, SynthesisContext};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tg_model::{to_configs, Topic, TopicItemConfig};

    fn config() -> Vec<TopicGroupConfig> {
        vec![
            TopicGroupConfig::new("A").with_items(vec![
                TopicItemConfig::new("/a"),
                TopicItemConfig::new("/b"),
            ]),
            TopicGroupConfig::new("B")
                .with_expanded(true)
                .with_items(vec![TopicItemConfig::new("/c")]),
        ]
    }

    fn derived() -> Vec<DerivedTopicGroup> {
        let names = DisplayNames::default();
        let namespaces = NamespacesByTopic::new();
        let topics = vec![Topic::new("/a")];
        synthesize(
            &config(),
            &SynthesisContext {
                display_names: &names,
                namespaces: &namespaces,
                available_topics: &topics,
            },
        )
    }

    fn path(raw: &str) -> ObjectPath {
        raw.parse().unwrap()
    }

    #[test]
    fn edit_item_visibility() {
        let groups = derived();
        let saved = apply_edit(&groups, &path("[0].items[1].visible"), json!(false), PathMode::Strict).unwrap();

        let mut expected = config();
        expected[0].items[1].visible = false;
        assert_eq!(saved, expected);
    }

    #[test]
    fn edit_leaves_rendered_tree_untouched() {
        let groups = derived();
        let before = groups.clone();
        apply_edit(&groups, &path("[0].visible"), json!(false), PathMode::Strict).unwrap();
        assert_eq!(groups, before);
    }

    #[test]
    fn edit_adds_new_key_to_existing_object() {
        let groups = derived();
        let saved = apply_edit(
            &groups,
            &path("[1].items[0].settings"),
            json!({"color": "#ff0000"}),
            PathMode::Strict,
        )
        .unwrap();
        assert_eq!(saved[1].items[0].settings, Some(json!({"color": "#ff0000"})));
    }

    #[test]
    fn edit_replaces_whole_item() {
        let groups = derived();
        let saved = apply_edit(
            &groups,
            &path("[0].items[0]"),
            json!({"topicName": "/z", "visible": false}),
            PathMode::Strict,
        )
        .unwrap();
        assert_eq!(saved[0].items[0], TopicItemConfig::new("/z").with_visible(false));
    }

    #[test]
    fn edit_rename_group() {
        let groups = derived();
        let saved = apply_edit(&groups, &path("[1].displayName"), json!("Renamed"), PathMode::Strict).unwrap();
        assert_eq!(saved[1].display_name, "Renamed");
        assert_eq!(saved[0], config()[0]);
    }

    #[test]
    fn strict_rejects_out_of_range_group() {
        let groups = derived();
        let err = apply_edit(&groups, &path("[5].visible"), json!(true), PathMode::Strict).unwrap_err();
        match err {
            EditError::Unresolved { missing, .. } => assert_eq!(missing, path("[5]")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_rejects_out_of_range_leaf_index() {
        let groups = derived();
        let err = apply_edit(&groups, &path("[0].items[9]"), json!({"topicName": "/q"}), PathMode::Strict)
            .unwrap_err();
        assert!(matches!(err, EditError::Unresolved { .. }));
    }

    #[test]
    fn strict_rejects_missing_nested_object() {
        let groups = derived();
        let err = apply_edit(&groups, &path("[0].items[0].settings.color"), json!("red"), PathMode::Strict)
            .unwrap_err();
        match err {
            EditError::Unresolved { missing, .. } => assert_eq!(missing, path("[0].items[0].settings")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_rejects_derived_field_writes() {
        let groups = derived();
        let err = apply_edit(&groups, &path("[0].derivedFields.id"), json!("x"), PathMode::Strict).unwrap_err();
        assert!(matches!(err, EditError::DerivedField(_)));
    }

    #[test]
    fn create_missing_drops_derived_field_writes() {
        let groups = derived();
        let saved = apply_edit(&groups, &path("[0].derivedFields.id"), json!("x"), PathMode::CreateMissing).unwrap();
        assert_eq!(saved, config());
    }

    #[test]
    fn create_missing_builds_nested_objects() {
        let groups = derived();
        let saved = apply_edit(
            &groups,
            &path("[0].items[0].settings.color"),
            json!("red"),
            PathMode::CreateMissing,
        )
        .unwrap();
        assert_eq!(saved[0].items[0].settings, Some(json!({"color": "red"})));
    }

    #[test]
    fn create_missing_appends_past_end_item() {
        let groups = derived();
        let saved = apply_edit(
            &groups,
            &path("[1].items[4]"),
            json!({"topicName": "/new"}),
            PathMode::CreateMissing,
        )
        .unwrap();
        let topics: Vec<_> = saved[1].items.iter().map(|item| item.topic_name.as_str()).collect();
        assert_eq!(topics, vec!["/c", "/new"]);
    }

    #[test]
    fn create_missing_far_index_appends_one_item() {
        let groups = derived();
        for raw in ["[0].items[4000000000000]", "[0].items[18446744073709551615]"] {
            let saved = apply_edit(&groups, &path(raw), json!({"topicName": "/far"}), PathMode::CreateMissing)
                .unwrap();
            let topics: Vec<_> = saved[0].items.iter().map(|item| item.topic_name.as_str()).collect();
            assert_eq!(topics, vec!["/a", "/b", "/far"]);
        }

        let saved = apply_edit(
            &groups,
            &ObjectPath::group(usize::MAX).field("displayName"),
            json!("Far"),
            PathMode::CreateMissing,
        )
        .unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[2], TopicGroupConfig::new("Far"));
    }

    #[test]
    fn strict_rejects_max_index() {
        let groups = derived();
        let err = apply_edit(
            &groups,
            &ObjectPath::group(0).item(usize::MAX),
            json!({"topicName": "/far"}),
            PathMode::Strict,
        )
        .unwrap_err();
        assert!(err.is_stale());
    }

    #[test]
    fn create_missing_group_without_name_is_malformed() {
        let groups = derived();
        let err = apply_edit(&groups, &path("[3].visible"), json!(true), PathMode::CreateMissing).unwrap_err();
        assert!(matches!(err, EditError::Malformed { .. }));
    }

    #[test]
    fn create_missing_new_group_gets_empty_items() {
        let groups = derived();
        let saved = apply_edit(&groups, &path("[2].displayName"), json!("C"), PathMode::CreateMissing).unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[2], TopicGroupConfig::new("C"));
    }

    #[test]
    fn ill_typed_value_is_malformed() {
        let groups = derived();
        let err = apply_edit(&groups, &path("[0].visible"), json!("yes"), PathMode::Strict).unwrap_err();
        assert!(matches!(err, EditError::Malformed { .. }));
    }

    #[test]
    fn crossing_a_scalar_is_a_type_mismatch() {
        let groups = derived();
        for mode in [PathMode::Strict, PathMode::CreateMissing] {
            let err = apply_edit(&groups, &path("[0].visible.deeper"), json!(1), mode).unwrap_err();
            assert!(matches!(err, EditError::TypeMismatch { .. }), "{mode:?}: {err}");
        }
    }

    #[test]
    fn null_item_is_compacted() {
        let groups = derived();
        let saved = apply_edit(&groups, &path("[0].items[0]"), JsonValue::Null, PathMode::Strict).unwrap();
        assert_eq!(saved[0].items, vec![TopicItemConfig::new("/b")]);
    }

    #[test]
    fn root_replacement() {
        let groups = derived();
        let saved = apply_edit(&groups, &ObjectPath::root(), json!([{"displayName": "Only"}]), PathMode::Strict)
            .unwrap();
        assert_eq!(saved, vec![TopicGroupConfig::new("Only")]);
    }

    #[test]
    fn collapse_change_sets_expanded_from_active_keys() {
        let groups = derived();
        let saved = apply_collapse_change(&groups, &["A_0"]);
        assert!(saved[0].expanded);
        assert!(!saved[1].expanded);
        assert_eq!(saved[0].items, to_configs(&groups)[0].items);
    }

    #[test]
    fn collapse_change_with_no_keys_collapses_all() {
        let groups = derived();
        let saved = apply_collapse_change::<&str>(&groups, &[]);
        assert!(saved.iter().all(|group| !group.expanded));
    }
}
