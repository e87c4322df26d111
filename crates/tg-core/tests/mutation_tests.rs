//! Edit pipeline tests
//!
//! Edits go through the shell into a sink, and the result is fed back into
//! the next render pass, as a host would.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};
use tg_core::{
    apply_collapse_change, apply_edit, EditError, PathMode, RecordingSink, TopicGroupsOptions,
    TopicGroupsPanel, TopicGroupsShell,
};
use tg_model::{
    contains_derived_fields, strip_derived_fields, ObjectPath, PanelConfig, TopicGroupConfig,
};
use tg_test_utils::{arb_groups, arb_inputs, sample_groups, sample_inputs, sample_taxonomy};

struct Host {
    config: PanelConfig,
    panel: TopicGroupsPanel,
    shell: TopicGroupsShell,
}

impl Host {
    fn new(options: TopicGroupsOptions) -> Self {
        let config = PanelConfig::new(sample_groups());
        Self {
            shell: TopicGroupsShell::new(config.pin_topics, &options),
            panel: TopicGroupsPanel::new(&sample_taxonomy(), options),
            config,
        }
    }

    fn edit(&mut self, path: &str, value: JsonValue) -> Result<(), EditError> {
        let pass = self.panel.render(&self.config.topic_groups, &sample_inputs());
        self.shell
            .on_topic_groups_change_str(&pass, path, value, &mut self.config)
    }
}

#[test]
fn test_expand_toggle_keeps_group_id() {
    let mut panel = TopicGroupsPanel::new(&sample_taxonomy(), TopicGroupsOptions::default());
    let shell = TopicGroupsShell::new(false, &TopicGroupsOptions::default());
    let mut config = PanelConfig::new(sample_groups());

    let before = panel.render(&config.topic_groups, &sample_inputs());
    let id = before.group(1).unwrap().id().to_string();
    shell.on_collapse_change(&before, &[id.as_str()], &mut config);

    let after = panel.render(&config.topic_groups, &sample_inputs());
    assert_eq!(after.group(1).unwrap().id(), id);
    assert!(after.group(1).unwrap().group.expanded);
    assert!(!after.group(0).unwrap().group.expanded);
    assert_eq!(after.active_keys(), vec![id.as_str()]);
}

#[test]
fn test_ids_survive_unrelated_edit() {
    let mut host = Host::new(TopicGroupsOptions::default());
    let before = host.panel.render(&host.config.topic_groups, &sample_inputs());
    host.edit("[1].items[0].visible", json!(false)).unwrap();
    let after = host.panel.render(&host.config.topic_groups, &sample_inputs());

    let ids = |pass: &tg_core::RenderPass| -> Vec<String> {
        pass.groups().iter().map(|group| group.id().to_string()).collect()
    };
    assert_eq!(ids(&before), ids(&after));
    assert!(!host.config.topic_groups[1].items[0].visible);
}

#[test]
fn test_sequential_edits_accumulate() {
    let mut host = Host::new(TopicGroupsOptions::default());
    host.edit("[0].displayName", json!("Sensors")).unwrap();
    host.edit("[0].items[1].visible", json!(true)).unwrap();
    host.edit("[1].items[1].selectedNamespaces", json!(["map"])).unwrap();

    let groups = &host.config.topic_groups;
    assert_eq!(groups[0].display_name, "Sensors");
    assert!(groups[0].items[1].visible);
    assert_eq!(groups[1].items[1].selected_namespaces, Some(vec!["map".to_string()]));
}

#[test]
fn test_strict_edit_on_stale_path() {
    let mut host = Host::new(TopicGroupsOptions::default());
    let before = host.config.clone();
    let err = host.edit("[2].items[0].visible", json!(false)).unwrap_err();
    assert!(err.is_stale());
    assert_eq!(host.config, before);
}

#[test]
fn test_create_missing_appends_group() {
    let mut host = Host::new(TopicGroupsOptions::new().with_path_mode(PathMode::CreateMissing));
    host.edit("[2]", json!({"displayName": "Planning", "items": [{"topicName": "/plan"}]}))
        .unwrap();
    assert_eq!(host.config.topic_groups.len(), 3);
    assert_eq!(host.config.topic_groups[2].items[0].topic_name, "/plan");
}

#[test]
fn test_stale_base_detected_after_external_save() {
    let mut panel = TopicGroupsPanel::new(&sample_taxonomy(), TopicGroupsOptions::default());
    let mut config = PanelConfig::new(sample_groups());
    let pass = panel.render(&config.topic_groups, &sample_inputs());

    config.topic_groups.remove(0);
    let err = pass.validate_base(&config.topic_groups).unwrap_err();
    assert!(matches!(err, EditError::StaleBase { .. }));
}

#[test]
fn test_edits_reach_sink_as_group_patches() {
    let mut panel = TopicGroupsPanel::new(&sample_taxonomy(), TopicGroupsOptions::default());
    let shell = TopicGroupsShell::new(true, &TopicGroupsOptions::default());
    let mut sink = RecordingSink::new();
    let pass = panel.render(&sample_groups(), &sample_inputs());

    shell
        .on_topic_groups_change(&pass, &ObjectPath::group(0).field("visible"), json!(false), &mut sink)
        .unwrap();
    shell.toggle_pin(&mut sink);

    assert_eq!(sink.len(), 2);
    assert!(sink.patches()[0].pin_topics.is_none());
    assert_eq!(sink.patches()[1].pin_topics, Some(false));

    let mut config = PanelConfig::new(sample_groups()).with_pin_topics(true);
    sink.apply_all(&mut config);
    assert!(!config.topic_groups[0].visible);
    assert!(!config.pin_topics);
}

const EDITED_FIELDS: &[&str] = &["visible", "note", "displayName"];

fn arb_edit() -> impl Strategy<Value = (usize, Option<usize>, &'static str, JsonValue)> {
    (
        0..6usize,
        prop::option::of(0..5usize),
        prop::sample::select(EDITED_FIELDS),
        prop_oneof![
            any::<bool>().prop_map(JsonValue::from),
            "[a-z]{1,5}".prop_map(JsonValue::from),
        ],
    )
}

proptest! {
    #[test]
    fn prop_edit_result_never_carries_derived_fields(
        groups in arb_groups(),
        inputs in arb_inputs(),
        (group, item, field, value) in arb_edit(),
        create in any::<bool>(),
    ) {
        let mode = if create { PathMode::CreateMissing } else { PathMode::Strict };
        let mut panel = TopicGroupsPanel::new(&sample_taxonomy(), TopicGroupsOptions::default());
        let pass = panel.render(&groups, &inputs);
        let path = match item {
            Some(item) => ObjectPath::group(group).item(item).field(field),
            None => ObjectPath::group(group).field(field),
        };

        if let Ok(saved) = apply_edit(pass.groups(), &path, value, mode) {
            let value = serde_json::to_value(&saved).unwrap();
            prop_assert!(!contains_derived_fields(&value));
        }
    }

    #[test]
    fn prop_identity_edit_round_trips(groups in arb_groups(), inputs in arb_inputs()) {
        let mut panel = TopicGroupsPanel::new(&sample_taxonomy(), TopicGroupsOptions::default());
        let pass = panel.render(&groups, &inputs);
        for (index, group) in groups.iter().enumerate() {
            let path = ObjectPath::group(index).field("visible");
            let saved = apply_edit(pass.groups(), &path, json!(group.visible), PathMode::Strict).unwrap();
            prop_assert_eq!(&saved, &groups);
        }
    }

    #[test]
    fn prop_strip_of_projection_is_config(groups in arb_groups(), inputs in arb_inputs()) {
        let mut panel = TopicGroupsPanel::new(&sample_taxonomy(), TopicGroupsOptions::default());
        let pass = panel.render(&groups, &inputs);
        let mut tree = serde_json::to_value(pass.groups()).unwrap();
        let expected_records = pass.groups().len()
            + pass.groups().iter().map(|group| group.items().len()).sum::<usize>();
        prop_assert_eq!(strip_derived_fields(&mut tree), expected_records);

        let decoded: Vec<TopicGroupConfig> = serde_json::from_value(tree).unwrap();
        prop_assert_eq!(decoded, groups);
    }

    #[test]
    fn prop_collapse_change_matches_active_keys(
        groups in arb_groups(),
        picks in prop::collection::vec(any::<bool>(), 0..5),
    ) {
        let mut panel = TopicGroupsPanel::new(&sample_taxonomy(), TopicGroupsOptions::default());
        let pass = panel.render(&groups, &sample_inputs());
        let active: Vec<&str> = pass
            .groups()
            .iter()
            .zip(picks.iter().chain(std::iter::repeat(&false)))
            .filter(|(_, pick)| **pick)
            .map(|(group, _)| group.id())
            .collect();

        let saved = apply_collapse_change(pass.groups(), &active);
        prop_assert_eq!(saved.len(), groups.len());
        for (index, group) in saved.iter().enumerate() {
            let id = pass.groups()[index].id();
            prop_assert_eq!(group.expanded, active.contains(&id));
            prop_assert_eq!(&group.items, &groups[index].items);
        }
    }
}
