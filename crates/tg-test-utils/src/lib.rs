//! Testing utilities for the Topic Groups workspace
//!
//! Shared fixtures and proptest strategies.

#![allow(missing_docs)]

use proptest::prelude::*;
use serde_json::json;
use tg_model::{
    ObservedNamespace, RuntimeInputs, TaxonomyNode, Topic, TopicGroupConfig, TopicItemConfig,
    TopicTaxonomy,
};

/// Topic pool used by fixtures and strategies
pub const TOPICS: &[&str] = &[
    "/lidar",
    "/radar",
    "/tf",
    "/markers",
    "/metadata",
    "/camera/image",
];

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

pub fn sample_taxonomy() -> TopicTaxonomy {
    TopicTaxonomy::new(vec![
        TaxonomyNode::group(
            "Perception",
            vec![
                TaxonomyNode::topic("Lidar", "/lidar"),
                TaxonomyNode::topic("Radar", "/radar"),
            ],
        ),
        TaxonomyNode::topic("Map", "/metadata").with_children(vec![
            TaxonomyNode::extension("Lanes", "/metadata", "lanes"),
            TaxonomyNode::extension("Crosswalks", "/metadata", "crosswalks"),
        ]),
        TaxonomyNode::topic("Transforms", "/tf"),
    ])
}

pub fn sample_groups() -> Vec<TopicGroupConfig> {
    vec![
        TopicGroupConfig::new("Perception")
            .with_expanded(true)
            .with_items(vec![
                TopicItemConfig::new("/lidar"),
                TopicItemConfig::new("/radar").with_visible(false),
                TopicItemConfig::new("/markers").with_display_name("Tracked objects"),
            ]),
        TopicGroupConfig::new("Map").with_items(vec![
            TopicItemConfig::new("/metadata").with_settings(json!({"overrideColor": "#00ff00"})),
            TopicItemConfig::new("/tf"),
        ]),
    ]
}

pub fn sample_inputs() -> RuntimeInputs {
    RuntimeInputs::new()
        .with_topics(vec![
            Topic::new("/lidar").with_datatype("sensor_msgs/PointCloud2"),
            Topic::new("/markers").with_datatype("visualization_msgs/MarkerArray"),
            Topic::new("/tf").with_datatype("tf2_msgs/TFMessage"),
        ])
        .with_namespaces(vec![
            ObservedNamespace::new("/markers", "cars"),
            ObservedNamespace::new("/markers", "pedestrians"),
            ObservedNamespace::new("/metadata", "live_lanes"),
        ])
        .with_tfs(strings(&["map", "odom", "base_link"]))
}

/// One group with a single available `/lidar` item
pub fn lidar_scenario() -> (Vec<TopicGroupConfig>, RuntimeInputs) {
    let groups = vec![TopicGroupConfig::new("A").with_items(vec![TopicItemConfig::new("/lidar")])];
    let inputs = RuntimeInputs::new().with_topics(vec![Topic::new("/lidar")]);
    (groups, inputs)
}

pub fn arb_item() -> impl Strategy<Value = TopicItemConfig> {
    (
        prop::sample::select(TOPICS),
        prop::option::of("[A-Za-z]{1,6}"),
        any::<bool>(),
        prop::option::of(prop::collection::vec("[a-z]{1,4}", 0..3)),
        prop::option::of(any::<u8>()),
    )
        .prop_map(|(topic, display_name, visible, selected, point_size)| {
            let mut item = TopicItemConfig::new(topic).with_visible(visible);
            item.display_name = display_name;
            item.selected_namespaces = selected;
            item.settings = point_size.map(|size| json!({"pointSize": size}));
            item
        })
}

pub fn arb_group() -> impl Strategy<Value = TopicGroupConfig> {
    (
        "[A-Z][a-z]{0,6}",
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(arb_item(), 0..4),
        prop::option::of("[a-z]{1,5}"),
    )
        .prop_map(|(name, visible, expanded, items, note)| {
            let mut group = TopicGroupConfig::new(name)
                .with_visible(visible)
                .with_expanded(expanded)
                .with_items(items);
            if let Some(note) = note {
                group.extra.insert("note".to_string(), json!(note));
            }
            group
        })
}

pub fn arb_groups() -> impl Strategy<Value = Vec<TopicGroupConfig>> {
    prop::collection::vec(arb_group(), 0..5)
}

pub fn arb_inputs() -> impl Strategy<Value = RuntimeInputs> {
    (
        prop::sample::subsequence(TOPICS.to_vec(), 0..=TOPICS.len()),
        prop::collection::vec((prop::sample::select(TOPICS), "[a-z]{1,4}"), 0..5),
        prop::collection::vec("[a-z_]{1,6}", 0..3),
    )
        .prop_map(|(topics, namespaces, tfs)| {
            RuntimeInputs::new()
                .with_topics(topics.into_iter().map(Topic::new).collect())
                .with_namespaces(
                    namespaces
                        .into_iter()
                        .map(|(topic, name)| ObservedNamespace::new(topic, name))
                        .collect(),
                )
                .with_tfs(tfs)
        })
}
