//! Namespace aggregation
//!
//! Merges three sources into one namespace list per topic, in this order:
//! 1. namespaces observed in live data, grouped by topic;
//! 2. taxonomy namespaces, replacing a topic's live entry wholesale;
//! 3. live transform frames for the transform-frame topic, when any exist.
//!
//! Later sources replace whole entries, they never merge lists.

use indexmap::IndexMap;
use tg_model::{ObservedNamespace, TopicTaxonomy};

/// Namespace lists by topic
///
/// Lists keep source order and may contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NamespacesByTopic(IndexMap<String, Vec<String>>);

impl NamespacesByTopic {
    /// Create empty mapping
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Taxonomy namespaces: every node with both a topic and an extension
    /// contributes the extension to that topic, in walk order
    #[must_use]
    pub fn from_taxonomy(taxonomy: &TopicTaxonomy) -> Self {
        let mut namespaces: IndexMap<String, Vec<String>> = IndexMap::new();
        for node in taxonomy.walk() {
            if let (Some(topic), Some(extension)) = (&node.topic, &node.extension) {
                namespaces
                    .entry(topic.clone())
                    .or_default()
                    .push(extension.clone());
            }
        }
        Self(namespaces)
    }

    /// Live namespaces grouped by topic, in observation order
    #[must_use]
    pub fn from_observed(observed: &[ObservedNamespace]) -> Self {
        let mut namespaces: IndexMap<String, Vec<String>> = IndexMap::new();
        for ObservedNamespace { topic, name } in observed {
            namespaces
                .entry(topic.clone())
                .or_default()
                .push(name.clone());
        }
        Self(namespaces)
    }

    /// Namespaces of a topic (empty if unknown)
    #[inline]
    #[must_use]
    pub fn get(&self, topic: &str) -> &[String] {
        self.0.get(topic).map(Vec::as_slice).unwrap_or_default()
    }

    /// Check if a topic has an entry
    #[inline]
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.0.contains_key(topic)
    }

    /// Replace a topic's entry
    ///
    /// An existing topic keeps its position.
    #[inline]
    pub fn insert(&mut self, topic: impl Into<String>, namespaces: Vec<String>) {
        self.0.insert(topic.into(), namespaces);
    }

    /// Replace every entry `other` has
    pub fn overlay(&mut self, other: &Self) {
        for (topic, namespaces) in &other.0 {
            self.0.insert(topic.clone(), namespaces.clone());
        }
    }

    /// Number of topics with an entry
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no topic has an entry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterator over (topic, namespaces)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(topic, namespaces)| (topic.as_str(), namespaces.as_slice()))
    }
}

/// Merge live namespaces, taxonomy namespaces and transform frames
///
/// The transform-frame entry is only written when `transforms` is non-empty,
/// and then it is exactly `transforms`.
#[must_use]
pub fn aggregate_namespaces(
    taxonomy: &NamespacesByTopic,
    observed: &[ObservedNamespace],
    transforms: &[String],
    transform_topic: &str,
) -> NamespacesByTopic {
    let mut merged = NamespacesByTopic::from_observed(observed);
    merged.overlay(taxonomy);
    if !transforms.is_empty() {
        merged.insert(transform_topic, transforms.to_vec());
    }
    tracing::trace!(
        topics = merged.len(),
        observed = observed.len(),
        transforms = transforms.len(),
        "aggregated namespaces"
    );
    merged
}
