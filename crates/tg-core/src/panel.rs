//! Render passes
//!
//! [`TopicGroupsPanel`] owns everything that outlives a single pass: the
//! taxonomy lookups, computed once, and the last aggregated namespace map,
//! reused while the live namespace and transform inputs stay the same.

use tg_model::{
    to_configs, ConfigFingerprint, DerivedTopicGroup, DerivedTopicItem, ObjectPath,
    ObservedNamespace, RuntimeInputs, TopicGroupConfig, TopicTaxonomy,
};

use crate::display_names::DisplayNames;
use crate::error::EditError;
use crate::namespaces::{aggregate_namespaces, NamespacesByTopic};
use crate::options::TopicGroupsOptions;
use crate::synthesize::{synthesize, SynthesisContext};

/// Taxonomy lookups shared by every pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaxonomyIndex {
    display_names: DisplayNames,
    namespaces: NamespacesByTopic,
}

impl TaxonomyIndex {
    /// Build display names and taxonomy namespaces
    #[must_use]
    pub fn build(taxonomy: &TopicTaxonomy) -> Self {
        let index = Self {
            display_names: DisplayNames::from_taxonomy(taxonomy),
            namespaces: NamespacesByTopic::from_taxonomy(taxonomy),
        };
        tracing::debug!(
            display_names = index.display_names.len(),
            namespace_topics = index.namespaces.len(),
            "indexed topic taxonomy"
        );
        index
    }

    /// Labels by topic or extension
    #[inline]
    #[must_use]
    pub fn display_names(&self) -> &DisplayNames {
        &self.display_names
    }

    /// Namespaces declared by the taxonomy
    #[inline]
    #[must_use]
    pub fn namespaces(&self) -> &NamespacesByTopic {
        &self.namespaces
    }
}

#[derive(Debug, Clone)]
struct NamespaceMemo {
    observed: Vec<ObservedNamespace>,
    transforms: Vec<String>,
    merged: NamespacesByTopic,
}

impl NamespaceMemo {
    fn matches(&self, inputs: &RuntimeInputs) -> bool {
        self.observed == inputs.namespaces && self.transforms == inputs.available_tfs
    }
}

fn refresh_namespaces<'m>(
    memo: &'m mut Option<NamespaceMemo>,
    taxonomy: &NamespacesByTopic,
    inputs: &RuntimeInputs,
    transform_topic: &str,
) -> &'m NamespacesByTopic {
    if memo.as_ref().is_some_and(|memo| memo.matches(inputs)) {
        tracing::trace!("reusing aggregated namespaces");
    } else {
        *memo = None;
    }
    let memo = memo.get_or_insert_with(|| NamespaceMemo {
        observed: inputs.namespaces.clone(),
        transforms: inputs.available_tfs.clone(),
        merged: aggregate_namespaces(
            taxonomy,
            &inputs.namespaces,
            &inputs.available_tfs,
            transform_topic,
        ),
    });
    &memo.merged
}

/// Topic groups panel
///
/// # Example
///
/// ```rust,ignore
/// let mut panel = TopicGroupsPanel::new(&taxonomy, TopicGroupsOptions::default());
/// let pass = panel.render(&config.topic_groups, &inputs);
/// for group in pass.groups() {
///     println!("{} ({} available)", group.id(), group.derived_fields.available_item_count);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TopicGroupsPanel {
    index: TaxonomyIndex,
    options: TopicGroupsOptions,
    namespace_memo: Option<NamespaceMemo>,
}

impl TopicGroupsPanel {
    /// Create panel for a taxonomy
    #[must_use]
    pub fn new(taxonomy: &TopicTaxonomy, options: TopicGroupsOptions) -> Self {
        Self {
            index: TaxonomyIndex::build(taxonomy),
            options,
            namespace_memo: None,
        }
    }

    /// Taxonomy lookups
    #[inline]
    #[must_use]
    pub fn index(&self) -> &TaxonomyIndex {
        &self.index
    }

    /// Panel options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &TopicGroupsOptions {
        &self.options
    }

    /// Replace the taxonomy, dropping cached namespaces
    pub fn set_taxonomy(&mut self, taxonomy: &TopicTaxonomy) {
        self.index = TaxonomyIndex::build(taxonomy);
        self.namespace_memo = None;
    }

    /// Merged namespaces for `inputs`
    pub fn namespaces(&mut self, inputs: &RuntimeInputs) -> &NamespacesByTopic {
        refresh_namespaces(
            &mut self.namespace_memo,
            &self.index.namespaces,
            inputs,
            &self.options.transform_topic,
        )
    }

    /// Run one render pass
    pub fn render(&mut self, groups: &[TopicGroupConfig], inputs: &RuntimeInputs) -> RenderPass {
        let namespaces = refresh_namespaces(
            &mut self.namespace_memo,
            &self.index.namespaces,
            inputs,
            &self.options.transform_topic,
        );
        let context = SynthesisContext {
            display_names: &self.index.display_names,
            namespaces,
            available_topics: &inputs.available_topics,
        };
        RenderPass {
            groups: synthesize(groups, &context),
            source: ConfigFingerprint::of_groups(groups),
        }
    }
}

/// Output of one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    groups: Vec<DerivedTopicGroup>,
    source: ConfigFingerprint,
}

impl RenderPass {
    /// Derived groups
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &[DerivedTopicGroup] {
        &self.groups
    }

    /// Fingerprint of the config the pass was built from
    #[inline]
    #[must_use]
    pub fn source(&self) -> ConfigFingerprint {
        self.source
    }

    /// Ids of expanded groups, the panels open by default
    #[must_use]
    pub fn active_keys(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|group| group.group.expanded)
            .map(DerivedTopicGroup::id)
            .collect()
    }

    /// Group by position
    #[inline]
    #[must_use]
    pub fn group(&self, index: usize) -> Option<&DerivedTopicGroup> {
        self.groups.get(index)
    }

    /// Item addressed by an item path (`[g].items[i]`)
    #[must_use]
    pub fn item(&self, path: &ObjectPath) -> Option<&DerivedTopicItem> {
        if path.len() != 3 {
            return None;
        }
        let group = self.group(path.group_index()?)?;
        group.items().get(path.item_index()?)
    }

    /// Persisted groups the pass was built from
    #[must_use]
    pub fn to_configs(&self) -> Vec<TopicGroupConfig> {
        to_configs(&self.groups)
    }

    /// Check that `current` is still the config this pass was built from
    ///
    /// # Errors
    /// Returns [`EditError::StaleBase`] if the config changed since the pass
    pub fn validate_base(&self, current: &[TopicGroupConfig]) -> Result<(), EditError> {
        let actual = ConfigFingerprint::of_groups(current);
        if actual == self.source {
            Ok(())
        } else {
            tracing::debug!(expected = %self.source.short(), actual = %actual.short(), "stale render pass");
            Err(EditError::StaleBase {
                expected: self.source,
                actual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tg_model::{TaxonomyNode, Topic, TopicItemConfig};

    fn taxonomy() -> TopicTaxonomy {
        TopicTaxonomy::new(vec![
            TaxonomyNode::topic("Lidar", "/lidar"),
            TaxonomyNode::topic("Map", "/metadata").with_children(vec![TaxonomyNode::extension(
                "Lanes",
                "/metadata",
                "lanes",
            )]),
        ])
    }

    fn groups() -> Vec<TopicGroupConfig> {
        vec![
            TopicGroupConfig::new("A")
                .with_expanded(true)
                .with_items(vec![TopicItemConfig::new("/lidar"), TopicItemConfig::new("/metadata")]),
            TopicGroupConfig::new("B").with_items(vec![TopicItemConfig::new("/tf")]),
        ]
    }

    fn inputs() -> RuntimeInputs {
        RuntimeInputs::new()
            .with_topics(vec![Topic::new("/lidar"), Topic::new("/tf")])
            .with_namespaces(vec![ObservedNamespace::new("/metadata", "live")])
            .with_tfs(vec!["map".to_string(), "base_link".to_string()])
    }

    #[test]
    fn render_resolves_names_and_namespaces() {
        let mut panel = TopicGroupsPanel::new(&taxonomy(), TopicGroupsOptions::default());
        let pass = panel.render(&groups(), &inputs());

        let first = pass.group(0).unwrap();
        assert_eq!(first.items()[0].display_name(), "Lidar");
        assert_eq!(first.items()[1].derived_fields.available_namespaces, vec!["lanes"]);
        let tf = &pass.group(1).unwrap().items()[0];
        assert_eq!(tf.derived_fields.available_namespaces, vec!["map", "base_link"]);
        assert!(tf.is_available());
    }

    #[test]
    fn active_keys_are_expanded_groups() {
        let mut panel = TopicGroupsPanel::new(&taxonomy(), TopicGroupsOptions::default());
        let pass = panel.render(&groups(), &inputs());
        assert_eq!(pass.active_keys(), vec!["A_0"]);
    }

    #[test]
    fn item_lookup_by_path() {
        let mut panel = TopicGroupsPanel::new(&taxonomy(), TopicGroupsOptions::default());
        let pass = panel.render(&groups(), &inputs());

        let item = pass.item(&ObjectPath::group(0).item(1)).unwrap();
        assert_eq!(item.item.topic_name, "/metadata");
        assert!(pass.item(&ObjectPath::group(0).item(5)).is_none());
        assert!(pass.item(&ObjectPath::group(0)).is_none());
        assert!(pass.item(&ObjectPath::group(0).item(0).field("visible")).is_none());
    }

    #[test]
    fn validate_base_detects_external_change() {
        let mut panel = TopicGroupsPanel::new(&taxonomy(), TopicGroupsOptions::default());
        let config = groups();
        let pass = panel.render(&config, &inputs());
        assert!(pass.validate_base(&config).is_ok());
        assert_eq!(pass.to_configs(), config);

        let mut changed = config;
        changed[1].visible = false;
        let err = pass.validate_base(&changed).unwrap_err();
        assert!(err.is_stale());
    }

    #[test]
    fn namespace_memo_follows_inputs() {
        let mut panel = TopicGroupsPanel::new(&taxonomy(), TopicGroupsOptions::default());
        let first = panel.namespaces(&inputs()).clone();
        assert_eq!(panel.namespaces(&inputs()), &first);

        let without_tfs = RuntimeInputs::new();
        let second = panel.namespaces(&without_tfs).clone();
        assert!(second.get("/tf").is_empty());
        assert!(second.get("/metadata").len() == 1);
        assert_ne!(first, second);
    }

    #[test]
    fn custom_transform_topic() {
        let options = TopicGroupsOptions::new().with_transform_topic("/tf_static");
        let mut panel = TopicGroupsPanel::new(&TopicTaxonomy::empty(), options);
        let namespaces = panel.namespaces(&inputs());
        assert_eq!(namespaces.get("/tf_static").len(), 2);
        assert!(!namespaces.contains("/tf"));
    }

    #[test]
    fn set_taxonomy_rebuilds_index() {
        let mut panel = TopicGroupsPanel::new(&TopicTaxonomy::empty(), TopicGroupsOptions::default());
        assert!(panel.index().display_names().is_empty());
        panel.set_taxonomy(&taxonomy());
        assert_eq!(panel.index().display_names().get("/lidar"), Some("Lidar"));
        assert_eq!(panel.namespaces(&RuntimeInputs::new()).get("/metadata").len(), 1);
    }
}
