//! Static taxonomy of well-known topics and extensions

use serde::{Deserialize, Serialize};

/// One node of the taxonomy tree
///
/// A node with an `extension` names a namespace of its `topic`; a node with
/// only a `topic` names the topic itself. Pure grouping nodes carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyNode {
    /// Canonical display name
    pub name: String,

    /// Topic this node describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Extension (namespace) of `topic` this node describes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Nested nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaxonomyNode>,
}

impl TaxonomyNode {
    /// Grouping node without topic or extension
    #[inline]
    #[must_use]
    pub fn group(name: impl Into<String>, children: Vec<TaxonomyNode>) -> Self {
        Self {
            name: name.into(),
            topic: None,
            extension: None,
            description: None,
            children,
        }
    }

    /// Node naming a topic
    #[inline]
    #[must_use]
    pub fn topic(name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            ..Self::group(name, Vec::new())
        }
    }

    /// Node naming an extension of a topic
    #[inline]
    #[must_use]
    pub fn extension(
        name: impl Into<String>,
        topic: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            extension: Some(extension.into()),
            ..Self::topic(name, topic)
        }
    }

    /// With children
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<TaxonomyNode>) -> Self {
        self.children = children;
        self
    }
}

/// Taxonomy forest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicTaxonomy {
    roots: Vec<TaxonomyNode>,
}

impl TopicTaxonomy {
    /// Create from root nodes
    #[inline]
    #[must_use]
    pub fn new(roots: Vec<TaxonomyNode>) -> Self {
        Self { roots }
    }

    /// Taxonomy without entries
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Root nodes
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[TaxonomyNode] {
        &self.roots
    }

    /// Check if taxonomy has no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Depth-first, pre-order walk over every node
    pub fn walk(&self) -> impl Iterator<Item = &TaxonomyNode> {
        let mut stack: Vec<&TaxonomyNode> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}
