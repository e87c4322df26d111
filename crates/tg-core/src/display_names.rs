//! Display names from the topic taxonomy

use indexmap::IndexMap;
use tg_model::TopicTaxonomy;

/// Human-readable labels by topic or extension identifier
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayNames(IndexMap<String, String>);

impl DisplayNames {
    /// Build labels from a taxonomy
    ///
    /// Extension nodes label their extension, topic nodes their topic. The
    /// walk is pre-order and the first label for an identifier wins.
    #[must_use]
    pub fn from_taxonomy(taxonomy: &TopicTaxonomy) -> Self {
        let mut names = IndexMap::new();
        for node in taxonomy.walk() {
            if let Some(identifier) = node.extension.as_ref().or(node.topic.as_ref()) {
                names
                    .entry(identifier.clone())
                    .or_insert_with(|| node.name.clone());
            }
        }
        Self(names)
    }

    /// Label for an identifier, if the taxonomy has one
    #[inline]
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.0.get(identifier).map(String::as_str)
    }

    /// Label for an identifier, falling back to the identifier itself
    #[inline]
    #[must_use]
    pub fn resolve<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.get(identifier).unwrap_or(identifier)
    }

    /// Number of labelled identifiers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no identifier is labelled
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for DisplayNames {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
