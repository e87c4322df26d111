//! Object paths for addressing nodes in a topic group tree
//!
//! Provides [`ObjectPath`], a typed sequence of [`PathStep`]s that addresses a
//! group, an item, or any field below them. Paths parse from and display as
//! the bracket form used by panel headers and the settings editor, e.g.
//! `[0].items[2].visible`. Keys that would not parse back as plain keys, such
//! as numeric settings keys, display quoted in brackets: `settings["0"]`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::derived::DERIVED_FIELDS_KEY;

/// Key under which a group stores its items
pub const ITEMS_KEY: &str = "items";

/// One step of an [`ObjectPath`]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathStep {
    /// Position within an array
    Index(usize),
    /// Field name within an object
    Key(String),
}

impl PathStep {
    /// Create a key step
    #[inline]
    #[must_use]
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// Key name, if this is a key step
    #[inline]
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(name) => Some(name.as_str()),
            Self::Index(_) => None,
        }
    }

    /// Index, if this is an index step
    #[inline]
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(_) => None,
        }
    }

    /// Parse a dotted segment. All-digit segments address array positions.
    fn parse_segment(segment: &str) -> Result<Self, PathError> {
        if segment.is_empty() {
            return Err(PathError::EmptySegment);
        }
        if segment.bytes().all(|b| b.is_ascii_digit()) {
            return segment
                .parse()
                .map(Self::Index)
                .map_err(|_| PathError::InvalidIndex(segment.to_string()));
        }
        if segment.contains(|c: char| !c.is_alphanumeric() && c != '_') {
            return Err(PathError::InvalidSegment(segment.to_string()));
        }
        Ok(Self::Key(segment.to_string()))
    }

    /// Whether this key must be written in quoted bracket form
    fn needs_quotes(name: &str) -> bool {
        name.is_empty()
            || name.bytes().all(|b| b.is_ascii_digit())
            || name.contains(|c: char| !c.is_alphanumeric() && c != '_')
    }
}

/// Split `"name"]rest` into the decoded key and `rest`
fn split_quoted_key(input: &str) -> Option<(String, &str)> {
    let mut escaped = false;
    for (offset, c) in input.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => {
                let key = serde_json::from_str(&input[..=offset]).ok()?;
                return input[offset + 1..].strip_prefix(']').map(|rest| (key, rest));
            }
            _ => {}
        }
    }
    None
}

fn write_quoted_key(f: &mut Formatter<'_>, name: &str) -> fmt::Result {
    let quoted = serde_json::to_string(name).map_err(|_| fmt::Error)?;
    write!(f, "[{quoted}]")
}

impl Display for PathStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key(name) if Self::needs_quotes(name) => write_quoted_key(f, name),
            Self::Key(name) => f.write_str(name),
        }
    }
}

/// Path within a topic group tree
///
/// The root is the group list itself, so a group is addressed by a single
/// index step and an item by `[group].items[item]`.
///
/// # Examples
/// - `[0]` → first group
/// - `[0].items[2]` → third item of the first group
/// - `[1].items[0].settings.color` → a nested settings field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectPath(Vec<PathStep>);

impl ObjectPath {
    /// Create new path from steps
    #[inline]
    #[must_use]
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }

    /// Empty path (the group list)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the group at `index`
    #[inline]
    #[must_use]
    pub fn group(index: usize) -> Self {
        Self(vec![PathStep::Index(index)])
    }

    /// Path of the item at `index` below this path
    #[inline]
    #[must_use]
    pub fn item(&self, index: usize) -> Self {
        self.child(PathStep::key(ITEMS_KEY)).child(PathStep::Index(index))
    }

    /// Path of a named field below this path
    #[inline]
    #[must_use]
    pub fn field(&self, name: impl Into<String>) -> Self {
        self.child(PathStep::Key(name.into()))
    }

    /// Append a step, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, step: PathStep) -> Self {
        let mut new = self.clone();
        new.0.push(step);
        new
    }

    /// Get path steps
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Get number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0
            .split_last()
            .map(|(_, parent)| Self(parent.to_vec()))
    }

    /// Get last step (if not root)
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }

    /// Prefix of the first `len` steps
    #[inline]
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        self.0.len() <= other.0.len() && self.0 == other.0[..self.0.len()]
    }

    /// Index of the group this path points into
    #[inline]
    #[must_use]
    pub fn group_index(&self) -> Option<usize> {
        self.0.first().and_then(PathStep::as_index)
    }

    /// Index of the item this path points into, when it addresses one
    #[must_use]
    pub fn item_index(&self) -> Option<usize> {
        match self.0.get(1..3) {
            Some([PathStep::Key(key), PathStep::Index(index)]) if key == ITEMS_KEY => Some(*index),
            _ => None,
        }
    }

    /// Check if any step addresses a derived-fields record
    #[inline]
    #[must_use]
    pub fn touches_derived_fields(&self) -> bool {
        self.0
            .iter()
            .any(|step| step.as_key() == Some(DERIVED_FIELDS_KEY))
    }

    /// Iterator over steps from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathStep> {
        self.0.iter()
    }
}

impl Display for ObjectPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (position, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Key(name) if position > 0 && !PathStep::needs_quotes(name) => {
                    write!(f, ".{name}")?;
                }
                step => write!(f, "{step}")?,
            }
        }
        Ok(())
    }
}

impl FromStr for ObjectPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut steps = Vec::new();
        let mut rest = s;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('[') {
                if after.starts_with('"') {
                    let (key, remainder) = split_quoted_key(after)
                        .ok_or_else(|| PathError::UnclosedBracket(s.to_string()))?;
                    steps.push(PathStep::Key(key));
                    rest = remainder;
                } else {
                    let close = after
                        .find(']')
                        .ok_or_else(|| PathError::UnclosedBracket(s.to_string()))?;
                    let digits = &after[..close];
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| PathError::InvalidIndex(digits.to_string()))?;
                    steps.push(PathStep::Index(index));
                    rest = &after[close + 1..];
                }
                if !rest.is_empty() && !rest.starts_with(['.', '[']) {
                    return Err(PathError::InvalidSegment(rest.to_string()));
                }
            } else {
                let end = rest.find(['.', '[']).unwrap_or(rest.len());
                steps.push(PathStep::parse_segment(&rest[..end])?);
                rest = &rest[end..];
            }

            if let Some(after) = rest.strip_prefix('.') {
                if after.is_empty() || after.starts_with(['.', '[']) {
                    return Err(PathError::EmptySegment);
                }
                rest = after;
            }
        }

        Ok(Self(steps))
    }
}

impl From<Vec<PathStep>> for ObjectPath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self(steps)
    }
}

impl serde::Serialize for ObjectPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ObjectPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors related to object paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in path
    #[error("path contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric or underscore)")]
    InvalidSegment(String),

    /// Bracket without a matching `]`
    #[error("unclosed bracket in path '{0}'")]
    UnclosedBracket(String),

    /// Bracket contents are not an array index
    #[error("invalid index: '{0}'")]
    InvalidIndex(String),
}
