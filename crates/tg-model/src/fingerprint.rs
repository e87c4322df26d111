//! Content fingerprints of persisted configuration
//!
//! Provides [`ConfigFingerprint`], a 32-byte Blake3 digest over the canonical
//! form of a group list. Render passes record the fingerprint of the config
//! they were built from so an edit can detect that the store moved on.

use std::fmt::{self, Display, Formatter};

use serde_json::Value as JsonValue;

use crate::config::{TopicGroupConfig, TopicItemConfig};

/// Blake3 digest of a persisted group list
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigFingerprint([u8; 32]);

impl ConfigFingerprint {
    /// Create from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Fingerprint a group list
    ///
    /// Object keys inside free-form values are sorted, so documents that differ
    /// only in key order fingerprint the same.
    #[must_use]
    pub fn of_groups(groups: &[TopicGroupConfig]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(groups.len() as u64).to_le_bytes());
        for group in groups {
            feed_str(&mut hasher, &group.display_name);
            hasher.update(&[u8::from(group.visible), u8::from(group.expanded)]);
            hasher.update(&(group.items.len() as u64).to_le_bytes());
            for item in &group.items {
                feed_item(&mut hasher, item);
            }
            feed_str(&mut hasher, &canonical_json(&JsonValue::Object(group.extra.clone())));
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ConfigFingerprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

fn feed_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn feed_opt_str(hasher: &mut blake3::Hasher, value: Option<&str>) {
    match value {
        Some(value) => {
            hasher.update(&[1]);
            feed_str(hasher, value);
        }
        None => {
            hasher.update(&[0]);
        }
    }
}

fn feed_item(hasher: &mut blake3::Hasher, item: &TopicItemConfig) {
    feed_str(hasher, &item.topic_name);
    feed_opt_str(hasher, item.display_name.as_deref());
    hasher.update(&[u8::from(item.visible)]);
    match &item.selected_namespaces {
        Some(namespaces) => {
            hasher.update(&[1]);
            hasher.update(&(namespaces.len() as u64).to_le_bytes());
            for namespace in namespaces {
                feed_str(hasher, namespace);
            }
        }
        None => {
            hasher.update(&[0]);
        }
    }
    let settings = item.settings.as_ref().map(canonical_json);
    feed_opt_str(hasher, settings.as_deref());
    feed_str(hasher, &canonical_json(&JsonValue::Object(item.extra.clone())));
}

/// Generate canonical JSON (sorted keys)
#[must_use]
pub fn canonical_json(value: &JsonValue) -> String {
    match value {
        JsonValue::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();

            let parts: Vec<_> = keys
                .into_iter()
                .filter_map(|key| {
                    map.get(key).map(|val| {
                        format!("{}:{}", JsonValue::String(key.clone()), canonical_json(val))
                    })
                })
                .collect();
            format!("{{{}}}", parts.join(","))
        }
        JsonValue::Array(arr) => {
            let parts: Vec<_> = arr.iter().map(canonical_json).collect();
            format!("[{}]", parts.join(","))
        }
        other => other.to_string(),
    }
}
