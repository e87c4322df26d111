//! Topic Groups Model
//!
//! Data shapes shared by the synthesis and mutation layers.
//!
//! # Core Concepts
//!
//! - [`TopicGroupConfig`]: persisted group, the only shape written to storage
//! - [`DerivedTopicGroup`]: view-model group rebuilt every render pass
//! - [`ObjectPath`]: typed address of a node in the group tree
//! - [`RuntimeInputs`]: live topics, namespaces and transform frames
//! - [`TopicTaxonomy`]: static tree of well-known topics and extensions
//! - [`ConfigFingerprint`]: Blake3 digest of a persisted group list
//!
//! # Example
//!
//! ```rust,ignore
//! use tg_model::{ObjectPath, TopicGroupConfig, TopicItemConfig};
//!
//! let group = TopicGroupConfig::new("Perception")
//!     .with_items(vec![TopicItemConfig::new("/lidar")]);
//! let path: ObjectPath = "[0].items[0].visible".parse()?;
//! ```

#![warn(unreachable_pub)]

mod config;
mod derived;
mod fingerprint;
mod inputs;
mod path;
mod taxonomy;

/// JSON and YAML document loading
pub mod document;

pub use config::{ConfigPatch, PanelConfig, TopicGroup, TopicGroupConfig, TopicItemConfig};
pub use derived::{
    contains_derived_fields, strip_derived_fields, to_configs, DerivedTopicGroup,
    DerivedTopicItem, GroupDerivedFields, ItemDerivedFields, DERIVED_FIELDS_KEY,
};
pub use document::{DocumentFormat, ModelError};
pub use fingerprint::{canonical_json, ConfigFingerprint};
pub use inputs::{ObservedNamespace, RuntimeInputs, Topic};
pub use path::{ObjectPath, PathError, PathStep, ITEMS_KEY};
pub use taxonomy::{TaxonomyNode, TopicTaxonomy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
