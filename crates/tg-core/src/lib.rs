//! Topic Groups Core
//!
//! Builds the derived topic group tree for each render pass and routes edits
//! on that tree back to persisted configuration.
//!
//! # Architecture
//!
//! ```text
//! persisted groups ─┐
//! runtime inputs ───┼─► TopicGroupsPanel::render ─► RenderPass ─► TopicGroupsShell
//! taxonomy ─────────┘                                                 │
//!            ConfigSink ◄── ConfigPatch ◄── apply_edit / apply_collapse_change
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tg_core::{RecordingSink, TopicGroupsOptions, TopicGroupsPanel, TopicGroupsShell};
//!
//! let options = TopicGroupsOptions::default();
//! let mut panel = TopicGroupsPanel::new(&taxonomy, options.clone());
//! let pass = panel.render(&config.topic_groups, &inputs);
//!
//! let shell = TopicGroupsShell::new(config.pin_topics, &options);
//! let mut sink = RecordingSink::new();
//! shell.on_topic_groups_change_str(&pass, "[0].items[1].visible", false.into(), &mut sink)?;
//! ```

#![warn(unreachable_pub)]

mod display_names;
mod error;
mod gateway;
mod namespaces;
mod options;
mod panel;
mod shell;
mod sink;
mod synthesize;

pub use display_names::DisplayNames;
pub use error::EditError;
pub use gateway::{apply_collapse_change, apply_edit};
pub use namespaces::{aggregate_namespaces, NamespacesByTopic};
pub use options::{PathMode, TopicGroupsOptions, DEFAULT_TRANSFORM_TOPIC};
pub use panel::{RenderPass, TaxonomyIndex, TopicGroupsPanel};
pub use shell::{PanelVisibility, ShellState, TopicGroupsShell};
pub use sink::{ConfigSink, RecordingSink};
pub use synthesize::{group_id, item_id, synthesize, SynthesisContext};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
