//! Interaction shell
//!
//! Transient panel state and the routing of user gestures to the gateway.
//! The durable pin flag stays in persisted config; the shell keeps a copy
//! that the host refreshes with [`TopicGroupsShell::sync_pin`] after each
//! config change.

use serde_json::Value as JsonValue;
use tg_model::{ConfigPatch, DerivedTopicItem, ObjectPath};

use crate::error::EditError;
use crate::gateway::{apply_collapse_change, apply_edit};
use crate::options::{PathMode, TopicGroupsOptions};
use crate::panel::RenderPass;
use crate::sink::ConfigSink;

/// Settings-editor field written by [`TopicGroupsShell::on_settings_change`]
const SETTINGS_KEY: &str = "settings";

/// Transient UI state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShellState {
    /// Whether the picker was opened by the user
    pub is_open: bool,
    /// Item the settings editor is open for
    pub settings_path: Option<ObjectPath>,
}

/// What the picker currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelVisibility {
    /// Hidden
    Closed,
    /// Opened by the user, not pinned
    OpenTransient,
    /// Pinned open
    OpenPinned,
}

/// Panel shell
#[derive(Debug, Clone)]
pub struct TopicGroupsShell {
    state: ShellState,
    pin_topics: bool,
    path_mode: PathMode,
}

impl TopicGroupsShell {
    /// Create shell; the picker starts open iff it is pinned
    #[must_use]
    pub fn new(pin_topics: bool, options: &TopicGroupsOptions) -> Self {
        Self {
            state: ShellState {
                is_open: pin_topics,
                settings_path: None,
            },
            pin_topics,
            path_mode: options.path_mode,
        }
    }

    /// Current transient state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// Persisted pin flag as last synced
    #[inline]
    #[must_use]
    pub fn pin_topics(&self) -> bool {
        self.pin_topics
    }

    /// Take the pin flag from freshly loaded config
    #[inline]
    pub fn sync_pin(&mut self, pin_topics: bool) {
        self.pin_topics = pin_topics;
    }

    /// Open or close the picker
    #[inline]
    pub fn toggle_open(&mut self) {
        self.state.is_open = !self.state.is_open;
    }

    /// Ask the store to flip the pin flag
    pub fn toggle_pin(&self, sink: &mut impl ConfigSink) {
        tracing::debug!(pin_topics = !self.pin_topics, "toggling pin");
        sink.save_config(ConfigPatch::pin_topics(!self.pin_topics));
    }

    /// Whether the picker is on screen
    #[inline]
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.state.is_open || self.pin_topics
    }

    /// Visible state of the picker
    #[must_use]
    pub fn visibility(&self) -> PanelVisibility {
        if self.pin_topics {
            PanelVisibility::OpenPinned
        } else if self.state.is_open {
            PanelVisibility::OpenTransient
        } else {
            PanelVisibility::Closed
        }
    }

    /// Open the settings editor, replacing any open one
    pub fn open_settings(&mut self, path: ObjectPath) {
        tracing::debug!(%path, "opening settings editor");
        self.state.settings_path = Some(path);
    }

    /// Close the settings editor
    #[inline]
    pub fn close_settings(&mut self) {
        self.state.settings_path = None;
    }

    /// Panel keys open by default for `pass`
    #[inline]
    #[must_use]
    pub fn active_keys<'p>(&self, pass: &'p RenderPass) -> Vec<&'p str> {
        pass.active_keys()
    }

    /// Item the settings editor is open for, if it exists in `pass`
    #[must_use]
    pub fn settings_target<'p>(&self, pass: &'p RenderPass) -> Option<&'p DerivedTopicItem> {
        pass.item(self.state.settings_path.as_ref()?)
    }

    /// Persist expand state for the given active panel keys
    pub fn on_collapse_change<S: AsRef<str>>(
        &self,
        pass: &RenderPass,
        active_keys: &[S],
        sink: &mut impl ConfigSink,
    ) {
        let groups = apply_collapse_change(pass.groups(), active_keys);
        sink.save_config(ConfigPatch::topic_groups(groups));
    }

    /// Write `value` at `path` and persist the result
    ///
    /// Nothing is saved when the edit fails.
    ///
    /// # Errors
    /// Returns error from [`apply_edit`]
    pub fn on_topic_groups_change(
        &self,
        pass: &RenderPass,
        path: &ObjectPath,
        value: JsonValue,
        sink: &mut impl ConfigSink,
    ) -> Result<(), EditError> {
        let groups = apply_edit(pass.groups(), path, value, self.path_mode)?;
        sink.save_config(ConfigPatch::topic_groups(groups));
        Ok(())
    }

    /// [`Self::on_topic_groups_change`] with a textual path
    ///
    /// # Errors
    /// Returns error if the path does not parse or the edit fails
    pub fn on_topic_groups_change_str(
        &self,
        pass: &RenderPass,
        path: &str,
        value: JsonValue,
        sink: &mut impl ConfigSink,
    ) -> Result<(), EditError> {
        let path: ObjectPath = path.parse()?;
        self.on_topic_groups_change(pass, &path, value, sink)
    }

    /// Replace the settings of the item the editor is open for
    ///
    /// # Errors
    /// - [`EditError::NoSettingsTarget`] if no editor is open
    /// - errors from [`apply_edit`]
    pub fn on_settings_change(
        &self,
        pass: &RenderPass,
        settings: JsonValue,
        sink: &mut impl ConfigSink,
    ) -> Result<(), EditError> {
        let target = self
            .state
            .settings_path
            .as_ref()
            .ok_or(EditError::NoSettingsTarget)?;
        self.on_topic_groups_change(pass, &target.field(SETTINGS_KEY), settings, sink)
    }
}
