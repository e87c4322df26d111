//! Persistence seam

use tg_model::{ConfigPatch, PanelConfig};

/// Receives configuration patches from the panel
///
/// Implementations decide where config lives; the panel only ever hands over
/// the fields that changed.
pub trait ConfigSink {
    /// Persist a partial config
    fn save_config(&mut self, patch: ConfigPatch);
}

impl ConfigSink for PanelConfig {
    fn save_config(&mut self, patch: ConfigPatch) {
        patch.apply_to(self);
    }
}

impl<S: ConfigSink + ?Sized> ConfigSink for &mut S {
    fn save_config(&mut self, patch: ConfigPatch) {
        (**self).save_config(patch);
    }
}

/// Sink that keeps every patch it receives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    patches: Vec<ConfigPatch>,
}

impl RecordingSink {
    /// Create empty sink
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patches in arrival order
    #[inline]
    #[must_use]
    pub fn patches(&self) -> &[ConfigPatch] {
        &self.patches
    }

    /// Most recent patch
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&ConfigPatch> {
        self.patches.last()
    }

    /// Number of patches received
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Check if nothing was saved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Drain recorded patches
    pub fn take(&mut self) -> Vec<ConfigPatch> {
        std::mem::take(&mut self.patches)
    }

    /// Merge every recorded patch into `config`, in order
    pub fn apply_all(&self, config: &mut PanelConfig) {
        for patch in &self.patches {
            patch.clone().apply_to(config);
        }
    }
}

impl ConfigSink for RecordingSink {
    fn save_config(&mut self, patch: ConfigPatch) {
        tracing::trace!(
            groups = patch.topic_groups.as_ref().map(Vec::len),
            pin_topics = patch.pin_topics,
            "recorded config patch"
        );
        self.patches.push(patch);
    }
}
