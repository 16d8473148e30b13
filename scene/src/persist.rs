//! Persisted view state.
//!
//! Hosts save the view between sessions (browser storage, a file). On restore
//! the pan and zoom are re-validated against the current camera limits and a
//! stored selection is always dropped: it may name an entity that no longer
//! exists, and a session always starts unselected.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::graph::EntityId;
use crate::viewport::Viewport;

/// Errors from reading or writing persisted view state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("persisted view is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a host stores between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedView {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    /// Selection at save time. Kept for the host's benefit; never restored.
    #[serde(default)]
    pub selected: Option<EntityId>,
}

/// Which parts of a persisted view were applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestoreOutcome {
    pub pan_applied: bool,
    pub zoom_applied: bool,
    pub selection_discarded: bool,
}

impl PersistedView {
    /// Snapshot the current view.
    #[must_use]
    pub fn capture(viewport: &Viewport, selected: Option<EntityId>) -> Self {
        Self { pan_x: viewport.pan_x, pan_y: viewport.pan_y, zoom: viewport.zoom, selected }
    }

    /// Parse a stored view.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Json`] if `raw` is not a valid document.
    pub fn from_json(raw: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Apply the stored pan and zoom to `viewport` where they are usable.
    ///
    /// Pan is applied only when both components are finite; zoom only when
    /// finite and inside `[min_zoom, max_zoom]`. The stored selection is
    /// discarded.
    pub fn restore(&self, viewport: &mut Viewport, limits: &CameraConfig) -> RestoreOutcome {
        let mut outcome = RestoreOutcome::default();

        if self.zoom.is_finite() && (limits.min_zoom..=limits.max_zoom).contains(&self.zoom) {
            viewport.set_zoom(self.zoom);
            outcome.zoom_applied = true;
        } else {
            tracing::debug!(zoom = self.zoom, "persisted zoom out of range; keeping current");
        }

        if self.pan_x.is_finite() && self.pan_y.is_finite() {
            viewport.set_pan(self.pan_x, self.pan_y);
            outcome.pan_applied = true;
        } else {
            tracing::debug!(pan_x = self.pan_x, pan_y = self.pan_y, "persisted pan not finite; keeping current");
        }

        if let Some(id) = self.selected {
            tracing::debug!(%id, "discarding persisted selection");
            outcome.selection_discarded = true;
        }
        outcome
    }
}
