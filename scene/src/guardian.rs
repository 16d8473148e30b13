//! GPU context loss and restore policy.
//!
//! Restoration is event-driven. Loss suspends the synchronizer and leaves all
//! logical data, viewport and camera state alone. Restore drops every renderable
//! record (the GPU objects behind them are gone) and resumes, so the next sync
//! rebuilds the scene from scratch.

#[cfg(test)]
#[path = "guardian_test.rs"]
mod guardian_test;

use serde::Serialize;

use crate::sync::SceneSync;

/// Render-context status surfaced to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextStatus {
    #[default]
    Active,
    Lost,
}

/// Watches context lifecycle signals and keeps the synchronizer consistent with them.
#[derive(Debug, Clone, Default)]
pub struct ContextGuardian {
    status: ContextStatus,
    losses: u32,
    restores: u32,
}

impl ContextGuardian {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> ContextStatus {
        self.status
    }

    #[must_use]
    pub fn is_lost(&self) -> bool {
        self.status == ContextStatus::Lost
    }

    /// How many losses have been observed this session.
    #[must_use]
    pub fn loss_count(&self) -> u32 {
        self.losses
    }

    #[must_use]
    pub fn restore_count(&self) -> u32 {
        self.restores
    }

    /// Handle a context-lost signal. Returns the new status if it changed.
    pub fn on_context_lost(&mut self, sync: &mut SceneSync) -> Option<ContextStatus> {
        sync.suspend();
        if self.is_lost() {
            tracing::debug!("context already lost; ignoring repeat signal");
            return None;
        }
        self.status = ContextStatus::Lost;
        self.losses += 1;
        tracing::warn!(losses = self.losses, "render context lost; rendering suspended");
        Some(self.status)
    }

    /// Handle a context-restored signal. Returns the new status if it changed.
    pub fn on_context_restored(&mut self, sync: &mut SceneSync) -> Option<ContextStatus> {
        if !self.is_lost() {
            tracing::debug!("context restored while active; ignoring");
            return None;
        }
        sync.invalidate_all();
        sync.resume();
        self.status = ContextStatus::Active;
        self.restores += 1;
        tracing::info!(restores = self.restores, "render context restored; full resync scheduled");
        Some(self.status)
    }
}
