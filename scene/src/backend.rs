//! The GPU-facing seam.
//!
//! The scene synchronizer decides what should exist and how it should look;
//! a [`RenderBackend`] owns the actual GPU objects. Every call on the trait
//! counts as a GPU-facing mutation. [`HeadlessBackend`] is an in-memory
//! implementation used by the driver and the tests; it records mutations and
//! can inject allocation, submit and context failures.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::graph::{EdgeId, NodeId};
use crate::lod::LodLevel;
use crate::viewport::Point;

/// Opaque handle to a GPU-side renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RenderHandle(pub u64);

/// Error reported by a [`RenderBackend`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The GPU could not allocate resources for this renderable.
    #[error("allocation failed for {0}")]
    AllocationFailed(Uuid),
    /// The rendering context is gone; every handle is invalid.
    #[error("render context lost")]
    ContextLost,
    /// A single frame submission failed.
    #[error("frame submit failed: {0}")]
    SubmitFailed(String),
}

/// GPU-facing operations issued by the scene synchronizer.
pub trait RenderBackend {
    /// Allocate a node sprite at the given detail.
    ///
    /// # Errors
    ///
    /// [`BackendError::AllocationFailed`] or [`BackendError::ContextLost`].
    fn create_node(&mut self, id: NodeId, level: LodLevel) -> Result<RenderHandle, BackendError>;
    fn destroy_node(&mut self, handle: RenderHandle);
    fn set_node_visible(&mut self, handle: RenderHandle, visible: bool);
    fn set_node_detail(&mut self, handle: RenderHandle, level: LodLevel);
    fn set_node_position(&mut self, handle: RenderHandle, screen: Point);

    /// Allocate an edge line at the given detail.
    ///
    /// # Errors
    ///
    /// [`BackendError::AllocationFailed`] or [`BackendError::ContextLost`].
    fn create_edge(&mut self, id: EdgeId, level: LodLevel) -> Result<RenderHandle, BackendError>;
    fn destroy_edge(&mut self, handle: RenderHandle);
    fn set_edge_visible(&mut self, handle: RenderHandle, visible: bool);
    fn set_edge_detail(&mut self, handle: RenderHandle, level: LodLevel);
    fn set_edge_endpoints(&mut self, handle: RenderHandle, from: Point, to: Point);

    /// Draw everything visible.
    ///
    /// # Errors
    ///
    /// [`BackendError::SubmitFailed`] for a transient failure or
    /// [`BackendError::ContextLost`] when the context went away.
    fn submit_frame(&mut self) -> Result<(), BackendError>;
}

/// Per-kind mutation counters kept by [`HeadlessBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MutationCounts {
    pub creates: usize,
    pub destroys: usize,
    pub visibility: usize,
    pub detail: usize,
    pub position: usize,
}

impl MutationCounts {
    /// All GPU-facing mutations, excluding frame submits.
    #[must_use]
    pub fn total(&self) -> usize {
        self.creates + self.destroys + self.visibility + self.detail + self.position
    }
}

#[derive(Debug, Clone, Copy)]
struct Sprite {
    visible: bool,
    level: LodLevel,
}

/// In-memory backend with failure injection.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    sprites: HashMap<RenderHandle, Sprite>,
    counts: MutationCounts,
    submits: usize,
    fail_alloc: HashSet<Uuid>,
    fail_submits: usize,
    context_lost: bool,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every allocation for `id` fail.
    pub fn fail_allocation_for(&mut self, id: Uuid) {
        self.fail_alloc.insert(id);
    }

    /// Make the next `n` frame submissions fail transiently.
    pub fn fail_next_submits(&mut self, n: usize) {
        self.fail_submits = n;
    }

    /// Drop the context: every live object is gone and every call reports loss
    /// until [`HeadlessBackend::restore_context`].
    pub fn lose_context(&mut self) {
        self.context_lost = true;
        self.sprites.clear();
    }

    pub fn restore_context(&mut self) {
        self.context_lost = false;
    }

    #[must_use]
    pub fn counts(&self) -> MutationCounts {
        self.counts
    }

    pub fn reset_counts(&mut self) {
        self.counts = MutationCounts::default();
    }

    #[must_use]
    pub fn submits(&self) -> usize {
        self.submits
    }

    /// Number of live GPU objects.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.sprites.len()
    }

    /// Number of live GPU objects currently flagged visible.
    #[must_use]
    pub fn visible_objects(&self) -> usize {
        self.sprites.values().filter(|s| s.visible).count()
    }

    /// Detail level last uploaded for `handle`.
    #[must_use]
    pub fn detail_of(&self, handle: RenderHandle) -> Option<LodLevel> {
        self.sprites.get(&handle).map(|s| s.level)
    }

    fn allocate(&mut self, id: Uuid, level: LodLevel) -> Result<RenderHandle, BackendError> {
        if self.context_lost {
            return Err(BackendError::ContextLost);
        }
        if self.fail_alloc.contains(&id) {
            return Err(BackendError::AllocationFailed(id));
        }
        self.next_handle += 1;
        let handle = RenderHandle(self.next_handle);
        self.sprites.insert(handle, Sprite { visible: false, level });
        self.counts.creates += 1;
        Ok(handle)
    }

    fn destroy(&mut self, handle: RenderHandle) {
        self.sprites.remove(&handle);
        self.counts.destroys += 1;
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.visible = visible;
        }
        self.counts.visibility += 1;
    }

    fn set_detail(&mut self, handle: RenderHandle, level: LodLevel) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.level = level;
        }
        self.counts.detail += 1;
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_node(&mut self, id: NodeId, level: LodLevel) -> Result<RenderHandle, BackendError> {
        self.allocate(id, level)
    }

    fn destroy_node(&mut self, handle: RenderHandle) {
        self.destroy(handle);
    }

    fn set_node_visible(&mut self, handle: RenderHandle, visible: bool) {
        self.set_visible(handle, visible);
    }

    fn set_node_detail(&mut self, handle: RenderHandle, level: LodLevel) {
        self.set_detail(handle, level);
    }

    fn set_node_position(&mut self, _handle: RenderHandle, _screen: Point) {
        self.counts.position += 1;
    }

    fn create_edge(&mut self, id: EdgeId, level: LodLevel) -> Result<RenderHandle, BackendError> {
        self.allocate(id, level)
    }

    fn destroy_edge(&mut self, handle: RenderHandle) {
        self.destroy(handle);
    }

    fn set_edge_visible(&mut self, handle: RenderHandle, visible: bool) {
        self.set_visible(handle, visible);
    }

    fn set_edge_detail(&mut self, handle: RenderHandle, level: LodLevel) {
        self.set_detail(handle, level);
    }

    fn set_edge_endpoints(&mut self, _handle: RenderHandle, _from: Point, _to: Point) {
        self.counts.position += 1;
    }

    fn submit_frame(&mut self) -> Result<(), BackendError> {
        if self.context_lost {
            return Err(BackendError::ContextLost);
        }
        if self.fail_submits > 0 {
            self.fail_submits -= 1;
            return Err(BackendError::SubmitFailed("injected failure".to_owned()));
        }
        self.submits += 1;
        Ok(())
    }
}
