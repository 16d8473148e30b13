//! Read-only snapshots for overlays, minimaps and debug panels.
//!
//! Hosts read engine state through [`Diagnostics`] instead of reaching into
//! internals. The snapshot is plain data and serializes to JSON as-is.

use serde::Serialize;

use crate::camera::{CameraState, CameraTarget};
use crate::graph::EntityId;
use crate::guardian::ContextStatus;
use crate::lod::LodStats;
use crate::viewport::Viewport;

/// Point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub viewport: Viewport,
    pub camera: CameraState,
    pub camera_target: Option<CameraTarget>,
    pub selection: Option<EntityId>,
    pub context: ContextStatus,
    pub context_losses: u32,
    /// Level counts from the last sync that ran.
    pub nodes: LodStats,
    pub edges: LodStats,
    pub graph: GraphCounts,
    pub renderables: RenderableCounts,
    /// Creations waiting on the per-frame budget as of the last sync.
    pub deferred: usize,
    pub dangling_edges: usize,
    pub frames: u64,
    pub skipped_frames: u64,
}

/// Size of the logical collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GraphCounts {
    pub nodes: usize,
    pub edges: usize,
}

/// Size of the GPU-side collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RenderableCounts {
    pub nodes: usize,
    pub edges: usize,
    pub visible_nodes: usize,
    pub visible_edges: usize,
    /// Entities permanently culled after an allocation failure.
    pub failed: usize,
}

impl Diagnostics {
    /// Fraction of logical nodes drawn by the last sync.
    #[must_use]
    pub fn visible_node_ratio(&self) -> f64 {
        self.nodes.visible_ratio()
    }
}
