//! Top-level engine wiring every stage of a frame.
//!
//! DESIGN
//! ======
//! `EngineCore` owns the logical graph, the viewport, and every controller.
//! Hosts call the data and input methods as events arrive, then call
//! [`EngineCore::frame`] once per animation callback. Within a frame the order
//! is fixed: camera tick, then classification and sync against the final
//! viewport, then submit. Nothing here returns an error to the host; backend
//! failures become state (culled entities, skipped frames, context status)
//! visible through [`FrameReport`] and [`EngineCore::diagnostics`].

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;

use crate::backend::{BackendError, RenderBackend};
use crate::camera::{CameraController, CameraState};
use crate::config::SceneConfig;
use crate::diagnostics::{Diagnostics, GraphCounts, RenderableCounts};
use crate::graph::{EdgeId, EntityId, GraphEdge, GraphNode, GraphStore, NodeId};
use crate::guardian::{ContextGuardian, ContextStatus};
use crate::hit::hit_test;
use crate::input::{Button, GestureTracker, PointerMove, PointerRelease, WheelDelta};
use crate::lod::LodClassifier;
use crate::persist::{PersistedView, RestoreOutcome};
use crate::selection::{SelectionChange, SelectionMachine};
use crate::sync::{SceneSync, SyncReport};
use crate::viewport::{Point, Viewport};

/// Notifications for collaborator UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The selected entity changed (or was cleared).
    SelectionChanged { selected: Option<EntityId> },
    /// The render context was lost or restored.
    ContextStatusChanged { status: ContextStatus },
}

/// What one call to [`EngineCore::frame`] did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    /// 1-based frame counter.
    pub frame: u64,
    /// The camera is still animating after this frame's tick.
    pub camera_animating: bool,
    pub sync: SyncReport,
    /// The backend accepted the frame.
    pub submitted: bool,
    /// Events raised since the previous frame, oldest first.
    pub events: Vec<Event>,
}

/// Core engine state; everything except the GPU backend, which is passed
/// into [`EngineCore::frame`].
#[derive(Debug)]
pub struct EngineCore {
    config: SceneConfig,
    graph: GraphStore,
    viewport: Viewport,
    classifier: LodClassifier,
    camera: CameraController,
    selection: SelectionMachine,
    sync: SceneSync,
    guardian: ContextGuardian,
    gesture: GestureTracker,
    last_sync: SyncReport,
    frames: u64,
    skipped_frames: u64,
    events: Vec<Event>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            graph: GraphStore::new(),
            viewport: Viewport::default(),
            classifier: LodClassifier::new(config.lod),
            camera: CameraController::new(config.camera),
            selection: SelectionMachine::new(),
            sync: SceneSync::new(config.sync),
            guardian: ContextGuardian::new(),
            gesture: GestureTracker::new(config.input.drag_threshold_px),
            last_sync: SyncReport::default(),
            frames: 0,
            skipped_frames: 0,
            events: Vec::new(),
        }
    }

    /// Engine with a surface of the given size.
    #[must_use]
    pub fn with_size(config: SceneConfig, width: f64, height: f64) -> Self {
        let mut engine = Self::new(config);
        engine.resize(width, height);
        engine
    }

    // --- Data inputs ---

    /// Replace the logical collection. A selection whose entity is gone is cleared.
    pub fn load_snapshot(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
        self.graph.load_snapshot(nodes, edges);
        let change = self.selection.retain_live(&self.graph);
        self.record_selection(change);
    }

    pub fn upsert_node(&mut self, node: GraphNode) {
        self.graph.upsert_node(node);
    }

    pub fn remove_node(&mut self, id: &NodeId) {
        if self.graph.remove_node(id).is_some() {
            let change = self.selection.on_entity_removed(id);
            self.record_selection(change);
        }
    }

    /// Move one node. Returns false for an unknown id.
    pub fn move_node(&mut self, id: &NodeId, x: f64, y: f64) -> bool {
        self.graph.move_node(id, x, y)
    }

    /// Apply a batch of simulation positions; returns how many nodes moved.
    pub fn apply_positions(&mut self, positions: impl IntoIterator<Item = (NodeId, Point)>) -> usize {
        self.graph.apply_positions(positions)
    }

    pub fn upsert_edge(&mut self, edge: GraphEdge) {
        self.graph.upsert_edge(edge);
    }

    pub fn remove_edge(&mut self, id: &EdgeId) {
        if self.graph.remove_edge(id).is_some() {
            let change = self.selection.on_entity_removed(id);
            self.record_selection(change);
        }
    }

    // --- Viewport / camera ---

    /// Surface size changed. Pan and zoom are untouched.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.camera.pan(&mut self.viewport, dx, dy);
    }

    pub fn zoom_by(&mut self, factor: f64, about: Point) {
        self.camera.zoom_by(&mut self.viewport, factor, about);
    }

    pub fn center_on(&mut self, world: Point, target_zoom: Option<f64>) {
        self.camera.center_on(&self.viewport, world, target_zoom);
    }

    /// Animate so the whole graph fits, leaving `padding_px` on each side.
    /// Does nothing for an empty graph.
    pub fn fit_to_graph(&mut self, padding_px: f64) {
        if let Some(bounds) = self.graph.world_bounds() {
            self.camera.fit_bounds(&self.viewport, bounds, padding_px);
        }
    }

    pub fn reset_view(&mut self) {
        self.camera.reset(&self.viewport);
    }

    // --- Selection ---

    /// Select or toggle `id`, centering the camera on a new selection.
    pub fn select(&mut self, id: EntityId) -> Option<SelectionChange> {
        let change = self.selection.select(id, &self.graph);
        if let Some(target) = change.and_then(|c| c.centers_on())
            && let Some(world) = self.graph.entity_position(&target)
        {
            self.camera.center_on(&self.viewport, world, None);
        }
        self.record_selection(change);
        change
    }

    pub fn clear_selection(&mut self) -> Option<SelectionChange> {
        let change = self.selection.clear();
        self.record_selection(change);
        change
    }

    fn record_selection(&mut self, change: Option<SelectionChange>) {
        if let Some(change) = change {
            self.events.push(Event::SelectionChanged { selected: change.centers_on() });
        }
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) {
        self.gesture.down(screen_pt, button);
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) {
        match self.gesture.moved(screen_pt) {
            PointerMove::Pan { dx, dy } => self.pan(dx, dy),
            PointerMove::None => {}
        }
    }

    /// Finish a gesture. A primary click selects the nearest node under the
    /// pointer, or clears the selection over empty space.
    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Option<SelectionChange> {
        match self.gesture.up(screen_pt, button) {
            PointerRelease::Click(at) => {
                let sync = &self.sync;
                let hit = hit_test(at, &self.graph, &self.classifier, &self.viewport, self.config.input.hit_radius_px, |id| {
                    !sync.is_failed(id)
                });
                match hit {
                    Some(hit) => self.select(hit.node_id),
                    None => self.clear_selection(),
                }
            }
            PointerRelease::None => None,
        }
    }

    /// Wheel zoom about the pointer.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) {
        let factor = delta.zoom_factor(self.config.camera.wheel_zoom_sensitivity);
        self.zoom_by(factor, screen_pt);
    }

    // --- Render context ---

    pub fn on_context_lost(&mut self) {
        if let Some(status) = self.guardian.on_context_lost(&mut self.sync) {
            self.events.push(Event::ContextStatusChanged { status });
        }
    }

    pub fn on_context_restored(&mut self) {
        if let Some(status) = self.guardian.on_context_restored(&mut self.sync) {
            self.events.push(Event::ContextStatusChanged { status });
        }
    }

    // --- Persistence ---

    /// Current view for the host to store.
    #[must_use]
    pub fn persisted_view(&self) -> PersistedView {
        PersistedView::capture(&self.viewport, self.selection.current())
    }

    /// Apply a stored view. The stored selection is never restored.
    pub fn restore_view(&mut self, saved: &PersistedView) -> RestoreOutcome {
        self.camera.cancel();
        saved.restore(&mut self.viewport, &self.config.camera)
    }

    // --- Frame ---

    /// Run one frame: camera tick, sync, submit.
    pub fn frame(&mut self, dt: f64, backend: &mut dyn RenderBackend) -> FrameReport {
        self.frames += 1;
        let camera_animating = self.camera.tick(&mut self.viewport, dt);

        let sync = self.sync.sync(&self.graph, &self.classifier, &self.viewport, backend);
        // A sync cut short by context loss has partial stats; keep the last full one.
        if !sync.skipped && !sync.context_lost {
            self.last_sync = sync;
        }

        let mut submitted = false;
        if sync.context_lost {
            self.on_context_lost();
        } else if !sync.skipped {
            match backend.submit_frame() {
                Ok(()) => submitted = true,
                Err(BackendError::ContextLost) => self.on_context_lost(),
                Err(e) => {
                    tracing::warn!(frame = self.frames, error = %e, "frame submit failed; skipping frame");
                }
            }
        }
        if !submitted {
            self.skipped_frames += 1;
        }

        FrameReport { frame: self.frames, camera_animating, sync, submitted, events: std::mem::take(&mut self.events) }
    }

    /// Drain pending events without running a frame.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    #[must_use]
    pub fn classifier(&self) -> &LodClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn scene(&self) -> &SceneSync {
        &self.sync
    }

    #[must_use]
    pub fn selection(&self) -> Option<EntityId> {
        self.selection.current()
    }

    #[must_use]
    pub fn camera_state(&self) -> CameraState {
        self.camera.state()
    }

    #[must_use]
    pub fn context_status(&self) -> ContextStatus {
        self.guardian.status()
    }

    /// Report of the last sync that actually ran.
    #[must_use]
    pub fn last_sync(&self) -> &SyncReport {
        &self.last_sync
    }

    #[must_use]
    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            viewport: self.viewport,
            camera: self.camera.state(),
            camera_target: self.camera.target(),
            selection: self.selection.current(),
            context: self.guardian.status(),
            context_losses: self.guardian.loss_count(),
            nodes: self.last_sync.nodes,
            edges: self.last_sync.edges,
            graph: GraphCounts { nodes: self.graph.node_count(), edges: self.graph.edge_count() },
            renderables: RenderableCounts {
                nodes: self.sync.node_renderables(),
                edges: self.sync.edge_renderables(),
                visible_nodes: self.sync.visible_node_count(),
                visible_edges: self.sync.visible_edge_count(),
                failed: self.sync.failed_count(),
            },
            deferred: self.last_sync.deferred,
            dangling_edges: self.last_sync.dangling_edges,
            frames: self.frames,
            skipped_frames: self.skipped_frames,
        }
    }
}
