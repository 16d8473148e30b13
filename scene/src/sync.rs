//! Scene synchronizer: keeps one persistent renderable per logical node and
//! edge, and pushes only what changed to the GPU.
//!
//! DESIGN
//! ======
//! Renderables are created when an entity first appears and destroyed when it
//! leaves the logical collection. Culling never destroys anything; it flips the
//! visibility bit. A detail swap is issued only when a drawn entity's level
//! differs from the detail last uploaded, and a position upload only when a
//! drawn entity moved by more than `position_epsilon_px` since its last upload
//! (or just became visible). With no change to the graph or the viewport a
//! second `sync` issues zero backend calls.
//!
//! Allocation failures mark the entity permanently culled for the session so a
//! broken allocation is not retried every frame. A `ContextLost` error from the
//! backend suspends the synchronizer on the spot; the guardian resumes it.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::backend::{BackendError, RenderBackend, RenderHandle};
use crate::config::SyncConfig;
use crate::graph::{EdgeId, GraphEdge, GraphNode, GraphStore, NodeId};
use crate::lod::{LodClassifier, LodLevel, LodStats};
use crate::viewport::{Point, Viewport};

/// GPU-side state of one node, owned by the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableNode {
    /// Back-reference to the logical node.
    pub node_id: NodeId,
    pub handle: RenderHandle,
    /// Level from the latest classification.
    pub level: LodLevel,
    /// Detail asset currently uploaded; never `Culled`.
    pub detail: LodLevel,
    /// Screen position last uploaded.
    pub screen: Point,
    pub visible: bool,
}

/// GPU-side state of one edge, owned by the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderableEdge {
    pub edge_id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub handle: RenderHandle,
    pub level: LodLevel,
    pub detail: LodLevel,
    /// Endpoints last uploaded.
    pub from: Point,
    pub to: Point,
    pub visible: bool,
}

/// What one `sync` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SyncReport {
    /// The synchronizer was suspended; nothing ran.
    pub skipped: bool,
    /// The backend reported context loss mid-sync; the synchronizer is now suspended.
    pub context_lost: bool,
    pub created: usize,
    pub destroyed: usize,
    pub detail_changes: usize,
    pub visibility_changes: usize,
    pub position_updates: usize,
    /// Creations pushed to a later frame by the per-frame budget.
    pub deferred: usize,
    /// Allocations that failed this call and are now permanently culled.
    pub failed: usize,
    pub dangling_edges: usize,
    pub nodes: LodStats,
    pub edges: LodStats,
}

impl SyncReport {
    /// Backend calls issued by this sync.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.created + self.destroyed + self.detail_changes + self.visibility_changes + self.position_updates
    }
}

/// Marker for "the backend lost its context mid-sync".
struct Lost;

/// Where a freshly classified node ended up, for edge classification.
#[derive(Clone, Copy)]
struct NodeFrame {
    level: LodLevel,
    screen: Point,
}

/// Reconciles the logical graph against persistent renderables.
#[derive(Debug, Default)]
pub struct SceneSync {
    config: SyncConfig,
    nodes: HashMap<NodeId, RenderableNode>,
    edges: HashMap<EdgeId, RenderableEdge>,
    failed_nodes: HashSet<NodeId>,
    failed_edges: HashSet<EdgeId>,
    dangling: HashSet<EdgeId>,
    suspended: bool,
}

impl SceneSync {
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Bring renderables in line with `graph` as seen through `viewport`.
    pub fn sync(
        &mut self,
        graph: &GraphStore,
        classifier: &LodClassifier,
        viewport: &Viewport,
        backend: &mut dyn RenderBackend,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        if self.suspended {
            report.skipped = true;
            return report;
        }

        self.remove_stale(graph, backend, &mut report);

        let mut budget = self.config.max_creates_per_frame;
        let outcome = match self.sync_nodes(graph, classifier, viewport, backend, &mut budget, &mut report) {
            Ok(frames) => self.sync_edges(graph, &frames, backend, &mut budget, &mut report),
            Err(lost) => Err(lost),
        };

        if outcome.is_err() {
            tracing::warn!("render context lost during sync; suspending");
            self.suspended = true;
            report.context_lost = true;
        }
        report
    }

    /// Stop issuing backend calls until [`SceneSync::resume`].
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Forget every renderable without touching the backend. Used after the
    /// GPU context was replaced: the old handles are already gone, so the next
    /// sync treats every entity as new.
    pub fn invalidate_all(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    #[must_use]
    pub fn renderable_node(&self, id: &NodeId) -> Option<&RenderableNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn renderable_edge(&self, id: &EdgeId) -> Option<&RenderableEdge> {
        self.edges.get(id)
    }

    #[must_use]
    pub fn node_renderables(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_renderables(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn visible_node_count(&self) -> usize {
        self.nodes.values().filter(|r| r.visible).count()
    }

    #[must_use]
    pub fn visible_edge_count(&self) -> usize {
        self.edges.values().filter(|r| r.visible).count()
    }

    /// Entities marked permanently culled after an allocation failure.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed_nodes.len() + self.failed_edges.len()
    }

    #[must_use]
    pub fn is_failed(&self, id: &uuid::Uuid) -> bool {
        self.failed_nodes.contains(id) || self.failed_edges.contains(id)
    }

    /// Edges currently excluded because an endpoint is missing.
    #[must_use]
    pub fn dangling_count(&self) -> usize {
        self.dangling.len()
    }

    // =========================================================================
    // REMOVAL
    // =========================================================================

    fn remove_stale(&mut self, graph: &GraphStore, backend: &mut dyn RenderBackend, report: &mut SyncReport) {
        let stale_nodes: Vec<NodeId> = self.nodes.keys().filter(|id| !graph.contains_node(id)).copied().collect();
        for id in stale_nodes {
            if let Some(r) = self.nodes.remove(&id) {
                backend.destroy_node(r.handle);
                report.destroyed += 1;
            }
        }

        // Edges go when they leave the collection, when an endpoint left, or
        // when they were re-pointed at different nodes.
        let stale_edges: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|r| {
                graph.edge(&r.edge_id).is_none_or(|e| {
                    e.source != r.source
                        || e.target != r.target
                        || !graph.contains_node(&e.source)
                        || !graph.contains_node(&e.target)
                })
            })
            .map(|r| r.edge_id)
            .collect();
        for id in stale_edges {
            if let Some(r) = self.edges.remove(&id) {
                backend.destroy_edge(r.handle);
                report.destroyed += 1;
            }
        }

        self.failed_nodes.retain(|id| graph.contains_node(id));
        self.failed_edges.retain(|id| graph.edge(id).is_some());
        self.dangling.retain(|id| graph.edge(id).is_some());
    }

    // =========================================================================
    // NODES
    // =========================================================================

    fn sync_nodes(
        &mut self,
        graph: &GraphStore,
        classifier: &LodClassifier,
        viewport: &Viewport,
        backend: &mut dyn RenderBackend,
        budget: &mut usize,
        report: &mut SyncReport,
    ) -> Result<HashMap<NodeId, NodeFrame>, Lost> {
        let mut frames = HashMap::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let screen = viewport.world_to_screen(node.position());
            let level = if self.failed_nodes.contains(&node.id) {
                LodLevel::Culled
            } else {
                let level = classifier.classify(node, viewport);
                self.place_node(node, level, screen, backend, budget, report)?
            };
            report.nodes.record(level);
            frames.insert(node.id, NodeFrame { level, screen });
        }
        Ok(frames)
    }

    /// Update or create the renderable for one node. Returns the level the
    /// node actually ends up at (`Culled` if its allocation just failed or
    /// was deferred).
    fn place_node(
        &mut self,
        node: &GraphNode,
        level: LodLevel,
        screen: Point,
        backend: &mut dyn RenderBackend,
        budget: &mut usize,
        report: &mut SyncReport,
    ) -> Result<LodLevel, Lost> {
        let epsilon = self.config.position_epsilon_px;
        if let Some(r) = self.nodes.get_mut(&node.id) {
            let visible = level.is_drawn();
            if visible && r.detail != level {
                backend.set_node_detail(r.handle, level);
                r.detail = level;
                report.detail_changes += 1;
            }
            let became_visible = visible && !r.visible;
            if visible != r.visible {
                backend.set_node_visible(r.handle, visible);
                r.visible = visible;
                report.visibility_changes += 1;
            }
            if visible && (became_visible || r.screen.distance(screen) > epsilon) {
                backend.set_node_position(r.handle, screen);
                r.screen = screen;
                report.position_updates += 1;
            }
            r.level = level;
            return Ok(level);
        }

        // Nothing is drawn until the renderable exists.
        if *budget == 0 {
            report.deferred += 1;
            return Ok(LodLevel::Culled);
        }
        *budget -= 1;

        let detail = initial_detail(level);
        match backend.create_node(node.id, detail) {
            Ok(handle) => {
                report.created += 1;
                let visible = level.is_drawn();
                if visible {
                    backend.set_node_visible(handle, true);
                    backend.set_node_position(handle, screen);
                    report.visibility_changes += 1;
                    report.position_updates += 1;
                }
                self.nodes.insert(
                    node.id,
                    RenderableNode { node_id: node.id, handle, level, detail, screen, visible },
                );
                Ok(level)
            }
            Err(BackendError::ContextLost) => Err(Lost),
            Err(e) => {
                tracing::warn!(node_id = %node.id, error = %e, "node allocation failed; culled for the rest of the session");
                self.failed_nodes.insert(node.id);
                report.failed += 1;
                Ok(LodLevel::Culled)
            }
        }
    }

    // =========================================================================
    // EDGES
    // =========================================================================

    fn sync_edges(
        &mut self,
        graph: &GraphStore,
        frames: &HashMap<NodeId, NodeFrame>,
        backend: &mut dyn RenderBackend,
        budget: &mut usize,
        report: &mut SyncReport,
    ) -> Result<(), Lost> {
        for edge in graph.edges() {
            let (Some(src), Some(dst)) = (frames.get(&edge.source), frames.get(&edge.target)) else {
                report.dangling_edges += 1;
                report.edges.record(LodLevel::Culled);
                if self.dangling.insert(edge.id) {
                    tracing::warn!(
                        edge_id = %edge.id,
                        source = %edge.source,
                        target = %edge.target,
                        "edge references a missing node; excluded from rendering"
                    );
                }
                continue;
            };
            self.dangling.remove(&edge.id);

            let level = if self.failed_edges.contains(&edge.id) {
                LodLevel::Culled
            } else {
                let level = LodClassifier::classify_edge(src.level, dst.level);
                self.place_edge(edge, level, src.screen, dst.screen, backend, budget, report)?
            };
            report.edges.record(level);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn place_edge(
        &mut self,
        edge: &GraphEdge,
        level: LodLevel,
        from: Point,
        to: Point,
        backend: &mut dyn RenderBackend,
        budget: &mut usize,
        report: &mut SyncReport,
    ) -> Result<LodLevel, Lost> {
        let epsilon = self.config.position_epsilon_px;
        if let Some(r) = self.edges.get_mut(&edge.id) {
            let visible = level.is_drawn();
            if visible && r.detail != level {
                backend.set_edge_detail(r.handle, level);
                r.detail = level;
                report.detail_changes += 1;
            }
            let became_visible = visible && !r.visible;
            if visible != r.visible {
                backend.set_edge_visible(r.handle, visible);
                r.visible = visible;
                report.visibility_changes += 1;
            }
            if visible && (became_visible || r.from.distance(from) > epsilon || r.to.distance(to) > epsilon) {
                backend.set_edge_endpoints(r.handle, from, to);
                r.from = from;
                r.to = to;
                report.position_updates += 1;
            }
            r.level = level;
            return Ok(level);
        }

        if *budget == 0 {
            report.deferred += 1;
            return Ok(LodLevel::Culled);
        }
        *budget -= 1;

        let detail = initial_detail(level);
        match backend.create_edge(edge.id, detail) {
            Ok(handle) => {
                report.created += 1;
                let visible = level.is_drawn();
                if visible {
                    backend.set_edge_visible(handle, true);
                    backend.set_edge_endpoints(handle, from, to);
                    report.visibility_changes += 1;
                    report.position_updates += 1;
                }
                self.edges.insert(
                    edge.id,
                    RenderableEdge {
                        edge_id: edge.id,
                        source: edge.source,
                        target: edge.target,
                        handle,
                        level,
                        detail,
                        from,
                        to,
                        visible,
                    },
                );
                Ok(level)
            }
            Err(BackendError::ContextLost) => Err(Lost),
            Err(e) => {
                tracing::warn!(edge_id = %edge.id, error = %e, "edge allocation failed; culled for the rest of the session");
                self.failed_edges.insert(edge.id);
                report.failed += 1;
                Ok(LodLevel::Culled)
            }
        }
    }
}

/// Culled entities start with the cheapest asset.
fn initial_detail(level: LodLevel) -> LodLevel {
    if level.is_drawn() { level } else { LodLevel::Low }
}
