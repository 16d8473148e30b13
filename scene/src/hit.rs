//! Screen-space node picking for clicks.
//!
//! Picking works in screen pixels so the hit radius feels the same at every
//! zoom. Only nodes the synchronizer would draw this frame are candidates;
//! a culled node can't be clicked. The caller filters out nodes the
//! synchronizer has given up on through `pickable`.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::graph::{GraphStore, NodeId};
use crate::lod::LodClassifier;
use crate::viewport::{Point, Viewport};

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node_id: NodeId,
    /// Screen-space distance from the pointer to the node center.
    pub distance_px: f64,
}

/// Nearest drawn, pickable node within `radius_px` of `screen_pt`, if any.
/// Ties go to the smaller id so the result doesn't depend on map order.
#[must_use]
pub fn hit_test(
    screen_pt: Point,
    graph: &GraphStore,
    classifier: &LodClassifier,
    viewport: &Viewport,
    radius_px: f64,
    pickable: impl Fn(&NodeId) -> bool,
) -> Option<Hit> {
    graph
        .nodes()
        .filter(|node| pickable(&node.id) && classifier.classify(node, viewport).is_drawn())
        .map(|node| Hit { node_id: node.id, distance_px: viewport.world_to_screen(node.position()).distance(screen_pt) })
        .filter(|hit| hit.distance_px <= radius_px)
        .min_by(|a, b| a.distance_px.total_cmp(&b.distance_px).then_with(|| a.node_id.cmp(&b.node_id)))
}
