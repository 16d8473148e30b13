//! Logical graph model: nodes with world positions, edges between them, and
//! the in-memory store that owns both.
//!
//! Data flows into this layer from the simulation (positions) and from the
//! data-loading layer (inserts and removals). The scene synchronizer reads it
//! every frame; nothing in this crate writes positions on its own.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::viewport::{Bounds, Point};

/// Unique identifier for a node.
pub type NodeId = Uuid;

/// Unique identifier for an edge.
pub type EdgeId = Uuid;

/// Identifier of anything selectable. Nodes and edges share one id space.
pub type EntityId = Uuid;

/// A node as delivered by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// World-space x, unbounded.
    pub x: f64,
    /// World-space y, unbounded.
    pub y: f64,
    /// Display label shown at full detail.
    #[serde(default)]
    pub label: Option<String>,
    /// Opaque collaborator data; never interpreted here.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl GraphNode {
    #[must_use]
    pub fn new(id: NodeId, x: f64, y: f64) -> Self {
        Self { id, x, y, label: None, metadata: serde_json::Value::Null }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl GraphEdge {
    #[must_use]
    pub fn new(id: EdgeId, source: NodeId, target: NodeId) -> Self {
        Self { id, source, target, metadata: serde_json::Value::Null }
    }
}

/// In-memory store of the logical node/edge collection, keyed by id.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: HashMap<NodeId, GraphNode>,
    edges: HashMap<EdgeId, GraphEdge>,
}

impl GraphStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection.
    pub fn load_snapshot(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) {
        self.nodes = nodes.into_iter().map(|n| (n.id, n)).collect();
        self.edges = edges.into_iter().map(|e| (e.id, e)).collect();
    }

    /// Insert or replace a node.
    pub fn upsert_node(&mut self, node: GraphNode) {
        self.nodes.insert(node.id, node);
    }

    /// Remove a node, returning it if it was present. Edges that reference it
    /// stay in the collection and become dangling until the data layer
    /// removes them.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<GraphNode> {
        self.nodes.remove(id)
    }

    /// Move a node. Returns false if the node doesn't exist.
    pub fn move_node(&mut self, id: &NodeId, x: f64, y: f64) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.x = x;
        node.y = y;
        true
    }

    /// Apply a batch of simulation positions. Unknown ids are skipped.
    /// Returns how many nodes moved.
    pub fn apply_positions(&mut self, positions: impl IntoIterator<Item = (NodeId, Point)>) -> usize {
        positions
            .into_iter()
            .filter(|(id, p)| self.move_node(id, p.x, p.y))
            .count()
    }

    /// Insert or replace an edge.
    pub fn upsert_edge(&mut self, edge: GraphEdge) {
        self.edges.insert(edge.id, edge);
    }

    /// Remove an edge, returning it if it was present.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<GraphEdge> {
        self.edges.remove(id)
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether `id` names a live node or edge.
    #[must_use]
    pub fn contains_entity(&self, id: &EntityId) -> bool {
        self.nodes.contains_key(id) || self.edges.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the store holds neither nodes nor edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Both endpoints of an edge, or `None` if either is missing.
    #[must_use]
    pub fn edge_endpoints(&self, edge: &GraphEdge) -> Option<(&GraphNode, &GraphNode)> {
        Some((self.nodes.get(&edge.source)?, self.nodes.get(&edge.target)?))
    }

    /// World position used to center on an entity: the node itself, or the
    /// midpoint of an edge whose endpoints both exist.
    #[must_use]
    pub fn entity_position(&self, id: &EntityId) -> Option<Point> {
        if let Some(node) = self.nodes.get(id) {
            return Some(node.position());
        }
        let edge = self.edges.get(id)?;
        let (a, b) = self.edge_endpoints(edge)?;
        Some(a.position().midpoint(b.position()))
    }

    /// World-space bounds of all nodes, or `None` when there are none.
    #[must_use]
    pub fn world_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.nodes.values().map(GraphNode::position))
    }
}
