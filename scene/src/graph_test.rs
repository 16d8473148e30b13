#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn node_at(x: f64, y: f64) -> GraphNode {
    GraphNode::new(Uuid::new_v4(), x, y)
}

fn edge(source: &GraphNode, target: &GraphNode) -> GraphEdge {
    GraphEdge::new(Uuid::new_v4(), source.id, target.id)
}

// =============================================================
// Nodes
// =============================================================

#[test]
fn new_store_is_empty() {
    let g = GraphStore::new();
    assert!(g.is_empty());
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn upsert_node_inserts_then_replaces() {
    let mut g = GraphStore::new();
    let mut n = node_at(1.0, 2.0);
    g.upsert_node(n.clone());
    n.x = 9.0;
    g.upsert_node(n.clone());
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.node(&n.id).map(|n| n.x), Some(9.0));
}

#[test]
fn remove_node_returns_it() {
    let mut g = GraphStore::new();
    let n = node_at(0.0, 0.0);
    g.upsert_node(n.clone());
    assert_eq!(g.remove_node(&n.id).map(|r| r.id), Some(n.id));
    assert!(g.remove_node(&n.id).is_none());
}

#[test]
fn remove_node_leaves_edges_dangling() {
    let mut g = GraphStore::new();
    let a = node_at(0.0, 0.0);
    let b = node_at(1.0, 1.0);
    let e = edge(&a, &b);
    g.load_snapshot(vec![a.clone(), b], vec![e.clone()]);
    g.remove_node(&a.id);
    assert_eq!(g.edge_count(), 1);
    let stored = g.edge(&e.id).expect("edge kept");
    assert!(g.edge_endpoints(stored).is_none());
}

#[test]
fn move_node_updates_position() {
    let mut g = GraphStore::new();
    let n = node_at(0.0, 0.0);
    g.upsert_node(n.clone());
    assert!(g.move_node(&n.id, 5.0, -3.0));
    assert_eq!(g.node(&n.id).map(GraphNode::position), Some(Point::new(5.0, -3.0)));
}

#[test]
fn move_missing_node_returns_false() {
    let mut g = GraphStore::new();
    assert!(!g.move_node(&Uuid::new_v4(), 1.0, 1.0));
}

#[test]
fn apply_positions_skips_unknown_ids() {
    let mut g = GraphStore::new();
    let a = node_at(0.0, 0.0);
    let b = node_at(0.0, 0.0);
    g.load_snapshot(vec![a.clone(), b.clone()], Vec::new());
    let moved = g.apply_positions([
        (a.id, Point::new(1.0, 1.0)),
        (Uuid::new_v4(), Point::new(2.0, 2.0)),
        (b.id, Point::new(3.0, 3.0)),
    ]);
    assert_eq!(moved, 2);
    assert_eq!(g.node(&b.id).map(|n| n.y), Some(3.0));
}

// =============================================================
// Snapshot / edges
// =============================================================

#[test]
fn load_snapshot_replaces_everything() {
    let mut g = GraphStore::new();
    g.upsert_node(node_at(0.0, 0.0));
    let a = node_at(1.0, 1.0);
    let b = node_at(2.0, 2.0);
    let e = edge(&a, &b);
    g.load_snapshot(vec![a, b], vec![e]);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn upsert_and_remove_edge() {
    let mut g = GraphStore::new();
    let a = node_at(1.0, 1.0);
    let b = node_at(2.0, 2.0);
    let e = edge(&a, &b);
    g.upsert_edge(e.clone());
    assert!(g.edge(&e.id).is_some());
    assert!(g.remove_edge(&e.id).is_some());
    assert!(g.edge(&e.id).is_none());
}

#[test]
fn edge_endpoints_resolve_when_both_present() {
    let mut g = GraphStore::new();
    let a = node_at(1.0, 1.0);
    let b = node_at(2.0, 2.0);
    let e = edge(&a, &b);
    g.load_snapshot(vec![a.clone(), b.clone()], vec![e.clone()]);
    let (src, dst) = g.edge_endpoints(&e).expect("endpoints");
    assert_eq!(src.id, a.id);
    assert_eq!(dst.id, b.id);
}

// =============================================================
// Entity queries
// =============================================================

#[test]
fn entity_position_for_node_and_edge() {
    let mut g = GraphStore::new();
    let a = node_at(0.0, 0.0);
    let b = node_at(10.0, -4.0);
    let e = edge(&a, &b);
    g.load_snapshot(vec![a.clone(), b], vec![e.clone()]);
    assert_eq!(g.entity_position(&a.id), Some(Point::new(0.0, 0.0)));
    assert_eq!(g.entity_position(&e.id), Some(Point::new(5.0, -2.0)));
    assert!(g.entity_position(&Uuid::new_v4()).is_none());
}

#[test]
fn contains_entity_covers_nodes_and_edges() {
    let mut g = GraphStore::new();
    let a = node_at(0.0, 0.0);
    let b = node_at(1.0, 0.0);
    let e = edge(&a, &b);
    g.load_snapshot(vec![a.clone(), b], vec![e.clone()]);
    assert!(g.contains_entity(&a.id));
    assert!(g.contains_entity(&e.id));
    assert!(!g.contains_entity(&Uuid::new_v4()));
}

#[test]
fn world_bounds_cover_all_nodes() {
    let mut g = GraphStore::new();
    assert!(g.world_bounds().is_none());
    g.load_snapshot(vec![node_at(-5.0, 2.0), node_at(7.0, -1.0), node_at(0.0, 9.0)], Vec::new());
    let b = g.world_bounds().expect("bounds");
    assert_eq!(b.min, Point::new(-5.0, -1.0));
    assert_eq!(b.max, Point::new(7.0, 9.0));
}

#[test]
fn node_deserializes_without_optional_fields() {
    let id = Uuid::new_v4();
    let raw = format!(r#"{{"id":"{id}","x":1.5,"y":-2.0}}"#);
    let n: GraphNode = serde_json::from_str(&raw).expect("node json");
    assert_eq!(n.id, id);
    assert!(n.label.is_none());
    assert!(n.metadata.is_null());
}
