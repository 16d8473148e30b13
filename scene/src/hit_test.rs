use uuid::Uuid;

use super::*;
use crate::graph::GraphNode;

fn viewport() -> Viewport {
    Viewport::new(800.0, 600.0)
}

// Node at world origin sits at screen (400, 300) in the default viewport.
fn graph_with(points: &[(f64, f64)]) -> (GraphStore, Vec<Uuid>) {
    let mut g = GraphStore::new();
    let mut ids = Vec::new();
    for &(x, y) in points {
        let id = Uuid::new_v4();
        g.upsert_node(GraphNode::new(id, x, y));
        ids.push(id);
    }
    (g, ids)
}

#[test]
fn hits_node_under_pointer() {
    let (g, ids) = graph_with(&[(0.0, 0.0)]);
    let hit = hit_test(Point::new(405.0, 300.0), &g, &LodClassifier::default(), &viewport(), 12.0, |_| true).expect("hit");
    assert_eq!(hit.node_id, ids[0]);
    assert!((hit.distance_px - 5.0).abs() < 1e-9);
}

#[test]
fn misses_outside_radius() {
    let (g, _) = graph_with(&[(0.0, 0.0)]);
    assert!(hit_test(Point::new(420.0, 300.0), &g, &LodClassifier::default(), &viewport(), 12.0, |_| true).is_none());
}

#[test]
fn picks_nearest_of_overlapping_nodes() {
    let (g, ids) = graph_with(&[(0.0, 0.0), (8.0, 0.0)]);
    let hit = hit_test(Point::new(407.0, 300.0), &g, &LodClassifier::default(), &viewport(), 12.0, |_| true).expect("hit");
    assert_eq!(hit.node_id, ids[1]);
}

#[test]
fn radius_is_in_screen_pixels() {
    let (g, ids) = graph_with(&[(10.0, 0.0)]);
    let vp = Viewport { zoom: 4.0, ..viewport() };
    // World x=10 lands 40px right of center at zoom 4.
    assert!(hit_test(Point::new(410.0, 300.0), &g, &LodClassifier::default(), &vp, 12.0, |_| true).is_none());
    let hit = hit_test(Point::new(440.0, 300.0), &g, &LodClassifier::default(), &vp, 12.0, |_| true).expect("hit");
    assert_eq!(hit.node_id, ids[0]);
}

#[test]
fn culled_nodes_are_not_pickable() {
    let (g, _) = graph_with(&[(5_000.0, 0.0)]);
    let vp = viewport();
    let screen = vp.world_to_screen(Point::new(5_000.0, 0.0));
    assert!(hit_test(screen, &g, &LodClassifier::default(), &vp, 12.0, |_| true).is_none());
}

#[test]
fn empty_graph_hits_nothing() {
    let g = GraphStore::new();
    assert!(hit_test(Point::new(400.0, 300.0), &g, &LodClassifier::default(), &viewport(), 12.0, |_| true).is_none());
}

#[test]
fn unpickable_nodes_are_skipped() {
    let (g, ids) = graph_with(&[(0.0, 0.0), (8.0, 0.0)]);
    // Nearest is ids[1]; excluding it falls back to ids[0].
    let hit = hit_test(Point::new(407.0, 300.0), &g, &LodClassifier::default(), &viewport(), 12.0, |id| *id != ids[1])
        .expect("hit");
    assert_eq!(hit.node_id, ids[0]);
    assert!(hit_test(Point::new(407.0, 300.0), &g, &LodClassifier::default(), &viewport(), 12.0, |_| false).is_none());
}
