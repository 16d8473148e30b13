use uuid::Uuid;

use super::*;
use crate::graph::{GraphEdge, GraphNode};

#[allow(clippy::cast_precision_loss)]
fn graph_with(ids: &[Uuid]) -> GraphStore {
    let mut g = GraphStore::new();
    for (i, id) in ids.iter().enumerate() {
        g.upsert_node(GraphNode::new(*id, i as f64 * 10.0, 0.0));
    }
    g
}

#[test]
fn starts_unselected() {
    let sel = SelectionMachine::new();
    assert_eq!(sel.state(), SelectionState::Unselected);
    assert_eq!(sel.current(), None);
}

#[test]
fn select_from_unselected_centers() {
    let a = Uuid::new_v4();
    let g = graph_with(&[a]);
    let mut sel = SelectionMachine::new();
    let change = sel.select(a, &g);
    assert_eq!(change, Some(SelectionChange::Selected { id: a }));
    assert_eq!(change.and_then(|c| c.centers_on()), Some(a));
    assert_eq!(sel.current(), Some(a));
}

#[test]
fn selecting_same_id_twice_toggles_off() {
    let a = Uuid::new_v4();
    let g = graph_with(&[a]);
    let mut sel = SelectionMachine::new();
    sel.select(a, &g);
    let change = sel.select(a, &g).expect("toggle");
    assert_eq!(change, SelectionChange::Deselected { id: a });
    assert_eq!(change.centers_on(), None);
    assert_eq!(sel.state(), SelectionState::Unselected);
}

#[test]
fn selecting_another_id_replaces() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let g = graph_with(&[a, b]);
    let mut sel = SelectionMachine::new();
    sel.select(a, &g);
    let change = sel.select(b, &g).expect("replace");
    assert_eq!(change, SelectionChange::Replaced { previous: a, id: b });
    assert_eq!(change.centers_on(), Some(b));
    assert_eq!(sel.current(), Some(b));
    assert!(!sel.is_selected(&a));
}

#[test]
fn edges_are_selectable() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut g = graph_with(&[a, b]);
    let e = Uuid::new_v4();
    g.upsert_edge(GraphEdge::new(e, a, b));
    let mut sel = SelectionMachine::new();
    assert_eq!(sel.select(e, &g), Some(SelectionChange::Selected { id: e }));
}

#[test]
fn unknown_id_is_rejected() {
    let a = Uuid::new_v4();
    let g = graph_with(&[a]);
    let mut sel = SelectionMachine::new();
    sel.select(a, &g);
    assert_eq!(sel.select(Uuid::new_v4(), &g), None);
    assert_eq!(sel.current(), Some(a));
}

#[test]
fn clear_from_either_state() {
    let a = Uuid::new_v4();
    let g = graph_with(&[a]);
    let mut sel = SelectionMachine::new();
    assert_eq!(sel.clear(), None);
    sel.select(a, &g);
    assert_eq!(sel.clear(), Some(SelectionChange::Deselected { id: a }));
    assert_eq!(sel.current(), None);
}

#[test]
fn removing_selected_entity_clears() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let g = graph_with(&[a, b]);
    let mut sel = SelectionMachine::new();
    sel.select(a, &g);
    assert_eq!(sel.on_entity_removed(&b), None);
    assert_eq!(sel.on_entity_removed(&a), Some(SelectionChange::Deselected { id: a }));
}

#[test]
fn retain_live_drops_stale_selection() {
    let a = Uuid::new_v4();
    let mut g = graph_with(&[a]);
    let mut sel = SelectionMachine::new();
    sel.select(a, &g);
    assert_eq!(sel.retain_live(&g), None);
    g.remove_node(&a);
    assert_eq!(sel.retain_live(&g), Some(SelectionChange::Deselected { id: a }));
}

#[test]
fn toggle_off_works_even_after_entity_vanished() {
    let a = Uuid::new_v4();
    let mut g = graph_with(&[a]);
    let mut sel = SelectionMachine::new();
    sel.select(a, &g);
    g.remove_node(&a);
    assert_eq!(sel.select(a, &g), Some(SelectionChange::Deselected { id: a }));
}

#[test]
fn selection_never_holds_two_ids() {
    let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
    let g = graph_with(&ids);
    let mut sel = SelectionMachine::new();
    for id in ids.iter().chain(ids.iter().rev()) {
        sel.select(*id, &g);
        assert!(matches!(sel.state(), SelectionState::Unselected | SelectionState::Selected(_)));
        let selected = ids.iter().filter(|i| sel.is_selected(i)).count();
        assert!(selected <= 1);
    }
}

#[test]
fn change_serializes_with_kind_tag() {
    let id = Uuid::nil();
    let json = serde_json::to_value(SelectionChange::Deselected { id }).expect("json");
    assert_eq!(json["kind"], "deselected");
    assert_eq!(json["id"], id.to_string());
}
