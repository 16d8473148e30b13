#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn viewport() -> Viewport {
    Viewport::new(1390.0, 800.0)
}

#[test]
fn capture_copies_view_and_selection() {
    let vp = Viewport { pan_x: 12.0, pan_y: -4.0, zoom: 2.0, ..viewport() };
    let id = Uuid::new_v4();
    let saved = PersistedView::capture(&vp, Some(id));
    assert_eq!(saved, PersistedView { pan_x: 12.0, pan_y: -4.0, zoom: 2.0, selected: Some(id) });
}

#[test]
fn json_survives_storage() {
    let saved = PersistedView { pan_x: 1.5, pan_y: 2.5, zoom: 0.75, selected: None };
    let raw = saved.to_json().expect("serialize");
    assert_eq!(PersistedView::from_json(&raw).expect("parse"), saved);
}

#[test]
fn selected_field_is_optional() {
    let v = PersistedView::from_json(r#"{"pan_x":0,"pan_y":0,"zoom":1}"#).expect("parse");
    assert_eq!(v.selected, None);
}

#[test]
fn garbage_is_a_json_error() {
    assert!(matches!(PersistedView::from_json("not json"), Err(PersistError::Json(_))));
}

#[test]
fn restore_applies_valid_view() {
    let mut vp = viewport();
    let saved = PersistedView { pan_x: -30.0, pan_y: 40.0, zoom: 3.0, selected: None };
    let outcome = saved.restore(&mut vp, &CameraConfig::default());
    assert!(outcome.pan_applied && outcome.zoom_applied);
    assert!(!outcome.selection_discarded);
    assert_eq!((vp.pan_x, vp.pan_y, vp.zoom), (-30.0, 40.0, 3.0));
    assert_eq!((vp.width, vp.height), (1390.0, 800.0));
}

#[test]
fn restore_rejects_out_of_range_zoom() {
    let mut vp = viewport();
    for zoom in [0.0, -1.0, f64::NAN, 1e9] {
        let saved = PersistedView { pan_x: 5.0, pan_y: 5.0, zoom, selected: None };
        let outcome = saved.restore(&mut vp, &CameraConfig::default());
        assert!(!outcome.zoom_applied);
        assert_eq!(vp.zoom, 1.0);
    }
}

#[test]
fn restore_rejects_non_finite_pan() {
    let mut vp = viewport();
    let saved = PersistedView { pan_x: f64::INFINITY, pan_y: 0.0, zoom: 2.0, selected: None };
    let outcome = saved.restore(&mut vp, &CameraConfig::default());
    assert!(!outcome.pan_applied);
    assert!(outcome.zoom_applied);
    assert_eq!(vp.pan_x, 0.0);
}

#[test]
fn restore_always_discards_selection() {
    let mut vp = viewport();
    let saved = PersistedView { pan_x: 0.0, pan_y: 0.0, zoom: 1.0, selected: Some(Uuid::new_v4()) };
    assert!(saved.restore(&mut vp, &CameraConfig::default()).selection_discarded);
}
