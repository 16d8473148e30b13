#![allow(clippy::float_cmp)]

use super::*;

fn tracker() -> GestureTracker {
    GestureTracker::new(4.0)
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert_eq!(InputState::default(), InputState::Idle);
    assert!(!InputState::Idle.is_active());
    assert_eq!(InputState::Idle.button(), None);
}

#[test]
fn pressed_reports_button() {
    let s = InputState::Pressed { origin: Point::new(1.0, 2.0), button: Button::Primary };
    assert!(s.is_active());
    assert_eq!(s.button(), Some(Button::Primary));
}

// =============================================================
// WheelDelta
// =============================================================

#[test]
fn wheel_down_zooms_out() {
    let f = WheelDelta::new(0.0, 100.0).zoom_factor(0.0015);
    assert!(f < 1.0);
    assert!(((-0.15_f64).exp() - f).abs() < 1e-12);
}

#[test]
fn wheel_up_zooms_in() {
    assert!(WheelDelta::new(0.0, -100.0).zoom_factor(0.0015) > 1.0);
}

#[test]
fn zero_wheel_is_identity() {
    assert_eq!(WheelDelta::new(5.0, 0.0).zoom_factor(0.0015), 1.0);
}

// =============================================================
// GestureTracker
// =============================================================

#[test]
fn small_wiggle_stays_a_click() {
    let mut t = tracker();
    t.down(Point::new(100.0, 100.0), Button::Primary);
    assert_eq!(t.moved(Point::new(102.0, 101.0)), PointerMove::None);
    assert_eq!(t.up(Point::new(102.0, 101.0), Button::Primary), PointerRelease::Click(Point::new(102.0, 101.0)));
    assert_eq!(t.state(), InputState::Idle);
}

#[test]
fn crossing_threshold_starts_pan_with_full_delta() {
    let mut t = tracker();
    t.down(Point::new(100.0, 100.0), Button::Primary);
    assert_eq!(t.moved(Point::new(110.0, 95.0)), PointerMove::Pan { dx: 10.0, dy: -5.0 });
    assert_eq!(t.moved(Point::new(112.0, 95.0)), PointerMove::Pan { dx: 2.0, dy: 0.0 });
    assert_eq!(t.up(Point::new(112.0, 95.0), Button::Primary), PointerRelease::None);
}

#[test]
fn middle_button_pans_immediately() {
    let mut t = tracker();
    t.down(Point::new(0.0, 0.0), Button::Middle);
    assert_eq!(t.moved(Point::new(1.0, 0.0)), PointerMove::Pan { dx: 1.0, dy: 0.0 });
    assert_eq!(t.up(Point::new(1.0, 0.0), Button::Middle), PointerRelease::None);
}

#[test]
fn secondary_click_is_not_a_selection() {
    let mut t = tracker();
    t.down(Point::new(0.0, 0.0), Button::Secondary);
    assert_eq!(t.up(Point::new(0.0, 0.0), Button::Secondary), PointerRelease::None);
}

#[test]
fn move_without_press_does_nothing() {
    let mut t = tracker();
    assert_eq!(t.moved(Point::new(50.0, 50.0)), PointerMove::None);
}

#[test]
fn release_of_other_button_is_ignored() {
    let mut t = tracker();
    t.down(Point::new(0.0, 0.0), Button::Primary);
    assert_eq!(t.up(Point::new(0.0, 0.0), Button::Middle), PointerRelease::None);
    assert!(t.state().is_active());
}

#[test]
fn cancel_returns_to_idle() {
    let mut t = tracker();
    t.down(Point::new(0.0, 0.0), Button::Primary);
    t.cancel();
    assert_eq!(t.state(), InputState::Idle);
    assert_eq!(t.up(Point::new(0.0, 0.0), Button::Primary), PointerRelease::None);
}
