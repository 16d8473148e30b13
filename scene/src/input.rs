//! Input model: mouse buttons, wheel deltas, and the gesture state machine.
//!
//! A thin host adapter turns raw pointer and wheel events into these types.
//! `InputState` tracks the gesture between pointer-down and pointer-up so the
//! engine can tell a click (select) from a drag (pan).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::viewport::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, zooms out).
    pub dy: f64,
}

impl WheelDelta {
    #[must_use]
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Multiplicative zoom factor for this scroll.
    #[must_use]
    pub fn zoom_factor(&self, sensitivity: f64) -> f64 {
        (-self.dy * sensitivity).exp()
    }
}

/// Gesture being tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Button is down but the pointer hasn't moved past the drag threshold.
    /// Releasing here is a click.
    Pressed {
        /// Screen position of the pointer-down.
        origin: Point,
        button: Button,
    },
    /// The user is panning the view by dragging.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
        button: Button,
    },
}

impl InputState {
    /// Whether a pointer button is currently held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Button that started the current gesture.
    #[must_use]
    pub fn button(&self) -> Option<Button> {
        match *self {
            Self::Idle => None,
            Self::Pressed { button, .. } | Self::Panning { button, .. } => Some(button),
        }
    }
}

/// What the engine should do for a pointer-move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMove {
    /// Nothing to do.
    None,
    /// Pan by this screen-space delta.
    Pan { dx: f64, dy: f64 },
}

/// What the engine should do for a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRelease {
    /// Nothing to do (drag finished, or no gesture).
    None,
    /// A primary click at this screen point.
    Click(Point),
}

/// Gesture tracker. Pure: never touches the viewport itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureTracker {
    state: InputState,
    drag_threshold_px: f64,
}

impl GestureTracker {
    #[must_use]
    pub fn new(drag_threshold_px: f64) -> Self {
        Self { state: InputState::Idle, drag_threshold_px }
    }

    #[must_use]
    pub fn state(&self) -> InputState {
        self.state
    }

    /// Start a gesture. A second press while one is active restarts it.
    pub fn down(&mut self, screen: Point, button: Button) {
        self.state = match button {
            // Middle drags always pan, no click phase.
            Button::Middle => InputState::Panning { last_screen: screen, button },
            Button::Primary | Button::Secondary => InputState::Pressed { origin: screen, button },
        };
    }

    pub fn moved(&mut self, screen: Point) -> PointerMove {
        match self.state {
            InputState::Idle => PointerMove::None,
            InputState::Pressed { origin, button } => {
                if origin.distance(screen) <= self.drag_threshold_px {
                    return PointerMove::None;
                }
                self.state = InputState::Panning { last_screen: screen, button };
                PointerMove::Pan { dx: screen.x - origin.x, dy: screen.y - origin.y }
            }
            InputState::Panning { last_screen, button } => {
                self.state = InputState::Panning { last_screen: screen, button };
                PointerMove::Pan { dx: screen.x - last_screen.x, dy: screen.y - last_screen.y }
            }
        }
    }

    pub fn up(&mut self, screen: Point, button: Button) -> PointerRelease {
        if self.state.button() != Some(button) {
            return PointerRelease::None;
        }
        let state = std::mem::take(&mut self.state);
        match state {
            InputState::Pressed { button: Button::Primary, .. } => PointerRelease::Click(screen),
            InputState::Idle | InputState::Pressed { .. } | InputState::Panning { .. } => PointerRelease::None,
        }
    }

    /// Abandon the current gesture.
    pub fn cancel(&mut self) {
        self.state = InputState::Idle;
    }
}
