//! Scripted camera and context events for the headless driver.
//!
//! Steps are placed at fixed fractions of the run so every run length
//! exercises the same sequence: fit, zoom out, select, drag, wheel, reset.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

/// Frames the context stays lost before the driver restores it.
pub const CONTEXT_OUTAGE_FRAMES: u64 = 30;

/// One scripted action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Animate so the whole graph is in view.
    FitGraph,
    /// Immediate zoom about the screen center.
    ZoomBy(f64),
    /// Select a random node; the camera centers on it.
    SelectRandomNode,
    /// Primary-button drag by a screen-space delta.
    Drag { dx: f64, dy: f64 },
    /// Wheel scroll at the screen center.
    Wheel { dy: f64 },
    /// Animate back to the home view.
    ResetView,
    LoseContext,
    RestoreContext,
}

/// Frame-indexed schedule of steps. Frames are 1-based.
#[derive(Debug, Clone)]
pub struct Script {
    steps: Vec<(u64, Step)>,
}

impl Script {
    #[must_use]
    pub fn new(frames: u64, lose_context_at: Option<u64>) -> Self {
        let at = |percent: u64| (frames * percent / 100).max(1);
        let mut steps = vec![
            (1, Step::FitGraph),
            (at(20), Step::ZoomBy(0.5)),
            (at(35), Step::SelectRandomNode),
            (at(55), Step::Drag { dx: 180.0, dy: -90.0 }),
            (at(70), Step::Wheel { dy: -240.0 }),
            (at(85), Step::ResetView),
        ];
        if let Some(lost) = lose_context_at.filter(|f| (1..=frames).contains(f)) {
            steps.push((lost, Step::LoseContext));
            steps.push((lost + CONTEXT_OUTAGE_FRAMES, Step::RestoreContext));
        }
        // Stable: same-frame steps keep insertion order.
        steps.sort_by_key(|(frame, _)| *frame);
        Self { steps }
    }

    /// Steps scheduled for `frame`, in order.
    pub fn steps_at(&self, frame: u64) -> impl Iterator<Item = Step> + '_ {
        self.steps.iter().filter(move |(f, _)| *f == frame).map(|(_, step)| *step)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}
