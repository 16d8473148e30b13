//! Shared numeric defaults for the scene crate.
//!
//! Every value here is only a default; [`crate::config::SceneConfig`] carries
//! the live, tunable copy.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom the viewport will ever hold. Guards the `zoom > 0` invariant.
pub const MIN_ZOOM_EPSILON: f64 = 1e-6;

// ── Level of detail ─────────────────────────────────────────────

/// Zoom at or above which in-view nodes render at full detail.
pub const DEFAULT_FULL_MIN_ZOOM: f64 = 0.8;

/// Zoom at or above which in-view nodes render at medium detail.
pub const DEFAULT_MEDIUM_MIN_ZOOM: f64 = 0.4;

/// Screen-space margin around the viewport inside which nodes still count as visible.
pub const DEFAULT_CULL_MARGIN_PX: f64 = 64.0;

// ── Camera ──────────────────────────────────────────────────────

/// Lower zoom bound for user gestures and camera animation.
pub const DEFAULT_MIN_ZOOM: f64 = 0.05;

/// Upper zoom bound for user gestures and camera animation.
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;

/// Duration of a centering animation in seconds.
pub const DEFAULT_CENTER_DURATION_SECS: f64 = 0.35;

/// Hard cap on accumulated animation time before the camera snaps to target.
pub const DEFAULT_MAX_ANIMATION_SECS: f64 = 2.0;

/// Hard cap on ticks spent in one animation, for hosts that feed `dt = 0`.
pub const DEFAULT_MAX_ANIMATION_TICKS: u32 = 600;

/// Screen distance under which an animation is considered settled.
pub const DEFAULT_SETTLE_EPSILON_PX: f64 = 0.5;

/// Wheel delta to zoom exponent scale: `factor = exp(-dy * sensitivity)`.
pub const DEFAULT_WHEEL_ZOOM_SENSITIVITY: f64 = 0.0015;

// ── Scene synchronizer ──────────────────────────────────────────

/// Maximum renderables created in one sync; the rest are deferred.
pub const DEFAULT_MAX_CREATES_PER_FRAME: usize = 4096;

/// Screen movement below which a position re-upload is skipped.
pub const DEFAULT_POSITION_EPSILON_PX: f64 = 0.01;

// ── Input ───────────────────────────────────────────────────────

/// Pointer travel that turns a press into a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 4.0;

/// Screen-space pick radius around a node center.
pub const DEFAULT_HIT_RADIUS_PX: f64 = 12.0;
