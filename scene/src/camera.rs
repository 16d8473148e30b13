//! Camera controller: direct pan/zoom plus eased centering.
//!
//! `pan` and `zoom_by` write the viewport immediately so drags and wheel
//! zooms track the pointer. `center_on`, `fit_bounds` and `reset` set a
//! target and animate toward it from `tick`. Any later `pan`, `zoom_by` or
//! new target cancels the running animation; the last writer wins.
//!
//! # State machine
//! `Idle -> Animating -> Idle`. An animation ends when its eased progress
//! reaches 1, when the live values are within the settle epsilon of the
//! target, or when a safety bound (time or tick count) is hit.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::Serialize;

use crate::config::CameraConfig;
use crate::viewport::{Bounds, Point, Viewport};

/// Desired pan/zoom for an animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTarget {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

/// Whether the camera is animating toward a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraState {
    Idle,
    Animating,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: CameraTarget,
    to: CameraTarget,
    elapsed: f64,
    ticks: u32,
}

/// Drives every change to the viewport's pan and zoom.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
    animation: Option<Animation>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraController {
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        Self { config, animation: None }
    }

    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> CameraState {
        if self.animation.is_some() { CameraState::Animating } else { CameraState::Idle }
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Target of the running animation, if any.
    #[must_use]
    pub fn target(&self) -> Option<CameraTarget> {
        self.animation.map(|a| a.to)
    }

    /// Abandon the running animation where it is.
    pub fn cancel(&mut self) {
        self.animation = None;
    }

    /// Clamp a zoom into the configured range.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.config.min_zoom, self.config.max_zoom)
    }

    // =========================================================================
    // DIRECT MANIPULATION
    // =========================================================================

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, viewport: &mut Viewport, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            tracing::warn!(dx, dy, "ignoring non-finite pan delta");
            return;
        }
        self.cancel();
        viewport.set_pan(viewport.pan_x + dx, viewport.pan_y + dy);
    }

    /// Multiply zoom by `factor`, keeping the world point under `about` fixed on screen.
    pub fn zoom_by(&mut self, viewport: &mut Viewport, factor: f64, about: Point) {
        if !(factor.is_finite() && factor > 0.0) {
            tracing::warn!(factor, "ignoring non-positive zoom factor");
            return;
        }
        self.cancel();
        let anchor = viewport.screen_to_world(about);
        let zoom = self.clamp_zoom(viewport.zoom * factor);
        viewport.set_zoom(zoom);
        // Solve world_to_screen(anchor) == about for the pan.
        let center = viewport.screen_center();
        viewport.set_pan(about.x - anchor.x * zoom - center.x, about.y - anchor.y * zoom - center.y);
    }

    // =========================================================================
    // ANIMATED MOVES
    // =========================================================================

    /// Animate so `world` lands on the screen center, optionally changing zoom.
    pub fn center_on(&mut self, viewport: &Viewport, world: Point, target_zoom: Option<f64>) {
        if !(world.x.is_finite() && world.y.is_finite()) {
            tracing::warn!(x = world.x, y = world.y, "ignoring non-finite center target");
            return;
        }
        let zoom = self.clamp_zoom(target_zoom.filter(|z| z.is_finite() && *z > 0.0).unwrap_or(viewport.zoom));
        // world * zoom + size/2 + pan == size/2  =>  pan = -world * zoom
        self.animate_to(viewport, CameraTarget { pan_x: -world.x * zoom, pan_y: -world.y * zoom, zoom });
    }

    /// Animate to show `bounds` (world space) inside the viewport minus `padding_px`.
    /// Degenerate bounds only re-center.
    pub fn fit_bounds(&mut self, viewport: &Viewport, bounds: Bounds, padding_px: f64) {
        let avail_w = (viewport.width - 2.0 * padding_px).max(1.0);
        let avail_h = (viewport.height - 2.0 * padding_px).max(1.0);
        let zoom = if bounds.width() > f64::EPSILON && bounds.height() > f64::EPSILON {
            Some((avail_w / bounds.width()).min(avail_h / bounds.height()))
        } else if bounds.width() > f64::EPSILON {
            Some(avail_w / bounds.width())
        } else if bounds.height() > f64::EPSILON {
            Some(avail_h / bounds.height())
        } else {
            None
        };
        self.center_on(viewport, bounds.center(), zoom);
    }

    /// Animate back to the home view: origin centered at unit zoom.
    pub fn reset(&mut self, viewport: &Viewport) {
        let zoom = self.clamp_zoom(1.0);
        self.animate_to(viewport, CameraTarget { pan_x: 0.0, pan_y: 0.0, zoom });
    }

    fn animate_to(&mut self, viewport: &Viewport, to: CameraTarget) {
        let from = CameraTarget { pan_x: viewport.pan_x, pan_y: viewport.pan_y, zoom: viewport.zoom };
        self.animation = Some(Animation { from, to, elapsed: 0.0, ticks: 0 });
    }

    /// Advance the running animation by `dt` seconds. Returns whether it is
    /// still running afterwards.
    pub fn tick(&mut self, viewport: &mut Viewport, dt: f64) -> bool {
        let Some(mut anim) = self.animation else {
            return false;
        };
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        anim.elapsed += dt;
        anim.ticks += 1;

        let t = (anim.elapsed / self.config.center_duration_secs).min(1.0);
        let eased = ease_out_cubic(t);
        let zoom = lerp(anim.from.zoom, anim.to.zoom, eased);
        viewport.set_zoom(zoom);
        viewport.set_pan(lerp(anim.from.pan_x, anim.to.pan_x, eased), lerp(anim.from.pan_y, anim.to.pan_y, eased));

        let timed_out = anim.elapsed >= self.config.max_animation_secs || anim.ticks >= self.config.max_animation_ticks;
        if t >= 1.0 || self.settled(viewport, &anim.to) || timed_out {
            if timed_out && t < 1.0 {
                tracing::debug!(elapsed = anim.elapsed, ticks = anim.ticks, "camera animation hit safety bound; snapping");
            }
            viewport.set_zoom(anim.to.zoom);
            viewport.set_pan(anim.to.pan_x, anim.to.pan_y);
            self.animation = None;
            return false;
        }

        self.animation = Some(anim);
        true
    }

    /// Live values are close enough to the target that the rest is invisible.
    fn settled(&self, viewport: &Viewport, to: &CameraTarget) -> bool {
        let eps = self.config.settle_epsilon_px;
        (viewport.pan_x - to.pan_x).abs() <= eps
            && (viewport.pan_y - to.pan_y).abs() <= eps
            && (viewport.zoom - to.zoom).abs() <= 1e-4 * to.zoom
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}
