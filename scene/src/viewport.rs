#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_ZOOM_EPSILON;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point halfway between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// Axis-aligned rectangle, in whichever space the caller is working in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    #[must_use]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Smallest bounds containing every point, or `None` for an empty iterator.
    #[must_use]
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| match acc {
            None => Some(Self::new(p, p)),
            Some(b) => Some(Self::new(
                Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            )),
        })
    }
}

/// Pan/zoom state of the single rendering surface.
///
/// `width` / `height` are device pixels. `pan_x` / `pan_y` are screen-space
/// offsets applied after scaling and after centering: world `(0, 0)` sits at
/// the middle of the surface when pan is zero.
///
/// Fields are public for reading; only the camera controller and the engine
/// (on resize) write them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Viewport {
    /// A viewport of the given size with no pan and unit zoom.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, ..Self::default() }
    }

    /// Screen position of the surface center.
    #[must_use]
    pub fn screen_center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.width * 0.5 + self.pan_x,
            y: world.y * self.zoom + self.height * 0.5 + self.pan_y,
        }
    }

    /// Convert a screen-space point to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.width * 0.5 - self.pan_x) / self.zoom,
            y: (screen.y - self.height * 0.5 - self.pan_y) / self.zoom,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Whether `screen` lies inside the surface grown by `margin` on every side.
    /// Bounds are inclusive so a point exactly on the edge does not flicker.
    #[must_use]
    pub fn contains(&self, screen: Point, margin: f64) -> bool {
        screen.x >= -margin
            && screen.x <= self.width + margin
            && screen.y >= -margin
            && screen.y <= self.height + margin
    }

    /// World-space rectangle currently covered by the surface.
    #[must_use]
    pub fn visible_world_bounds(&self) -> Bounds {
        Bounds::new(
            self.screen_to_world(Point::new(0.0, 0.0)),
            self.screen_to_world(Point::new(self.width, self.height)),
        )
    }

    /// Update the surface size. Pan and zoom are left untouched.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Store a new zoom, holding the `zoom > 0` invariant.
    pub(crate) fn set_zoom(&mut self, zoom: f64) {
        debug_assert!(zoom.is_finite() && zoom > 0.0, "viewport zoom must be positive, got {zoom}");
        self.zoom = sanitize_zoom(zoom);
    }

    pub(crate) fn set_pan(&mut self, pan_x: f64, pan_y: f64) {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
    }
}

/// Clamp a zoom into the positive, finite range.
#[must_use]
pub fn sanitize_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() { zoom.max(MIN_ZOOM_EPSILON) } else { MIN_ZOOM_EPSILON }
}
