//! Level-of-detail classification.
//!
//! Classification is a pure function of `(node, viewport)` and the classifier's
//! thresholds. There is no per-frame state, so calling it twice in a frame
//! gives the same answer and callers are free to memoize or parallelize.

#[cfg(test)]
#[path = "lod_test.rs"]
mod lod_test;

use serde::{Deserialize, Serialize};

use crate::config::LodConfig;
use crate::graph::GraphNode;
use crate::viewport::{Point, Viewport};

/// Detail level, ordered from most to least detailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LodLevel {
    /// Labeled sprite with icon.
    Full = 0,
    /// Sprite without label.
    Medium = 1,
    /// Simplified dot.
    Low = 2,
    /// Not drawn this frame.
    Culled = 3,
}

impl LodLevel {
    /// Whether this level must be drawn this frame.
    #[must_use]
    pub fn is_drawn(self) -> bool {
        self < Self::Culled
    }

    /// The coarser of two levels. `Culled` wins over everything.
    #[must_use]
    pub fn coarsest(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Per-level counts for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LodStats {
    pub full: usize,
    pub medium: usize,
    pub low: usize,
    pub culled: usize,
}

impl LodStats {
    pub fn record(&mut self, level: LodLevel) {
        match level {
            LodLevel::Full => self.full += 1,
            LodLevel::Medium => self.medium += 1,
            LodLevel::Low => self.low += 1,
            LodLevel::Culled => self.culled += 1,
        }
    }

    /// Count of entities drawn at any level.
    #[must_use]
    pub fn visible(&self) -> usize {
        self.full + self.medium + self.low
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.visible() + self.culled
    }

    /// Fraction of classified entities that are drawn; 0 when nothing was classified.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn visible_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.visible() as f64 / total as f64,
        }
    }
}

/// Maps nodes and edges to a [`LodLevel`] for a given viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodClassifier {
    config: LodConfig,
}

impl Default for LodClassifier {
    fn default() -> Self {
        Self::new(LodConfig::default())
    }
}

impl LodClassifier {
    #[must_use]
    pub fn new(config: LodConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    /// Classify a node against the viewport.
    #[must_use]
    pub fn classify(&self, node: &GraphNode, viewport: &Viewport) -> LodLevel {
        self.classify_point(node.position(), viewport)
    }

    /// Classify a world point: culled outside the margin-expanded surface,
    /// otherwise the zoom picks the detail.
    #[must_use]
    pub fn classify_point(&self, world: Point, viewport: &Viewport) -> LodLevel {
        let screen = viewport.world_to_screen(world);
        if !viewport.contains(screen, self.config.cull_margin_px) {
            return LodLevel::Culled;
        }
        self.level_for_zoom(viewport.zoom)
    }

    /// Detail for an in-view node at `zoom`.
    #[must_use]
    pub fn level_for_zoom(&self, zoom: f64) -> LodLevel {
        if zoom >= self.config.full_min_zoom {
            LodLevel::Full
        } else if zoom >= self.config.medium_min_zoom {
            LodLevel::Medium
        } else {
            LodLevel::Low
        }
    }

    /// Edge detail from its endpoint levels: the coarser of the two, so an
    /// edge is culled whenever either endpoint is.
    #[must_use]
    pub fn classify_edge(source: LodLevel, target: LodLevel) -> LodLevel {
        source.coarsest(target)
    }
}
