//! Tunable thresholds and limits, parsed from JSON or environment variables.
//!
//! The zoom-to-detail boundaries in particular are configuration, not law:
//! the only behavior callers can rely on is "zoomed in gives more detail,
//! zoomed out gives less but never nothing".

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Error returned when a configuration document or variable is invalid.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// An environment variable held a value that does not parse as a number.
    #[error("invalid value for {var}: {value}")]
    EnvParse { var: &'static str, value: String },
    /// The values parsed but break a consistency rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Level-of-detail thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Zoom at or above which in-view nodes are `Full`.
    pub full_min_zoom: f64,
    /// Zoom at or above which in-view nodes are `Medium`; below it they are `Low`.
    pub medium_min_zoom: f64,
    /// Screen-space margin around the surface that still counts as in view.
    pub cull_margin_px: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            full_min_zoom: DEFAULT_FULL_MIN_ZOOM,
            medium_min_zoom: DEFAULT_MEDIUM_MIN_ZOOM,
            cull_margin_px: DEFAULT_CULL_MARGIN_PX,
        }
    }
}

/// Camera limits and animation timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub center_duration_secs: f64,
    pub max_animation_secs: f64,
    pub max_animation_ticks: u32,
    pub settle_epsilon_px: f64,
    pub wheel_zoom_sensitivity: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            center_duration_secs: DEFAULT_CENTER_DURATION_SECS,
            max_animation_secs: DEFAULT_MAX_ANIMATION_SECS,
            max_animation_ticks: DEFAULT_MAX_ANIMATION_TICKS,
            settle_epsilon_px: DEFAULT_SETTLE_EPSILON_PX,
            wheel_zoom_sensitivity: DEFAULT_WHEEL_ZOOM_SENSITIVITY,
        }
    }
}

/// Scene synchronizer work bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub max_creates_per_frame: usize,
    pub position_epsilon_px: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_creates_per_frame: DEFAULT_MAX_CREATES_PER_FRAME,
            position_epsilon_px: DEFAULT_POSITION_EPSILON_PX,
        }
    }
}

/// Pointer gesture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub drag_threshold_px: f64,
    pub hit_radius_px: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX, hit_radius_px: DEFAULT_HIT_RADIUS_PX }
    }
}

/// Complete scene configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub lod: LodConfig,
    pub camera: CameraConfig,
    pub sync: SyncConfig,
    pub input: InputConfig,
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON document; absent fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::Invalid`] when the values are inconsistent.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from environment variables, falling back to defaults.
    ///
    /// Optional:
    /// - `GRAPHVIEW_LOD_FULL_MIN_ZOOM`, `GRAPHVIEW_LOD_MEDIUM_MIN_ZOOM`, `GRAPHVIEW_CULL_MARGIN_PX`
    /// - `GRAPHVIEW_MIN_ZOOM`, `GRAPHVIEW_MAX_ZOOM`, `GRAPHVIEW_CENTER_DURATION_SECS`
    /// - `GRAPHVIEW_MAX_CREATES_PER_FRAME`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvParse`] for unparsable values and
    /// [`ConfigError::Invalid`] when the result is inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.lod.full_min_zoom = env_f64("GRAPHVIEW_LOD_FULL_MIN_ZOOM", config.lod.full_min_zoom)?;
        config.lod.medium_min_zoom = env_f64("GRAPHVIEW_LOD_MEDIUM_MIN_ZOOM", config.lod.medium_min_zoom)?;
        config.lod.cull_margin_px = env_f64("GRAPHVIEW_CULL_MARGIN_PX", config.lod.cull_margin_px)?;
        config.camera.min_zoom = env_f64("GRAPHVIEW_MIN_ZOOM", config.camera.min_zoom)?;
        config.camera.max_zoom = env_f64("GRAPHVIEW_MAX_ZOOM", config.camera.max_zoom)?;
        config.camera.center_duration_secs =
            env_f64("GRAPHVIEW_CENTER_DURATION_SECS", config.camera.center_duration_secs)?;
        config.sync.max_creates_per_frame =
            env_usize("GRAPHVIEW_MAX_CREATES_PER_FRAME", config.sync.max_creates_per_frame)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first broken rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.min_zoom.is_finite() && cam.min_zoom > 0.0) {
            return Err(invalid(format!("camera.min_zoom must be positive, got {}", cam.min_zoom)));
        }
        if !cam.max_zoom.is_finite() || cam.max_zoom < cam.min_zoom {
            return Err(invalid(format!(
                "camera.max_zoom ({}) must be finite and >= min_zoom ({})",
                cam.max_zoom, cam.min_zoom
            )));
        }
        if !(cam.center_duration_secs.is_finite() && cam.center_duration_secs > 0.0) {
            return Err(invalid("camera.center_duration_secs must be positive".to_owned()));
        }
        if !(cam.max_animation_secs.is_finite() && cam.max_animation_secs > 0.0) || cam.max_animation_ticks == 0 {
            return Err(invalid("camera animation bounds must be positive".to_owned()));
        }
        if cam.settle_epsilon_px < 0.0 || cam.wheel_zoom_sensitivity < 0.0 {
            return Err(invalid("camera epsilons must be non-negative".to_owned()));
        }

        let lod = &self.lod;
        if !(lod.medium_min_zoom.is_finite() && lod.full_min_zoom.is_finite()) {
            return Err(invalid("lod thresholds must be finite".to_owned()));
        }
        if lod.medium_min_zoom > lod.full_min_zoom {
            return Err(invalid(format!(
                "lod.medium_min_zoom ({}) must not exceed lod.full_min_zoom ({})",
                lod.medium_min_zoom, lod.full_min_zoom
            )));
        }
        if !(lod.cull_margin_px.is_finite() && lod.cull_margin_px >= 0.0) {
            return Err(invalid("lod.cull_margin_px must be non-negative".to_owned()));
        }

        if self.sync.max_creates_per_frame == 0 {
            return Err(invalid("sync.max_creates_per_frame must be at least 1".to_owned()));
        }
        if self.sync.position_epsilon_px < 0.0 {
            return Err(invalid("sync.position_epsilon_px must be non-negative".to_owned()));
        }
        if self.input.drag_threshold_px < 0.0 || self.input.hit_radius_px < 0.0 {
            return Err(invalid("input distances must be non-negative".to_owned()));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> ConfigError {
    ConfigError::Invalid(msg)
}

fn env_f64(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.trim().parse::<f64>().map_err(|_| ConfigError::EnvParse { var, value }),
        Err(_) => Ok(default),
    }
}

fn env_usize(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value.trim().parse::<usize>().map_err(|_| ConfigError::EnvParse { var, value }),
        Err(_) => Ok(default),
    }
}
