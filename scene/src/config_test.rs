#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_config_is_valid() {
    SceneConfig::default().validate().expect("defaults validate");
}

#[test]
fn default_thresholds_are_ordered() {
    let lod = LodConfig::default();
    assert!(lod.medium_min_zoom <= lod.full_min_zoom);
    assert!(lod.cull_margin_px >= 0.0);
}

#[test]
fn from_json_empty_object_gives_defaults() {
    let cfg = SceneConfig::from_json("{}").expect("parse");
    assert_eq!(cfg, SceneConfig::default());
}

#[test]
fn from_json_partial_override_keeps_other_defaults() {
    let cfg = SceneConfig::from_json(r#"{"lod": {"full_min_zoom": 1.5}, "sync": {"max_creates_per_frame": 10}}"#)
        .expect("parse");
    assert_eq!(cfg.lod.full_min_zoom, 1.5);
    assert_eq!(cfg.lod.medium_min_zoom, DEFAULT_MEDIUM_MIN_ZOOM);
    assert_eq!(cfg.sync.max_creates_per_frame, 10);
    assert_eq!(cfg.camera, CameraConfig::default());
}

#[test]
fn from_json_rejects_malformed_document() {
    let err = SceneConfig::from_json("{not json").expect_err("should fail");
    assert!(matches!(err, ConfigError::Json(_)));
}

#[test]
fn from_json_rejects_inverted_lod_thresholds() {
    let err = SceneConfig::from_json(r#"{"lod": {"full_min_zoom": 0.2, "medium_min_zoom": 0.5}}"#)
        .expect_err("should fail");
    assert!(err.to_string().contains("medium_min_zoom"));
}

#[test]
fn validate_rejects_non_positive_min_zoom() {
    let mut cfg = SceneConfig::default();
    cfg.camera.min_zoom = 0.0;
    assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn validate_rejects_min_above_max_zoom() {
    let mut cfg = SceneConfig::default();
    cfg.camera.min_zoom = 4.0;
    cfg.camera.max_zoom = 2.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_zero_creation_budget() {
    let mut cfg = SceneConfig::default();
    cfg.sync.max_creates_per_frame = 0;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_negative_margin() {
    let mut cfg = SceneConfig::default();
    cfg.lod.cull_margin_px = -1.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_zero_animation_duration() {
    let mut cfg = SceneConfig::default();
    cfg.camera.center_duration_secs = 0.0;
    assert!(cfg.validate().is_err());
}

/// Env-reading cases share one test so they never race each other.
#[test]
fn from_env_reads_overrides_and_rejects_garbage() {
    unsafe {
        std::env::set_var("GRAPHVIEW_LOD_FULL_MIN_ZOOM", "1.25");
        std::env::set_var("GRAPHVIEW_MAX_CREATES_PER_FRAME", "64");
    }
    let cfg = SceneConfig::from_env().expect("env config");
    assert_eq!(cfg.lod.full_min_zoom, 1.25);
    assert_eq!(cfg.sync.max_creates_per_frame, 64);
    assert_eq!(cfg.camera.max_zoom, DEFAULT_MAX_ZOOM);

    unsafe { std::env::set_var("GRAPHVIEW_MAX_CREATES_PER_FRAME", "lots") };
    let err = SceneConfig::from_env().expect_err("garbage should fail");
    assert!(matches!(err, ConfigError::EnvParse { var: "GRAPHVIEW_MAX_CREATES_PER_FRAME", .. }));

    unsafe {
        std::env::remove_var("GRAPHVIEW_LOD_FULL_MIN_ZOOM");
        std::env::remove_var("GRAPHVIEW_MAX_CREATES_PER_FRAME");
    }
}
