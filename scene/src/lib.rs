//! Viewport, camera and level-of-detail core for the force-directed graph view.
//!
//! The simulation hands this crate world-space node positions; the crate turns
//! them into screen-space render commands against a [`backend::RenderBackend`],
//! decides per frame which nodes and edges are worth drawing and at which
//! fidelity, and drives the camera (pan, wheel zoom, centering on selection).
//! Everything runs on the host's single render/animation callback; nothing here
//! blocks or spawns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] wiring every stage of a frame |
//! | [`viewport`] | Pan/zoom/size state and the world/screen transform |
//! | [`lod`] | Pure per-node and per-edge detail classification |
//! | [`sync`] | Reconciles the logical graph against persistent renderables |
//! | [`camera`] | Direct pan/zoom and eased centering animation |
//! | [`selection`] | Single-entity selection with toggle semantics |
//! | [`guardian`] | GPU context loss / restore policy |
//! | [`backend`] | The GPU-facing seam and an in-memory headless backend |
//! | [`graph`] | Logical node/edge collection supplied by the simulation |
//! | [`input`] | Pointer/wheel types and the gesture state machine |
//! | [`hit`] | Screen-space node picking for clicks |
//! | [`persist`] | Persisted view state, validated on restore |
//! | [`config`] | Tunable thresholds and limits |
//! | [`diagnostics`] | Read-only snapshots for overlays and debug panels |
//! | [`consts`] | Shared numeric defaults |

pub mod backend;
pub mod camera;
pub mod config;
pub mod consts;
pub mod diagnostics;
pub mod engine;
pub mod graph;
pub mod guardian;
pub mod hit;
pub mod input;
pub mod lod;
pub mod persist;
pub mod selection;
pub mod sync;
pub mod viewport;
