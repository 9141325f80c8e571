//! Path geometry and gesture engine for the Doppler path editor.
//!
//! This crate is compiled to WebAssembly and runs in the browser, but everything
//! except [`render`] and the thin [`engine::Engine`] wrapper is plain Rust and is
//! exercised natively by the test suite. It owns the math behind the editor:
//! translating single-pointer drags on path handles into parameter patches,
//! sampling trajectories for each path family, and fitting those trajectories
//! into a preview canvas for static display and playback animation.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`params`] | Path parameter model, defaults, clamping and sparse patches |
//! | [`camera`] | World/canvas coordinate transform and zoom handle |
//! | [`drag`] | Drag handles, drag-start sessions and drag-to-parameter mappers |
//! | [`input`] | Pointer input types and the gesture state machine |
//! | [`hit`] | Hit-testing against path handles |
//! | [`sample`] | Trajectory sampling per path family |
//! | [`scene`] | Render-ready editor scene in canvas pixels |
//! | [`project`] | Autoscaling preview projection and closest approach |
//! | [`playback`] | Playback progress, sample index and the animated marker |
//! | [`submit`] | Flat simulation request record and its validation |
//! | [`render`] | Canvas 2D drawing of the editor and preview scenes |
//! | [`consts`] | Shared numeric constants (clamp bounds, zoom range, sample counts) |

pub mod camera;
pub mod consts;
pub mod drag;
pub mod engine;
pub mod hit;
pub mod input;
pub mod params;
pub mod playback;
pub mod project;
pub mod render;
pub mod sample;
pub mod scene;
pub mod submit;
