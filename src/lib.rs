//! Ember - real-time 3D engine runtime
//!
//! The binary target hosts the frame loop; this library target exposes
//! the application-level pieces (currently configuration) for reuse and
//! integration testing.

pub mod config;

// Re-export the engine crates under one roof
pub use ember_core as core;
pub use ember_math as math;
pub use ember_physics as physics;
pub use ember_render as render;
pub use ember_script as script;
