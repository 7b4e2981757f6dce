//! Rendering for the Ember engine
//!
//! The render layer consumes a [`SceneWorld`](ember_core::SceneWorld)
//! snapshot once per frame and turns it into GPU work.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - wgpu device, queue, and surface management
//! - [`frame`] - pure per-frame snapshot: ordered draw list + camera matrices
//! - [`pipeline::RenderPipeline`] - the pluggable pipeline contract
//! - [`pipeline::ForwardPipeline`] - forward renderer constructed from a material

pub mod context;
pub mod frame;
pub mod pipeline;

pub use context::{RenderContext, RenderError};
pub use frame::{snapshot_world, DrawCommand, FrameSnapshot, FrameUniforms, ObjectUniforms, ResidencySet};
pub use pipeline::{ForwardPipeline, RenderPipeline};
