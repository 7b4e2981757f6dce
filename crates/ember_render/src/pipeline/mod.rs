//! Render pipelines
//!
//! A pipeline is the strategy that turns a scene-world snapshot into GPU
//! commands. The engine ships one forward renderer; alternative
//! strategies plug in behind the same contract.

mod forward;

use ember_core::SceneWorld;
use crate::context::RenderContext;

/// The pluggable render-pipeline contract
///
/// Called exactly once per output frame. Implementations must tolerate a
/// transiently unavailable swapchain by skipping the frame.
pub trait RenderPipeline {
    /// Render one frame from a consistent view of the scene world
    fn render(&mut self, ctx: &RenderContext, world: &SceneWorld);
}

pub use forward::ForwardPipeline;
