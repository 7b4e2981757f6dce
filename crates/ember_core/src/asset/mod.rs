//! Asset-layer value objects
//!
//! Meshes, materials, and shaders are immutable value objects shared via
//! `Arc` across scene objects. GPU-side state (buffers, pipelines) is not
//! stored here; the render layer creates it lazily and tracks residency
//! by [`MeshId`].

mod error;
pub mod gltf;
mod material;
mod mesh;
mod shader;

pub use error::AssetError;
pub use material::Material;
pub use mesh::{Mesh, MeshId};
pub use shader::{load_shader, Shader, ShaderStage};
