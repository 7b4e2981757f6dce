//! Core types for the Ember engine
//!
//! This crate provides the foundational scene and asset types:
//!
//! - [`Transform`] - Position, Euler angles, rotation, and scale with SRT/TRS matrices
//! - [`SceneObject`] / [`ObjectKind`] - Renderable scene graph objects
//! - [`SceneWorld`] - The renderable object collection plus the active camera
//! - [`GameObject`] / [`GameWorld`] - Gameplay-only objects with a parent hierarchy
//! - [`Camera`] - Field of view and on-demand projection matrix
//! - [`Scene`] / [`SceneRegistry`] - One scene world + game world + physics, registered
//!   on an explicit [`Engine`] context
//! - [`PhysicsBridge`] - Body-to-object bindings synchronized after each step
//! - [`asset`] - Mesh / Material / Shader value objects and the GLB mesh loader
//! - [`fs`] - The file-system boundary used by all asset loading

pub mod asset;
mod bridge;
mod camera;
mod engine;
pub mod fs;
mod game;
mod object;
mod scene;
mod time;
mod transform;
mod world;

pub use bridge::{BodyBinding, PhysicsBridge};
pub use camera::Camera;
pub use engine::{Engine, SceneRegistryRef};
pub use game::{GameObject, GameObjectKey, GameWorld};
pub use object::{MeshInstance, ObjectKind, SceneObject};
pub use scene::{Scene, SceneId, SceneRef, SceneRegistry};
pub use time::GameClock;
pub use transform::{RawTransform, Transform, TransformRef};
pub use world::{SceneObjectKey, SceneWorld};

// Re-export commonly used types from the foundation crates for convenience
pub use ember_math::{Mat4, Quat, Vec3};
pub use ember_physics::{BodyKey, Layers, MotionType, PhysicsConfig, PhysicsWorld, RigidBody, Shape, StaticCollider};
