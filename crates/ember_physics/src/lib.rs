//! Rigid body simulation for the Ember engine
//!
//! This crate provides the physics backend boundary the engine consumes:
//! opaque generational body handles, a closed set of motion types and
//! collision layers, and a fixed-step simulation world with a body
//! interface for creation, velocity writes, and pose queries.

mod body;
mod shapes;
mod world;

pub use body::{BodyKey, MotionType, RigidBody};
pub use shapes::{Layers, Shape, StaticCollider};
pub use world::{PhysicsConfig, PhysicsWorld};
