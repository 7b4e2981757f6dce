//! Rigid body types

use ember_math::Vec3;
use slotmap::new_key_type;
use crate::shapes::{Layers, Shape};

new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing so a stale key returns None instead of
    /// pointing at a reused slot.
    pub struct BodyKey;
}

/// Whether a body participates in simulation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionType {
    /// Never moves; ignored by integration
    Static,
    /// Fully simulated
    Dynamic,
}

/// A rigid body with position, velocity, and collision shape
#[derive(Clone, Debug)]
pub struct RigidBody {
    /// Position in world space
    pub position: Vec3,
    /// Velocity in units per second
    pub velocity: Vec3,
    /// Static or dynamic
    pub motion: MotionType,
    /// Collision layer
    pub layer: Layers,
    /// The collision shape
    pub shape: Shape,
    /// Coefficient of restitution (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
    /// Whether gravity is applied to this body
    pub affected_by_gravity: bool,
}

impl RigidBody {
    /// Create a dynamic body with a sphere shape
    pub fn new_sphere(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            motion: MotionType::Dynamic,
            layer: Layers::MOVING,
            shape: Shape::Sphere { radius },
            restitution: 0.0,
            affected_by_gravity: true,
        }
    }

    /// Create a dynamic body with a box shape
    pub fn new_box(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            motion: MotionType::Dynamic,
            layer: Layers::MOVING,
            shape: Shape::Box { half_extents },
            restitution: 0.0,
            affected_by_gravity: true,
        }
    }

    /// Create a static box body (environment geometry)
    pub fn new_static_box(position: Vec3, half_extents: Vec3) -> Self {
        let mut body = Self::new_box(position, half_extents);
        body.motion = MotionType::Static;
        body.layer = Layers::STATIC;
        body.affected_by_gravity = false;
        body
    }

    /// Set the initial velocity
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the restitution (clamped to 0..=1)
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }

    /// Enable or disable gravity for this body
    pub fn with_gravity(mut self, affected: bool) -> Self {
        self.affected_by_gravity = affected;
        self
    }

    /// Set the collision layer
    pub fn with_layer(mut self, layer: Layers) -> Self {
        self.layer = layer;
        self
    }

    /// True for bodies that integrate each step
    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.motion == MotionType::Dynamic
    }
}
