//! Collision shapes, layers, and static colliders

use bitflags::bitflags;
use ember_math::Vec3;
use serde::{Serialize, Deserialize};

bitflags! {
    /// Collision layer masks
    ///
    /// The layer set is closed: bodies are either part of the static
    /// environment or moving simulated objects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Layers: u8 {
        /// Non-moving environment geometry
        const STATIC = 1 << 0;
        /// Simulated moving bodies
        const MOVING = 1 << 1;
    }
}

/// Collision shape attached to a rigid body
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Shape {
    /// Sphere centered on the body position
    Sphere { radius: f32 },
    /// Axis-aligned box centered on the body position
    Box { half_extents: Vec3 },
}

impl Shape {
    /// Support distance along a unit direction (for plane contact tests)
    pub fn support(&self, dir: Vec3) -> f32 {
        match self {
            Shape::Sphere { radius } => *radius,
            Shape::Box { half_extents } => {
                half_extents.x * dir.x.abs()
                    + half_extents.y * dir.y.abs()
                    + half_extents.z * dir.z.abs()
            }
        }
    }
}

/// An immovable plane collider (floors, walls)
///
/// Points satisfying `dot(normal, p) >= offset` are on the outside.
#[derive(Clone, Copy, Debug)]
pub struct StaticCollider {
    /// Unit plane normal pointing away from the solid side
    pub normal: Vec3,
    /// Plane offset along the normal
    pub offset: f32,
    /// Bounciness applied to bodies hitting this collider
    pub restitution: f32,
}

impl StaticCollider {
    /// Create a plane collider from a normal and offset
    pub fn plane(normal: Vec3, offset: f32) -> Self {
        Self {
            normal: normal.normalized(),
            offset,
            restitution: 0.0,
        }
    }

    /// Horizontal floor at the given Y height
    pub fn floor(y: f32) -> Self {
        Self::plane(Vec3::Y, y)
    }

    /// Set the restitution of this collider
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_support() {
        let s = Shape::Sphere { radius: 0.5 };
        assert_eq!(s.support(Vec3::Y), 0.5);
        assert_eq!(s.support(-Vec3::Y), 0.5);
    }

    #[test]
    fn test_box_support() {
        let s = Shape::Box { half_extents: Vec3::new(1.0, 2.0, 3.0) };
        assert_eq!(s.support(Vec3::Y), 2.0);
        assert_eq!(s.support(Vec3::X), 1.0);
    }

    #[test]
    fn test_floor_collider() {
        let floor = StaticCollider::floor(-1.0);
        assert_eq!(floor.normal, Vec3::Y);
        assert_eq!(floor.offset, -1.0);
        assert_eq!(floor.restitution, 0.0);
    }

    #[test]
    fn test_restitution_clamped() {
        let floor = StaticCollider::floor(0.0).with_restitution(1.5);
        assert_eq!(floor.restitution, 1.0);
    }

    #[test]
    fn test_layers_disjoint() {
        assert!((Layers::STATIC & Layers::MOVING).is_empty());
    }
}
