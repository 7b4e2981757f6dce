//! Physics world and simulation step

use ember_math::Vec3;
use slotmap::SlotMap;
use crate::body::{BodyKey, MotionType, RigidBody};
use crate::shapes::{Layers, Shape, StaticCollider};

/// Configuration for the physics simulation
#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Gravity acceleration (applied to the Y axis, negative = down)
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { gravity: -9.81 }
    }
}

impl PhysicsConfig {
    /// Create a new physics config with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self { gravity }
    }
}

/// The physics world containing all rigid bodies
///
/// The world doubles as the body interface: bodies are created through
/// [`RigidBody`] constructors, added with [`add_body`](Self::add_body) or
/// [`create_and_add`](Self::create_and_add), and queried by their opaque
/// [`BodyKey`].
pub struct PhysicsWorld {
    /// All rigid bodies (generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Static plane colliders (floors, walls)
    static_colliders: Vec<StaticCollider>,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            static_colliders: Vec::new(),
            config,
        }
    }

    /// Add a static collider to the world
    pub fn add_static_collider(&mut self, collider: StaticCollider) {
        self.static_colliders.push(collider);
    }

    /// Get immutable access to static colliders
    pub fn static_colliders(&self) -> &[StaticCollider] {
        &self.static_colliders
    }

    /// Add a body to the world and return its key
    pub fn add_body(&mut self, body: RigidBody) -> BodyKey {
        self.bodies.insert(body)
    }

    /// Create a body from its parts and add it in one call
    pub fn create_and_add(
        &mut self,
        shape: Shape,
        position: Vec3,
        motion: MotionType,
        layer: Layers,
    ) -> BodyKey {
        let body = RigidBody {
            position,
            velocity: Vec3::ZERO,
            motion,
            layer,
            shape,
            restitution: 0.0,
            affected_by_gravity: motion == MotionType::Dynamic,
        };
        self.add_body(body)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Set the linear velocity of a body; returns false for a stale key
    pub fn set_linear_velocity(&mut self, key: BodyKey, velocity: Vec3) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.velocity = velocity;
                true
            }
            None => false,
        }
    }

    /// Get the position of a body by key
    pub fn body_position(&self, key: BodyKey) -> Option<Vec3> {
        self.bodies.get(key).map(|b| b.position)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Gravity application to dynamic bodies with gravity enabled
    /// 2. Velocity integration into position
    /// 3. Static collider collision resolution
    pub fn step(&mut self, dt: f32) {
        for (_key, body) in &mut self.bodies {
            if !body.is_dynamic() {
                continue;
            }

            if body.affected_by_gravity {
                body.velocity.y += self.config.gravity * dt;
            }

            body.position += body.velocity * dt;
        }

        self.resolve_static_collisions();
    }

    /// Push dynamic bodies out of static plane colliders
    fn resolve_static_collisions(&mut self) {
        for (_key, body) in &mut self.bodies {
            if !body.is_dynamic() {
                continue;
            }

            for collider in &self.static_colliders {
                let support = body.shape.support(collider.normal);
                let distance = body.position.dot(collider.normal) - collider.offset - support;

                if distance < 0.0 {
                    // Push the body out along the plane normal
                    body.position -= collider.normal * distance;

                    let along_normal = body.velocity.dot(collider.normal);
                    if along_normal < 0.0 {
                        let restitution = body.restitution.max(collider.restitution);
                        body.velocity -=
                            collider.normal * (along_normal * (1.0 + restitution));
                    }
                }
            }
        }
    }
}
