//! Physics bridge: body-to-object bindings synchronized after each step
//!
//! The bridge owns the physics world together with the mapping from body
//! handles to scene objects. Whoever creates a body registers the binding
//! here once; every step then copies the simulated pose into the bound
//! object's transform. There are no back-pointers in either the physics
//! or scene-graph types.

use ember_physics::{BodyKey, PhysicsConfig, PhysicsWorld};
use crate::world::{SceneObjectKey, SceneWorld};

/// One body-to-object association
#[derive(Clone, Copy, Debug)]
pub struct BodyBinding {
    /// The simulated body
    pub body: BodyKey,
    /// The scene object whose transform follows the body
    pub object: SceneObjectKey,
}

/// Owns the physics world and the body/object bindings
pub struct PhysicsBridge {
    world: PhysicsWorld,
    bindings: Vec<BodyBinding>,
}

impl Default for PhysicsBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBridge {
    /// Create a bridge with a default physics world
    pub fn new() -> Self {
        Self {
            world: PhysicsWorld::new(),
            bindings: Vec::new(),
        }
    }

    /// Create a bridge with a custom physics configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            world: PhysicsWorld::with_config(config),
            bindings: Vec::new(),
        }
    }

    /// The physics world (body interface)
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Mutable physics world
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// Associate a body with a scene object
    pub fn bind(&mut self, body: BodyKey, object: SceneObjectKey) {
        self.bindings.push(BodyBinding { body, object });
    }

    /// The registered bindings
    pub fn bindings(&self) -> &[BodyBinding] {
        &self.bindings
    }

    /// Advance the simulation and write body poses into bound transforms
    ///
    /// One fixed read per step; no interpolation between steps and frames.
    pub fn step(&mut self, dt: f32, scene_world: &mut SceneWorld) {
        self.world.step(dt);

        for binding in &self.bindings {
            let Some(position) = self.world.body_position(binding.body) else {
                log::warn!("physics binding references a stale body; skipping");
                continue;
            };
            match scene_world.object(binding.object) {
                Some(object) => object.transform_mut().set_position(position),
                None => log::warn!("physics binding references a missing scene object; skipping"),
            }
        }
    }
}
