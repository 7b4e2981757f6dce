//! Scene aggregation and the active-scene registry

use std::cell::RefCell;
use std::rc::Rc;
use ember_physics::PhysicsConfig;
use crate::bridge::PhysicsBridge;
use crate::game::GameWorld;
use crate::world::SceneWorld;

/// One scene: renderable world, gameplay world, and physics
pub struct Scene {
    /// Scene name (for display/debugging)
    pub name: String,
    scene_world: SceneWorld,
    game_world: GameWorld,
    physics: PhysicsBridge,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scene_world: SceneWorld::new(),
            game_world: GameWorld::new(),
            physics: PhysicsBridge::new(),
        }
    }

    /// Create a scene with a custom physics configuration
    pub fn with_physics(mut self, config: PhysicsConfig) -> Self {
        self.physics = PhysicsBridge::with_config(config);
        self
    }

    /// The renderable world
    pub fn scene_world(&self) -> &SceneWorld {
        &self.scene_world
    }

    /// Mutable renderable world
    pub fn scene_world_mut(&mut self) -> &mut SceneWorld {
        &mut self.scene_world
    }

    /// The gameplay world
    pub fn game_world(&self) -> &GameWorld {
        &self.game_world
    }

    /// Mutable gameplay world
    pub fn game_world_mut(&mut self) -> &mut GameWorld {
        &mut self.game_world
    }

    /// The physics bridge
    pub fn physics(&self) -> &PhysicsBridge {
        &self.physics
    }

    /// Mutable physics bridge
    pub fn physics_mut(&mut self) -> &mut PhysicsBridge {
        &mut self.physics
    }

    /// Step physics and sync bound transforms
    pub fn step_physics(&mut self, dt: f32) {
        let Self { physics, scene_world, .. } = self;
        physics.step(dt, scene_world);
    }
}

/// Identifier of a scene in the registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(usize);

impl SceneId {
    /// Raw registry index
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Shared handle to a scene
pub type SceneRef = Rc<RefCell<Scene>>;

/// Registry of all active scenes
///
/// Scenes are added explicitly at startup and never removed in the
/// current engine scope; the registry exists for iteration and scripted
/// introspection. It is owned by the [`Engine`](crate::Engine) context,
/// not by ambient global state.
#[derive(Default)]
pub struct SceneRegistry {
    scenes: Vec<SceneRef>,
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene, returning its id
    pub fn add_scene(&mut self, scene: SceneRef) -> SceneId {
        let id = SceneId(self.scenes.len());
        self.scenes.push(scene);
        id
    }

    /// Look up a scene by id
    pub fn get(&self, id: SceneId) -> Option<SceneRef> {
        self.scenes.get(id.0).cloned()
    }

    /// Number of registered scenes
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Iterate over registered scenes
    pub fn iter(&self) -> impl Iterator<Item = &SceneRef> {
        self.scenes.iter()
    }
}
