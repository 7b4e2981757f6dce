//! Engine context
//!
//! One explicit context object owns the cross-subsystem state that the
//! original design kept in process-wide globals: the scene registry and
//! the game clock. Subsystems that need the registry (e.g. the script
//! host's introspection API) receive a cloned handle at construction.

use std::cell::RefCell;
use std::rc::Rc;
use crate::scene::{SceneId, SceneRef, SceneRegistry};
use crate::time::GameClock;

/// Shared handle to the scene registry
pub type SceneRegistryRef = Rc<RefCell<SceneRegistry>>;

/// The engine context: scene registry plus game clock
pub struct Engine {
    scenes: SceneRegistryRef,
    /// Frame clock advanced once per iterate
    pub clock: GameClock,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create a fresh engine context
    pub fn new() -> Self {
        Self {
            scenes: Rc::new(RefCell::new(SceneRegistry::new())),
            clock: GameClock::new(),
        }
    }

    /// Register a scene in the active-scene registry
    pub fn add_scene(&self, scene: SceneRef) -> SceneId {
        self.scenes.borrow_mut().add_scene(scene)
    }

    /// Number of registered scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.borrow().len()
    }

    /// Clone the registry handle (for wiring into other subsystems)
    pub fn scenes(&self) -> SceneRegistryRef {
        self.scenes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    #[test]
    fn test_engine_add_scene() {
        let engine = Engine::new();
        assert_eq!(engine.scene_count(), 0);

        let id = engine.add_scene(Rc::new(RefCell::new(Scene::new("main"))));
        assert_eq!(engine.scene_count(), 1);
        assert_eq!(id.index(), 0);
    }

    #[test]
    fn test_registry_handle_is_shared() {
        let engine = Engine::new();
        let handle = engine.scenes();

        engine.add_scene(Rc::new(RefCell::new(Scene::new("main"))));
        assert_eq!(handle.borrow().len(), 1);
    }
}
