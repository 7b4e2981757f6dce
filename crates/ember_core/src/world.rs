//! Scene world: the renderable object collection plus the active camera

use slotmap::{new_key_type, SlotMap};
use crate::camera::Camera;
use crate::object::SceneObject;

new_key_type! {
    /// Key to a scene object in a scene world
    ///
    /// Generational, so a key to a slot can never silently alias another
    /// object if removal support is added later.
    pub struct SceneObjectKey;
}

/// The renderable object collection for one scene
///
/// Objects are stored in a slot arena and iterated in insertion order,
/// which is also the draw order and the debug-listing order. The
/// collection is append-only in the current engine scope.
pub struct SceneWorld {
    camera: Camera,
    objects: SlotMap<SceneObjectKey, SceneObject>,
    /// Insertion order of object keys; drives iteration and draw order
    order: Vec<SceneObjectKey>,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneWorld {
    /// Create an empty scene world with a default camera
    pub fn new() -> Self {
        Self {
            camera: Camera::new(),
            objects: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Add an object, taking ownership; returns its key
    pub fn add_object(&mut self, object: SceneObject) -> SceneObjectKey {
        let key = self.objects.insert(object);
        self.order.push(key);
        key
    }

    /// Get a reference to an object by key
    pub fn object(&self, key: SceneObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// Get a mutable reference to an object by key
    pub fn object_mut(&mut self, key: SceneObjectKey) -> Option<&mut SceneObject> {
        self.objects.get_mut(key)
    }

    /// Iterate over objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = (SceneObjectKey, &SceneObject)> {
        self.order.iter().filter_map(|&key| self.objects.get(key).map(|obj| (key, obj)))
    }

    /// Find the first object with the given name
    pub fn find_by_name(&self, name: &str) -> Option<(SceneObjectKey, &SceneObject)> {
        self.objects().find(|(_, obj)| obj.name() == name)
    }

    /// Number of objects in the world
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// The active camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the active camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    #[test]
    fn test_new_world_is_empty() {
        let world = SceneWorld::new();
        assert!(world.is_empty());
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_add_and_get() {
        let mut world = SceneWorld::new();
        let key = world.add_object(SceneObject::empty("a"));

        assert_eq!(world.len(), 1);
        assert_eq!(world.object(key).unwrap().name(), "a");
    }

    #[test]
    fn test_iteration_is_insertion_order() {
        let mut world = SceneWorld::new();
        for name in ["first", "second", "third", "fourth"] {
            world.add_object(SceneObject::empty(name));
        }

        let names: Vec<&str> = world.objects().map(|(_, obj)| obj.name()).collect();
        assert_eq!(names, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_iteration_order_stable_across_passes() {
        let mut world = SceneWorld::new();
        for i in 0..16 {
            world.add_object(SceneObject::empty(format!("obj{}", i)));
        }

        let first: Vec<String> = world.objects().map(|(_, o)| o.name().to_string()).collect();
        let second: Vec<String> = world.objects().map(|(_, o)| o.name().to_string()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let mut world = SceneWorld::new();
        world.add_object(SceneObject::empty("dup"));
        world.add_object(SceneObject::empty("dup"));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_find_by_name() {
        let mut world = SceneWorld::new();
        world.add_object(SceneObject::empty("a"));
        let key_b = world.add_object(SceneObject::empty("b"));

        let (found, _) = world.find_by_name("b").unwrap();
        assert_eq!(found, key_b);
        assert!(world.find_by_name("missing").is_none());
    }

    #[test]
    fn test_object_mut() {
        let mut world = SceneWorld::new();
        let key = world.add_object(SceneObject::empty("movable"));

        world
            .object(key)
            .unwrap()
            .transform_mut()
            .set_position(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(world.object(key).unwrap().transform().position().x, 1.0);
    }

    #[test]
    fn test_camera_access() {
        let mut world = SceneWorld::new();
        world.camera_mut().set_fov(75.0);
        assert_eq!(world.camera().fov(), 75.0);
    }
}
