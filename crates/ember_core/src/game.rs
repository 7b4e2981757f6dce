//! Game world: gameplay-only objects with a parent hierarchy
//!
//! Game objects live beside the renderable scene world and carry a
//! local/world transform distinction that [`SceneObject`](crate::SceneObject)
//! does not have: each object stores a local transform and an optional
//! parent, and its world matrix is composed up the parent chain.

use ember_math::{mat4, Mat4};
use slotmap::{new_key_type, SlotMap};
use crate::transform::Transform;

new_key_type! {
    /// Key to a game object in a game world
    pub struct GameObjectKey;
}

/// A gameplay-only entity with a local transform
pub struct GameObject {
    name: String,
    local: Transform,
    parent: Option<GameObjectKey>,
}

impl GameObject {
    /// Create a game object with an identity local transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Transform::identity(),
            parent: None,
        }
    }

    /// Parent this object under another game object
    pub fn with_parent(mut self, parent: GameObjectKey) -> Self {
        self.parent = Some(parent);
        self
    }

    /// The object's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local transform
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// Mutable local transform
    pub fn local_mut(&mut self) -> &mut Transform {
        &mut self.local
    }

    /// The parent key, if any
    pub fn parent(&self) -> Option<GameObjectKey> {
        self.parent
    }
}

/// The gameplay object collection for one scene
pub struct GameWorld {
    objects: SlotMap<GameObjectKey, GameObject>,
    order: Vec<GameObjectKey>,
}

impl Default for GameWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl GameWorld {
    /// Create an empty game world
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Add an object, taking ownership; returns its key
    pub fn add_object(&mut self, object: GameObject) -> GameObjectKey {
        let key = self.objects.insert(object);
        self.order.push(key);
        key
    }

    /// Get a reference to an object by key
    pub fn object(&self, key: GameObjectKey) -> Option<&GameObject> {
        self.objects.get(key)
    }

    /// Get a mutable reference to an object by key
    pub fn object_mut(&mut self, key: GameObjectKey) -> Option<&mut GameObject> {
        self.objects.get_mut(key)
    }

    /// Iterate over objects in insertion order
    pub fn objects(&self) -> impl Iterator<Item = (GameObjectKey, &GameObject)> {
        self.order.iter().filter_map(|&key| self.objects.get(key).map(|obj| (key, obj)))
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world has no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// World matrix of an object, composed up the parent chain
    ///
    /// Returns None for a stale key. The chain walk is bounded by the
    /// object count, so a malformed parent cycle terminates.
    pub fn world_matrix(&self, key: GameObjectKey) -> Option<Mat4> {
        let mut object = self.objects.get(key)?;
        let mut matrix = object.local.to_trs(false);

        let mut hops = 0;
        while let Some(parent_key) = object.parent {
            if hops >= self.objects.len() {
                log::warn!("game object parent chain does not terminate; truncating");
                break;
            }
            match self.objects.get(parent_key) {
                Some(parent) => {
                    matrix = mat4::mul(parent.local.to_trs(false), matrix);
                    object = parent;
                }
                None => break,
            }
            hops += 1;
        }

        Some(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    #[test]
    fn test_add_and_get() {
        let mut world = GameWorld::new();
        let key = world.add_object(GameObject::new("player"));
        assert_eq!(world.object(key).unwrap().name(), "player");
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_insertion_order() {
        let mut world = GameWorld::new();
        world.add_object(GameObject::new("a"));
        world.add_object(GameObject::new("b"));

        let names: Vec<&str> = world.objects().map(|(_, o)| o.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_world_matrix_no_parent() {
        let mut world = GameWorld::new();
        let key = world.add_object(GameObject::new("root"));
        world
            .object_mut(key)
            .unwrap()
            .local_mut()
            .set_position(Vec3::new(1.0, 2.0, 3.0));

        let m = world.world_matrix(key).unwrap();
        let p = mat4::transform_point(m, Vec3::ZERO);
        assert!((p.x - 1.0).abs() < 0.001);
        assert!((p.y - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_world_matrix_composes_parent_chain() {
        let mut world = GameWorld::new();
        let root = world.add_object(GameObject::new("root"));
        world
            .object_mut(root)
            .unwrap()
            .local_mut()
            .set_position(Vec3::new(10.0, 0.0, 0.0));

        let child = world.add_object(GameObject::new("child").with_parent(root));
        world
            .object_mut(child)
            .unwrap()
            .local_mut()
            .set_position(Vec3::new(0.0, 5.0, 0.0));

        // Child's world position = parent translation + local translation
        let m = world.world_matrix(child).unwrap();
        let p = mat4::transform_point(m, Vec3::ZERO);
        assert!((p.x - 10.0).abs() < 0.001);
        assert!((p.y - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_world_matrix_with_parent_rotation() {
        let mut world = GameWorld::new();
        let root = world.add_object(GameObject::new("root"));
        world
            .object_mut(root)
            .unwrap()
            .local_mut()
            .set_angles(Vec3::new(0.0, 90.0, 0.0));

        let child = world.add_object(GameObject::new("child").with_parent(root));
        world
            .object_mut(child)
            .unwrap()
            .local_mut()
            .set_position(Vec3::new(0.0, 0.0, 1.0));

        // Local +Z offset rotated 90 degrees around Y lands on +X
        let m = world.world_matrix(child).unwrap();
        let p = mat4::transform_point(m, Vec3::ZERO);
        assert!((p.x - 1.0).abs() < 0.001, "got {:?}", p);
        assert!(p.z.abs() < 0.001);
    }

    #[test]
    fn test_world_matrix_stale_key() {
        let world = GameWorld::new();
        let other = GameWorld::new();
        let _ = other; // keys from one world are not valid in another
        assert!(world.world_matrix(GameObjectKey::default()).is_none());
    }
}
