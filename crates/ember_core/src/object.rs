//! Scene objects
//!
//! A [`SceneObject`] couples a name and an owned transform with a tagged
//! payload: plain marker objects carry nothing, mesh objects add mesh and
//! material references. Iteration code matches on [`ObjectKind`] instead of
//! downcasting.

use std::cell::{Ref, RefMut};
use std::sync::Arc;
use crate::asset::{Material, Mesh};
use crate::transform::{Transform, TransformRef};

/// Mesh payload of a scene object
///
/// Both references are optional: a missing mesh is tolerated by the render
/// pipeline (the object is skipped), matching the null-asset error model.
#[derive(Clone, Default)]
pub struct MeshInstance {
    /// Shared mesh data
    pub mesh: Option<Arc<Mesh>>,
    /// Shared material (GPU pipeline definition)
    pub material: Option<Arc<Material>>,
}

/// Payload variants of a scene object
#[derive(Clone)]
pub enum ObjectKind {
    /// Plain marker object: transform and name only
    Empty,
    /// Renderable object with mesh and material references
    Mesh(MeshInstance),
}

/// An object in the scene world
pub struct SceneObject {
    name: String,
    transform: TransformRef,
    kind: ObjectKind,
}

impl SceneObject {
    /// Create a plain marker object
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity().into_ref(),
            kind: ObjectKind::Empty,
        }
    }

    /// Create a mesh object with no mesh or material assigned yet
    pub fn mesh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity().into_ref(),
            kind: ObjectKind::Mesh(MeshInstance::default()),
        }
    }

    /// Assign a mesh (converts the object to a mesh object if needed)
    pub fn with_mesh(mut self, mesh: Arc<Mesh>) -> Self {
        match &mut self.kind {
            ObjectKind::Mesh(instance) => instance.mesh = Some(mesh),
            ObjectKind::Empty => {
                self.kind = ObjectKind::Mesh(MeshInstance {
                    mesh: Some(mesh),
                    material: None,
                });
            }
        }
        self
    }

    /// Assign a material (converts the object to a mesh object if needed)
    pub fn with_material(mut self, material: Arc<Material>) -> Self {
        match &mut self.kind {
            ObjectKind::Mesh(instance) => instance.material = Some(material),
            ObjectKind::Empty => {
                self.kind = ObjectKind::Mesh(MeshInstance {
                    mesh: None,
                    material: Some(material),
                });
            }
        }
        self
    }

    /// Set the initial position
    pub fn with_position(self, position: ember_math::Vec3) -> Self {
        self.transform.borrow_mut().set_position(position);
        self
    }

    /// The object's name (not required to be unique)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Borrow the transform
    pub fn transform(&self) -> Ref<'_, Transform> {
        self.transform.borrow()
    }

    /// Mutably borrow the transform
    pub fn transform_mut(&self) -> RefMut<'_, Transform> {
        self.transform.borrow_mut()
    }

    /// The shared transform handle (for foreign-handle registration)
    pub fn transform_ref(&self) -> &TransformRef {
        &self.transform
    }

    /// The object's payload
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Mutable access to the payload
    pub fn kind_mut(&mut self) -> &mut ObjectKind {
        &mut self.kind
    }

    /// The mesh payload, if this is a mesh object
    pub fn mesh_instance(&self) -> Option<&MeshInstance> {
        match &self.kind {
            ObjectKind::Mesh(instance) => Some(instance),
            ObjectKind::Empty => None,
        }
    }

    /// Mutable mesh payload, if this is a mesh object
    pub fn mesh_instance_mut(&mut self) -> Option<&mut MeshInstance> {
        match &mut self.kind {
            ObjectKind::Mesh(instance) => Some(instance),
            ObjectKind::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    #[test]
    fn test_empty_object() {
        let obj = SceneObject::empty("blank");
        assert_eq!(obj.name(), "blank");
        assert!(obj.mesh_instance().is_none());
    }

    #[test]
    fn test_mesh_object_without_mesh() {
        let obj = SceneObject::mesh("cube");
        let instance = obj.mesh_instance().unwrap();
        assert!(instance.mesh.is_none());
        assert!(instance.material.is_none());
    }

    #[test]
    fn test_with_mesh() {
        let mesh = Arc::new(Mesh::cube(1.0));
        let obj = SceneObject::mesh("cube").with_mesh(mesh.clone());
        let instance = obj.mesh_instance().unwrap();
        assert_eq!(instance.mesh.as_ref().unwrap().id(), mesh.id());
    }

    #[test]
    fn test_with_mesh_upgrades_empty() {
        let mesh = Arc::new(Mesh::cube(1.0));
        let obj = SceneObject::empty("promoted").with_mesh(mesh);
        assert!(obj.mesh_instance().is_some());
    }

    #[test]
    fn test_with_position() {
        let obj = SceneObject::empty("placed").with_position(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(obj.transform().position(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform_mutation() {
        let obj = SceneObject::empty("movable");
        obj.transform_mut().set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(obj.transform().position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
