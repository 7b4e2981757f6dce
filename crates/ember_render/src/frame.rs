//! Per-frame scene snapshot
//!
//! Everything here is pure CPU work: collecting the frame's draw list
//! from the scene world and planning which meshes still need a GPU
//! upload. The pipeline consumes these; tests exercise them without a
//! device.

use std::collections::HashSet;
use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use ember_core::asset::{Mesh, MeshId};
use ember_core::SceneWorld;
use ember_math::{mat4, Mat4};

/// Per-frame uniform block: camera view and projection
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub proj: Mat4,
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            view: mat4::IDENTITY,
            proj: mat4::IDENTITY,
        }
    }
}

/// Per-draw uniform block: object model matrix
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: Mat4,
}

/// One indexed draw: mesh data plus its model matrix
pub struct DrawCommand {
    /// Shared mesh data
    pub mesh: Arc<Mesh>,
    /// Object model matrix
    pub model: Mat4,
}

/// The consistent per-frame view of a scene world
pub struct FrameSnapshot {
    /// Camera view matrix (inverse camera transform)
    pub view: Mat4,
    /// Camera projection matrix
    pub proj: Mat4,
    /// Draw commands in scene insertion order
    pub draws: Vec<DrawCommand>,
}

/// Collect the frame's draw list from a scene world
///
/// Iterates objects in insertion order (which is the draw order) and
/// keeps every mesh object with a non-null mesh; objects with a missing
/// mesh are tolerated and skipped.
pub fn snapshot_world(world: &SceneWorld) -> FrameSnapshot {
    let camera = world.camera();
    let view = camera.view_matrix();
    let proj = camera.projection_matrix();

    let mut draws = Vec::new();
    for (_key, object) in world.objects() {
        let Some(instance) = object.mesh_instance() else {
            continue;
        };
        let Some(mesh) = instance.mesh.as_ref() else {
            continue;
        };
        draws.push(DrawCommand {
            mesh: mesh.clone(),
            model: object.transform().to_trs(false),
        });
    }

    FrameSnapshot { view, proj, draws }
}

/// Tracks which meshes already have GPU-resident buffers
///
/// Keyed by [`MeshId`]; once a mesh is marked, later frames plan no
/// upload for it, making GPU residency idempotent.
#[derive(Default)]
pub struct ResidencySet {
    ids: HashSet<MeshId>,
}

impl ResidencySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a mesh's buffers are already on the GPU
    pub fn is_resident(&self, id: MeshId) -> bool {
        self.ids.contains(&id)
    }

    /// Mark a mesh as uploaded
    pub fn mark(&mut self, id: MeshId) {
        self.ids.insert(id);
    }

    /// Number of resident meshes
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is resident yet
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Meshes in the snapshot that still need an upload, deduplicated,
    /// in draw order
    pub fn pending(&self, snapshot: &FrameSnapshot) -> Vec<Arc<Mesh>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for draw in &snapshot.draws {
            let id = draw.mesh.id();
            if !self.ids.contains(&id) && seen.insert(id) {
                out.push(draw.mesh.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::SceneObject;
    use ember_math::Vec3;

    fn world_with_cube() -> (SceneWorld, Arc<Mesh>) {
        let mut world = SceneWorld::new();
        world.camera_mut().transform_mut().set_position(Vec3::new(0.0, 0.0, -10.0));

        let cube = Arc::new(Mesh::cube(1.0));
        world.add_object(SceneObject::mesh("cube").with_mesh(cube.clone()));
        (world, cube)
    }

    #[test]
    fn test_snapshot_collects_mesh_objects() {
        let (world, cube) = world_with_cube();
        let snapshot = snapshot_world(&world);

        assert_eq!(snapshot.draws.len(), 1);
        assert_eq!(snapshot.draws[0].mesh.id(), cube.id());
        assert_eq!(snapshot.draws[0].mesh.index_count(), 36);
    }

    #[test]
    fn test_snapshot_skips_empty_and_null_mesh_objects() {
        let (mut world, _cube) = world_with_cube();
        world.add_object(SceneObject::empty("marker"));
        world.add_object(SceneObject::mesh("unloaded"));

        let snapshot = snapshot_world(&world);
        assert_eq!(snapshot.draws.len(), 1);
    }

    #[test]
    fn test_snapshot_preserves_draw_order() {
        let mut world = SceneWorld::new();
        let a = Arc::new(Mesh::cube(1.0));
        let b = Arc::new(Mesh::cube(2.0));
        world.add_object(SceneObject::mesh("a").with_mesh(a.clone()));
        world.add_object(SceneObject::mesh("b").with_mesh(b.clone()));

        let snapshot = snapshot_world(&world);
        assert_eq!(snapshot.draws[0].mesh.id(), a.id());
        assert_eq!(snapshot.draws[1].mesh.id(), b.id());
    }

    #[test]
    fn test_snapshot_model_matrix_uses_transform() {
        let (mut world, _) = world_with_cube();
        let key = world.objects().next().unwrap().0;
        world
            .object(key)
            .unwrap()
            .transform_mut()
            .set_position(Vec3::new(5.0, 0.0, 0.0));

        let snapshot = snapshot_world(&world);
        let p = mat4::transform_point(snapshot.draws[0].model, Vec3::ZERO);
        assert!((p.x - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_residency_idempotent() {
        let (world, cube) = world_with_cube();
        let snapshot = snapshot_world(&world);

        let mut residency = ResidencySet::new();
        let pending = residency.pending(&snapshot);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].vertex_count(), 8);
        assert_eq!(pending[0].index_count(), 36);

        residency.mark(cube.id());
        assert!(residency.is_resident(cube.id()));

        // A second frame plans no upload
        let second = residency.pending(&snapshot_world(&world));
        assert!(second.is_empty());
    }

    #[test]
    fn test_residency_dedupes_shared_mesh() {
        let mut world = SceneWorld::new();
        let shared = Arc::new(Mesh::cube(1.0));
        world.add_object(SceneObject::mesh("a").with_mesh(shared.clone()));
        world.add_object(SceneObject::mesh("b").with_mesh(shared.clone()));

        let residency = ResidencySet::new();
        let pending = residency.pending(&snapshot_world(&world));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 128);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 64);
    }
}
