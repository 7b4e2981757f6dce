//! Mesh assets

use std::sync::atomic::{AtomicU64, Ordering};
use ember_math::Vec3;

/// Process-unique mesh identifier
///
/// Assigned at construction; the render layer keys GPU residency on it,
/// so re-creating a mesh with identical contents still re-uploads while
/// sharing one `Arc<Mesh>` never does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(u64);

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(1);

/// CPU-side mesh data: positions and 16-bit indices
pub struct Mesh {
    id: MeshId,
    vertices: Vec<Vec3>,
    indices: Vec<u16>,
}

impl Mesh {
    /// Create a mesh from vertex positions and triangle indices
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u16>) -> Self {
        Self {
            id: MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed)),
            vertices,
            indices,
        }
    }

    /// A unit-style cube: 8 vertices, 12 triangles (36 indices)
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let vertices = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let indices = vec![
            0, 1, 3, 3, 1, 2, //
            1, 5, 2, 2, 5, 6, //
            5, 4, 6, 6, 4, 7, //
            4, 0, 7, 7, 0, 3, //
            3, 2, 7, 7, 2, 6, //
            4, 5, 0, 0, 5, 1, //
        ];
        Self::new(vertices, indices)
    }

    /// This mesh's unique id
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Triangle indices
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}
