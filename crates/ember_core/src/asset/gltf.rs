//! Binary glTF (GLB) mesh loading
//!
//! Reads only what the engine consumes: mesh 0, primitive 0, its POSITION
//! accessor (3x f32 per vertex) and its index accessor (u16 per index),
//! honoring each buffer view's declared byte stride. Materials, animation,
//! and skinning data in the container are ignored.

use std::collections::HashMap;
use std::sync::Arc;
use ember_math::Vec3;
use serde::Deserialize;
use crate::asset::{AssetError, Mesh};
use crate::fs::FileSystem;

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"

const COMPONENT_F32: u32 = 5126;
const COMPONENT_U16: u32 = 5123;

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    meshes: Vec<GltfMesh>,
    #[serde(default)]
    accessors: Vec<Accessor>,
    #[serde(default, rename = "bufferViews")]
    buffer_views: Vec<BufferView>,
}

#[derive(Deserialize)]
struct GltfMesh {
    primitives: Vec<Primitive>,
}

#[derive(Deserialize)]
struct Primitive {
    attributes: HashMap<String, usize>,
    indices: Option<usize>,
}

#[derive(Deserialize)]
struct Accessor {
    #[serde(rename = "bufferView")]
    buffer_view: Option<usize>,
    #[serde(default, rename = "byteOffset")]
    byte_offset: usize,
    #[serde(rename = "componentType")]
    component_type: u32,
    count: usize,
    #[serde(rename = "type")]
    element_type: String,
}

#[derive(Deserialize)]
struct BufferView {
    #[serde(default, rename = "byteOffset")]
    byte_offset: usize,
    #[serde(rename = "byteLength")]
    byte_length: usize,
    #[serde(rename = "byteStride")]
    byte_stride: Option<usize>,
}

/// Load a GLB mesh through the file-system boundary
pub fn load_mesh(fs: &dyn FileSystem, path: &str) -> Result<Arc<Mesh>, AssetError> {
    let bytes = fs.read(path)?;
    let mesh = parse_glb(&bytes)?;
    log::info!(
        "loaded mesh: {} ({} vertices, {} indices)",
        path,
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(Arc::new(mesh))
}

/// Parse a GLB container into a mesh
pub fn parse_glb(bytes: &[u8]) -> Result<Mesh, AssetError> {
    let (json, bin) = split_chunks(bytes)?;

    let doc: Document = serde_json::from_slice(json)
        .map_err(|e| AssetError::Parse(format!("glb json chunk: {}", e)))?;

    let primitive = doc
        .meshes
        .first()
        .and_then(|m| m.primitives.first())
        .ok_or_else(|| AssetError::Parse("glb has no mesh primitives".to_string()))?;

    let position_accessor = *primitive
        .attributes
        .get("POSITION")
        .ok_or_else(|| AssetError::Parse("primitive has no POSITION attribute".to_string()))?;
    let index_accessor = primitive
        .indices
        .ok_or_else(|| AssetError::Parse("primitive has no indices".to_string()))?;

    let vertices = read_positions(&doc, position_accessor, bin)?;
    let indices = read_indices(&doc, index_accessor, bin)?;

    Ok(Mesh::new(vertices, indices))
}

/// Split the GLB header and return the JSON and BIN chunk slices
fn split_chunks(bytes: &[u8]) -> Result<(&[u8], &[u8]), AssetError> {
    if bytes.len() < 12 {
        return Err(AssetError::Parse("glb shorter than its header".to_string()));
    }
    if read_u32(bytes, 0) != GLB_MAGIC {
        return Err(AssetError::Parse("not a glb container (bad magic)".to_string()));
    }
    let version = read_u32(bytes, 4);
    if version != 2 {
        return Err(AssetError::Parse(format!("unsupported glb version {}", version)));
    }

    let mut json: Option<&[u8]> = None;
    let mut bin: Option<&[u8]> = None;
    let mut offset = 12;
    while offset + 8 <= bytes.len() {
        let length = read_u32(bytes, offset) as usize;
        let kind = read_u32(bytes, offset + 4);
        let start = offset + 8;
        let end = start
            .checked_add(length)
            .filter(|&e| e <= bytes.len())
            .ok_or_else(|| AssetError::Parse("glb chunk overruns the file".to_string()))?;

        match kind {
            CHUNK_JSON => json = Some(&bytes[start..end]),
            CHUNK_BIN => bin = Some(&bytes[start..end]),
            _ => {}
        }

        // Chunks are 4-byte aligned
        offset = end + ((4 - end % 4) % 4);
    }

    let json = json.ok_or_else(|| AssetError::Parse("glb has no JSON chunk".to_string()))?;
    let bin = bin.ok_or_else(|| AssetError::Parse("glb has no BIN chunk".to_string()))?;
    Ok((json, bin))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

/// Resolve an accessor to (base offset, stride, count) over the BIN chunk
fn accessor_layout<'a>(
    doc: &'a Document,
    index: usize,
    element_size: usize,
    bin_len: usize,
) -> Result<(&'a Accessor, usize, usize), AssetError> {
    let accessor = doc
        .accessors
        .get(index)
        .ok_or_else(|| AssetError::Parse(format!("accessor {} out of range", index)))?;
    let view_index = accessor
        .buffer_view
        .ok_or_else(|| AssetError::Parse("accessor has no buffer view".to_string()))?;
    let view = doc
        .buffer_views
        .get(view_index)
        .ok_or_else(|| AssetError::Parse(format!("buffer view {} out of range", view_index)))?;

    let base = view.byte_offset + accessor.byte_offset;
    let stride = view.byte_stride.unwrap_or(element_size);

    if accessor.count > 0 {
        let last = base + (accessor.count - 1) * stride + element_size;
        if last > bin_len || last > view.byte_offset + view.byte_length {
            return Err(AssetError::Parse("accessor overruns its buffer view".to_string()));
        }
    }

    Ok((accessor, base, stride))
}

fn read_positions(doc: &Document, index: usize, bin: &[u8]) -> Result<Vec<Vec3>, AssetError> {
    let (accessor, base, stride) = accessor_layout(doc, index, 12, bin.len())?;
    if accessor.component_type != COMPONENT_F32 || accessor.element_type != "VEC3" {
        return Err(AssetError::Parse(
            "POSITION accessor must be float32 VEC3".to_string(),
        ));
    }

    let mut vertices = Vec::with_capacity(accessor.count);
    for i in 0..accessor.count {
        let at = base + i * stride;
        vertices.push(Vec3::new(
            read_f32(bin, at),
            read_f32(bin, at + 4),
            read_f32(bin, at + 8),
        ));
    }
    Ok(vertices)
}

fn read_indices(doc: &Document, index: usize, bin: &[u8]) -> Result<Vec<u16>, AssetError> {
    let (accessor, base, stride) = accessor_layout(doc, index, 2, bin.len())?;
    if accessor.component_type != COMPONENT_U16 || accessor.element_type != "SCALAR" {
        return Err(AssetError::Parse(
            "index accessor must be uint16 SCALAR".to_string(),
        ));
    }

    let mut indices = Vec::with_capacity(accessor.count);
    for i in 0..accessor.count {
        let at = base + i * stride;
        indices.push(read_u16(bin, at));
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;

    /// Build a minimal GLB containing one triangle
    fn build_glb(byte_stride: Option<usize>) -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices: [u16; 3] = [0, 1, 2];

        let stride = byte_stride.unwrap_or(12);
        let mut bin = Vec::new();
        for v in positions.chunks(3) {
            let start = bin.len();
            for f in v {
                bin.extend_from_slice(&f.to_le_bytes());
            }
            // Pad each element up to the declared stride
            while bin.len() - start < stride {
                bin.push(0);
            }
        }
        let index_offset = bin.len();
        for i in indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let mut views = vec![serde_json::json!({
            "buffer": 0,
            "byteOffset": 0,
            "byteLength": index_offset,
        })];
        if let Some(s) = byte_stride {
            views[0]["byteStride"] = serde_json::json!(s);
        }
        views.push(serde_json::json!({
            "buffer": 0,
            "byteOffset": index_offset,
            "byteLength": 6,
        }));

        let doc = serde_json::json!({
            "asset": { "version": "2.0" },
            "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
            "accessors": [
                { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
                { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" },
            ],
            "bufferViews": views,
            "buffers": [{ "byteLength": bin.len() }],
        });

        let mut json = serde_json::to_vec(&doc).unwrap();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
        out
    }

    #[test]
    fn test_parse_tightly_packed() {
        let mesh = parse_glb(&build_glb(None)).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.vertices()[1], Vec3::X);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_parse_with_stride() {
        // 16-byte stride: 12 bytes of position plus 4 bytes of padding
        let mesh = parse_glb(&build_glb(Some(16))).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices()[2], Vec3::Y);
    }

    #[test]
    fn test_bad_magic() {
        let mut glb = build_glb(None);
        glb[0] = b'X';
        assert!(matches!(parse_glb(&glb), Err(AssetError::Parse(_))));
    }

    #[test]
    fn test_truncated_file() {
        let glb = build_glb(None);
        assert!(parse_glb(&glb[..10]).is_err());
    }

    #[test]
    fn test_load_mesh_via_fs() {
        let mut fs = MemoryFs::new();
        fs.insert("/models/tri.glb", build_glb(None));

        let mesh = load_mesh(&fs, "/models/tri.glb").unwrap();
        assert_eq!(mesh.index_count(), 3);
    }

    #[test]
    fn test_load_mesh_missing_file() {
        let fs = MemoryFs::new();
        assert!(load_mesh(&fs, "/models/none.glb").is_err());
    }
}
