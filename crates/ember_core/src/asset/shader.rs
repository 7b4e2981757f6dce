//! Shader assets
//!
//! A loaded shader is an opaque byte blob tagged with its pipeline stage.
//! Compilation happens in the render layer; this type only carries the
//! bytes from the file-system boundary to the material.

use std::sync::Arc;
use crate::asset::AssetError;
use crate::fs::FileSystem;

/// Pipeline stage a shader belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// An opaque shader blob tagged with its stage
pub struct Shader {
    stage: ShaderStage,
    bytes: Vec<u8>,
}

impl Shader {
    /// Create a shader from raw bytes
    pub fn new(stage: ShaderStage, bytes: Vec<u8>) -> Self {
        Self { stage, bytes }
    }

    /// The stage this shader is for
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The raw shader bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The shader source as UTF-8 text (WGSL)
    pub fn source_str(&self) -> Result<&str, AssetError> {
        std::str::from_utf8(&self.bytes)
            .map_err(|e| AssetError::Parse(format!("shader source is not UTF-8: {}", e)))
    }
}

/// Load a shader blob through the file-system boundary
pub fn load_shader(
    fs: &dyn FileSystem,
    path: &str,
    stage: ShaderStage,
) -> Result<Arc<Shader>, AssetError> {
    let bytes = fs.read(path)?;
    log::info!("loaded shader: {} ({} bytes)", path, bytes.len());
    Ok(Arc::new(Shader::new(stage, bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;

    #[test]
    fn test_shader_source_str() {
        let shader = Shader::new(ShaderStage::Vertex, b"fn vs_main() {}".to_vec());
        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(shader.source_str().unwrap(), "fn vs_main() {}");
    }

    #[test]
    fn test_shader_invalid_utf8() {
        let shader = Shader::new(ShaderStage::Fragment, vec![0xff, 0xfe, 0x00]);
        assert!(shader.source_str().is_err());
    }

    #[test]
    fn test_load_shader() {
        let mut fs = MemoryFs::new();
        fs.insert("/shaders/forward.wgsl", b"// wgsl".to_vec());

        let shader = load_shader(&fs, "/shaders/forward.wgsl", ShaderStage::Vertex).unwrap();
        assert_eq!(shader.bytes(), b"// wgsl");
    }

    #[test]
    fn test_load_shader_missing() {
        let fs = MemoryFs::new();
        assert!(load_shader(&fs, "/missing.wgsl", ShaderStage::Vertex).is_err());
    }
}
