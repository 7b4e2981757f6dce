//! Material assets

use std::sync::Arc;
use crate::asset::{AssetError, Shader, ShaderStage};

/// A material: the shader pair defining a GPU pipeline
///
/// The render layer turns a material into an actual graphics pipeline;
/// this type only validates and carries the shader references.
pub struct Material {
    label: String,
    vertex: Arc<Shader>,
    fragment: Arc<Shader>,
}

impl Material {
    /// Create a material from a vertex and fragment shader
    pub fn new(
        label: impl Into<String>,
        vertex: Arc<Shader>,
        fragment: Arc<Shader>,
    ) -> Result<Self, AssetError> {
        if vertex.stage() != ShaderStage::Vertex {
            return Err(AssetError::InvalidAsset(
                "material vertex slot requires a vertex-stage shader".to_string(),
            ));
        }
        if fragment.stage() != ShaderStage::Fragment {
            return Err(AssetError::InvalidAsset(
                "material fragment slot requires a fragment-stage shader".to_string(),
            ));
        }
        Ok(Self {
            label: label.into(),
            vertex,
            fragment,
        })
    }

    /// Debug label of this material
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The vertex-stage shader
    pub fn vertex(&self) -> &Shader {
        &self.vertex
    }

    /// The fragment-stage shader
    pub fn fragment(&self) -> &Shader {
        &self.fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader(stage: ShaderStage) -> Arc<Shader> {
        Arc::new(Shader::new(stage, b"// source".to_vec()))
    }

    #[test]
    fn test_material_new() {
        let mat = Material::new(
            "forward",
            shader(ShaderStage::Vertex),
            shader(ShaderStage::Fragment),
        )
        .unwrap();
        assert_eq!(mat.label(), "forward");
    }

    #[test]
    fn test_material_rejects_swapped_stages() {
        let result = Material::new(
            "bad",
            shader(ShaderStage::Fragment),
            shader(ShaderStage::Vertex),
        );
        assert!(matches!(result, Err(AssetError::InvalidAsset(_))));
    }
}
