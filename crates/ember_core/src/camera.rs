//! Camera with field of view and on-demand projection matrix

use ember_math::{mat4, Mat4};
use crate::transform::{Transform, TransformRef};

/// The scene camera
///
/// Holds a transform plus perspective parameters. The FOV is not clamped
/// here: validation is the caller's responsibility (interactive UIs keep
/// it inside (1, 179) degrees).
pub struct Camera {
    transform: TransformRef,
    fov_deg: f32,
    near: f32,
    far: f32,
    aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Create a camera with a 60 degree FOV at the origin
    pub fn new() -> Self {
        Self {
            transform: Transform::identity().into_ref(),
            fov_deg: 60.0,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }

    /// Borrow the camera transform
    pub fn transform(&self) -> std::cell::Ref<'_, Transform> {
        self.transform.borrow()
    }

    /// Mutably borrow the camera transform
    pub fn transform_mut(&self) -> std::cell::RefMut<'_, Transform> {
        self.transform.borrow_mut()
    }

    /// The shared transform handle
    pub fn transform_ref(&self) -> &TransformRef {
        &self.transform
    }

    /// Field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov_deg
    }

    /// Set the field of view in degrees (no clamping)
    pub fn set_fov(&mut self, fov_deg: f32) {
        self.fov_deg = fov_deg;
    }

    /// Near clip distance
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clip distance
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the clip planes
    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
    }

    /// Update the viewport aspect ratio (width / height)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Viewport aspect ratio
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Compute the perspective projection matrix from FOV and aspect
    pub fn projection_matrix(&self) -> Mat4 {
        mat4::perspective(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    /// Compute the view matrix from the camera transform
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.borrow().to_srt(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Vec3;

    #[test]
    fn test_default_fov() {
        let camera = Camera::new();
        assert_eq!(camera.fov(), 60.0);
    }

    #[test]
    fn test_set_fov_no_clamping() {
        let mut camera = Camera::new();
        camera.set_fov(179.5);
        assert_eq!(camera.fov(), 179.5);
        camera.set_fov(0.5);
        assert_eq!(camera.fov(), 0.5);
    }

    #[test]
    fn test_projection_valid_across_fov_range() {
        let mut camera = Camera::new();
        for deg in 1..180 {
            camera.set_fov(deg as f32);
            let proj = camera.projection_matrix();
            assert!(mat4::determinant(proj).abs() > 1e-6, "degenerate at {} deg", deg);
        }
    }

    #[test]
    fn test_projection_tracks_aspect() {
        let mut camera = Camera::new();
        camera.set_aspect(2.0);
        let wide = camera.projection_matrix();
        camera.set_aspect(1.0);
        let square = camera.projection_matrix();
        assert!(wide[0][0] < square[0][0]);
    }

    #[test]
    fn test_view_matrix_uses_transform() {
        let camera = Camera::new();
        camera.transform_mut().set_position(Vec3::new(0.0, 0.0, -10.0));

        let view = camera.view_matrix();
        let origin = mat4::transform_point(view, Vec3::ZERO);
        assert!((origin.z - 10.0).abs() < 0.001);
    }
}
