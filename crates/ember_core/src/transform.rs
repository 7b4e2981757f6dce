//! Transform (position, rotation, scale)
//!
//! Rotation is stored twice: as Euler angles in degrees for editing, and as
//! a composed quaternion for matrix math. The typed setters keep the two in
//! sync; direct mutation through [`Transform::raw_mut`] bypasses that
//! bookkeeping and callers must not expect [`Transform::angles`] to reflect
//! such changes until [`Transform::sync_angles`] runs.

use std::cell::RefCell;
use std::rc::Rc;
use ember_math::{mat4, Mat4, Quat, Vec3};
use serde::{Serialize, Deserialize};

/// The underlying position/rotation/scale of a [`Transform`]
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawTransform {
    /// Position in world space
    pub position: Vec3,
    /// Composed rotation
    pub rotation: Quat,
    /// Non-uniform scale
    pub scale: Vec3,
}

impl Default for RawTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// A transform with editing-friendly Euler angles and matrix composition
#[derive(Clone, Copy, Debug, Default)]
pub struct Transform {
    raw: RawTransform,
    /// Euler angles in degrees, cached alongside the quaternion
    angles: Vec3,
}

/// Shared single-threaded handle to a transform
///
/// Scene objects own their transform through this handle so the script
/// host can hold weak foreign references to it; dropping the owner
/// invalidates those references.
pub type TransformRef = Rc<RefCell<Transform>>;

impl Transform {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        let mut t = Self::identity();
        t.raw.position = position;
        t
    }

    /// Wrap this transform in a shared handle
    pub fn into_ref(self) -> TransformRef {
        Rc::new(RefCell::new(self))
    }

    /// Set the position
    pub fn set_position(&mut self, position: Vec3) {
        self.raw.position = position;
    }

    /// Get the position
    pub fn position(&self) -> Vec3 {
        self.raw.position
    }

    /// Set the scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.raw.scale = scale;
    }

    /// Get the scale
    pub fn scale(&self) -> Vec3 {
        self.raw.scale
    }

    /// Set the Euler angles in degrees, updating the composed rotation
    pub fn set_angles(&mut self, angles: Vec3) {
        self.angles = angles;
        self.raw.rotation = Quat::from_euler_deg(angles);
    }

    /// Get the Euler angles in degrees
    pub fn angles(&self) -> Vec3 {
        self.angles
    }

    /// Get the composed rotation
    pub fn rotation(&self) -> Quat {
        self.raw.rotation
    }

    /// Direct access to the underlying struct
    pub fn raw(&self) -> &RawTransform {
        &self.raw
    }

    /// Direct mutable access, bypassing angle bookkeeping
    pub fn raw_mut(&mut self) -> &mut RawTransform {
        &mut self.raw
    }

    /// Recompute the cached Euler angles from the composed rotation
    ///
    /// Required after mutating the rotation through [`raw_mut`](Self::raw_mut).
    pub fn sync_angles(&mut self) {
        self.angles = self.raw.rotation.to_euler_deg();
    }

    /// Scale-rotate-translate composition, used (inverted) as a view matrix
    ///
    /// Applies the negated translation first, then the (optionally inverted)
    /// rotation, then scale. With `invert_rotation` and unit scale this is
    /// the inverse of [`to_trs`](Self::to_trs) without inversion.
    pub fn to_srt(&self, invert_rotation: bool) -> Mat4 {
        let rotation = if invert_rotation {
            self.raw.rotation.conjugate()
        } else {
            self.raw.rotation
        };
        mat4::mul(
            mat4::mul(mat4::scaling(self.raw.scale), rotation.to_matrix()),
            mat4::translation(-self.raw.position),
        )
    }

    /// Translate-rotate-scale composition, used as an object model matrix
    pub fn to_trs(&self, invert_rotation: bool) -> Mat4 {
        let rotation = if invert_rotation {
            self.raw.rotation.conjugate()
        } else {
            self.raw.rotation
        };
        mat4::mul(
            mat4::mul(mat4::translation(self.raw.position), rotation.to_matrix()),
            mat4::scaling(self.raw.scale),
        )
    }
}
