//! Rotation as a unit quaternion
//!
//! Euler angle conversions use degrees and the Y·X·Z application order
//! (yaw around Y, then pitch around X, then roll around Z), which matches
//! the editing convention exposed by [`to_euler_deg`](Quat::to_euler_deg).

use serde::{Serialize, Deserialize};
use crate::{Vec3, Mat4};
use crate::mat4;

/// A rotation stored as a unit quaternion (x, y, z, w)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    /// Create a quaternion from raw components
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around a unit axis
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half = angle * 0.5;
        let s = half.sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Build a rotation from Euler angles in degrees (pitch X, yaw Y, roll Z)
    ///
    /// Applied in Y·X·Z order: roll first, then pitch, then yaw.
    pub fn from_euler_deg(angles: Vec3) -> Self {
        let qx = Self::from_axis_angle(Vec3::X, angles.x.to_radians());
        let qy = Self::from_axis_angle(Vec3::Y, angles.y.to_radians());
        let qz = Self::from_axis_angle(Vec3::Z, angles.z.to_radians());
        qy.mul(qx).mul(qz).normalized()
    }

    /// Extract Euler angles in degrees (pitch X, yaw Y, roll Z)
    ///
    /// Inverse of [`from_euler_deg`](Self::from_euler_deg) up to angle wrapping.
    pub fn to_euler_deg(self) -> Vec3 {
        let m = self.to_matrix();
        // Column-major: m[col][row]. For R = Ry * Rx * Rz:
        //   m[2][1] = -sin(x)
        //   m[2][0] = sin(y)cos(x),  m[2][2] = cos(y)cos(x)
        //   m[0][1] = cos(x)sin(z),  m[1][1] = cos(x)cos(z)
        let sx = (-m[2][1]).clamp(-1.0, 1.0);
        let x = sx.asin();
        let (y, z) = if sx.abs() < 0.9999 {
            (m[2][0].atan2(m[2][2]), m[0][1].atan2(m[1][1]))
        } else {
            // Gimbal lock: pitch at +-90 degrees, fold roll into yaw
            ((-m[0][2]).atan2(m[0][0]), 0.0)
        };
        Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Hamilton product: the result applies `rhs` first, then `self`
    pub fn mul(self, rhs: Self) -> Self {
        Self {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }

    /// Conjugate (the inverse rotation for a unit quaternion)
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Normalize to unit length
    pub fn normalized(self) -> Self {
        let len = (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt();
        if len > 0.0 {
            let inv = 1.0 / len;
            Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }

    /// Expand to a 4x4 rotation matrix (column-major)
    pub fn to_matrix(self) -> Mat4 {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, yy, zz) = (x * x2, y * y2, z * z2);
        let (xy, xz, yz) = (x * y2, x * z2, y * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        let mut m = mat4::IDENTITY;
        m[0][0] = 1.0 - (yy + zz);
        m[0][1] = xy + wz;
        m[0][2] = xz - wy;
        m[1][0] = xy - wz;
        m[1][1] = 1.0 - (xx + zz);
        m[1][2] = yz + wx;
        m[2][0] = xz + wy;
        m[2][1] = yz - wx;
        m[2][2] = 1.0 - (xx + yy);
        m
    }
}
