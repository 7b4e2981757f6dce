//! 4x4 matrix utilities
//!
//! Matrices are column-major (`m[column][row]`), matching both wgpu's
//! WGSL layout and the composition convention used throughout the engine:
//! `mul(a, b)` applies `b` first, then `a`, when transforming column vectors.

use crate::Vec3;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a point by a matrix (w = 1, perspective divide applied)
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    let x = m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0];
    let y = m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1];
    let z = m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2];
    let w = m[0][3] * p.x + m[1][3] * p.y + m[2][3] * p.z + m[3][3];
    if w.abs() > 1e-8 && (w - 1.0).abs() > 1e-8 {
        Vec3::new(x / w, y / w, z / w)
    } else {
        Vec3::new(x, y, z)
    }
}

/// Translation matrix
pub fn translation(t: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = t.x;
    m[3][1] = t.y;
    m[3][2] = t.z;
    m
}

/// Non-uniform scaling matrix
pub fn scaling(s: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = s.x;
    m[1][1] = s.y;
    m[2][2] = s.z;
    m
}

/// Transpose a matrix
pub fn transpose(m: Mat4) -> Mat4 {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}

/// Perspective projection matrix
///
/// Left-handed, +Z forward, depth range 0..1 (wgpu clip-space convention).
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y / 2.0).tan();
    let range = far / (far - near);

    let mut m = [[0.0f32; 4]; 4];
    m[0][0] = f / aspect;
    m[1][1] = f;
    m[2][2] = range;
    m[2][3] = 1.0;
    m[3][2] = -near * range;
    m
}

/// Determinant of a 4x4 matrix
pub fn determinant(m: Mat4) -> f32 {
    // Cofactor expansion over the first column, with 3x3 minors inlined
    let det3 = |a: f32, b: f32, c: f32, d: f32, e: f32, f: f32, g: f32, h: f32, i: f32| {
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    };

    let m00 = m[0][0];
    let m01 = m[0][1];
    let m02 = m[0][2];
    let m03 = m[0][3];

    m00 * det3(m[1][1], m[2][1], m[3][1], m[1][2], m[2][2], m[3][2], m[1][3], m[2][3], m[3][3])
        - m01 * det3(m[1][0], m[2][0], m[3][0], m[1][2], m[2][2], m[3][2], m[1][3], m[2][3], m[3][3])
        + m02 * det3(m[1][0], m[2][0], m[3][0], m[1][1], m[2][1], m[3][1], m[1][3], m[2][3], m[3][3])
        - m03 * det3(m[1][0], m[2][0], m[3][0], m[1][1], m[2][1], m[3][1], m[1][2], m[2][2], m[3][2])
}

/// Decompose a TRS matrix into translation, rotation matrix, and scale
///
/// Assumes positive scale and an orthogonal rotation part.
pub fn decompose(m: Mat4) -> (Vec3, Mat4, Vec3) {
    let position = Vec3::new(m[3][0], m[3][1], m[3][2]);
    let scale = Vec3::new(
        Vec3::new(m[0][0], m[0][1], m[0][2]).length(),
        Vec3::new(m[1][0], m[1][1], m[1][2]).length(),
        Vec3::new(m[2][0], m[2][1], m[2][2]).length(),
    );

    let mut rotation = IDENTITY;
    for col in 0..3 {
        let s = [scale.x, scale.y, scale.z][col];
        if s > 1e-8 {
            for row in 0..3 {
                rotation[col][row] = m[col][row] / s;
            }
        }
    }

    (position, rotation, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_identity_transform() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(transform_point(IDENTITY, p), p));
    }

    #[test]
    fn test_translation() {
        let m = translation(Vec3::new(1.0, 2.0, 3.0));
        let p = transform_point(m, Vec3::ZERO);
        assert!(vec_approx_eq(p, Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_scaling() {
        let m = scaling(Vec3::new(2.0, 3.0, 4.0));
        let p = transform_point(m, Vec3::ONE);
        assert!(vec_approx_eq(p, Vec3::new(2.0, 3.0, 4.0)));
    }

    #[test]
    fn test_mul_applies_right_first() {
        let t = translation(Vec3::new(10.0, 0.0, 0.0));
        let s = scaling(Vec3::splat(2.0));
        // mul(t, s): scale first, then translate
        let p = transform_point(mul(t, s), Vec3::ONE);
        assert!(vec_approx_eq(p, Vec3::new(12.0, 2.0, 2.0)));
        // mul(s, t): translate first, then scale
        let p = transform_point(mul(s, t), Vec3::ONE);
        assert!(vec_approx_eq(p, Vec3::new(22.0, 2.0, 2.0)));
    }

    #[test]
    fn test_transpose_involution() {
        let m = translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transpose(transpose(m)), m);
    }

    #[test]
    fn test_perspective_invertible_across_fov_range() {
        // Valid (non-degenerate) perspective for every FOV in (0, 180) degrees
        for deg in 1..180 {
            let fov = (deg as f32).to_radians();
            let proj = perspective(fov, 16.0 / 9.0, 0.1, 100.0);
            let det = determinant(proj);
            assert!(det.abs() > 1e-6, "degenerate projection at fov {} deg (det {})", deg, det);
        }
    }

    #[test]
    fn test_perspective_depth_range() {
        let proj = perspective(std::f32::consts::FRAC_PI_2, 1.0, 1.0, 100.0);
        // A point on the near plane maps to depth 0
        let near = transform_point(proj, Vec3::new(0.0, 0.0, 1.0));
        assert!(approx_eq(near.z, 0.0), "near depth {}", near.z);
        // A point on the far plane maps to depth 1
        let far = transform_point(proj, Vec3::new(0.0, 0.0, 100.0));
        assert!(approx_eq(far.z, 1.0), "far depth {}", far.z);
    }

    #[test]
    fn test_determinant_identity() {
        assert!(approx_eq(determinant(IDENTITY), 1.0));
    }

    #[test]
    fn test_determinant_scaling() {
        let m = scaling(Vec3::new(2.0, 3.0, 4.0));
        assert!(approx_eq(determinant(m), 24.0));
    }

    #[test]
    fn test_decompose_translation_and_scale() {
        let m = mul(translation(Vec3::new(5.0, -3.0, 2.0)), scaling(Vec3::new(2.0, 4.0, 0.5)));
        let (pos, rot, scale) = decompose(m);
        assert!(vec_approx_eq(pos, Vec3::new(5.0, -3.0, 2.0)));
        assert!(vec_approx_eq(scale, Vec3::new(2.0, 4.0, 0.5)));
        // Rotation part should be identity
        for col in 0..3 {
            for row in 0..3 {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert!(approx_eq(rot[col][row], expected));
            }
        }
    }
}
