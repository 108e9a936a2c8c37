// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform.
//!
//! Covers what the scene needs to hand a renderer its model, view and
//! projection matrices (identity, translation, axis rotations, a right-handed
//! perspective projection, multiply) without pulling in a full
//! linear-algebra crate.

use core::ops::Mul;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A column-major 4×4 transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// GPU APIs expect for uniform upload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a rotation around the X axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_x(radians: f64) -> Self {
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Y axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_y(radians: f64) -> Self {
        let (s, c) = (radians.sin(), radians.cos());
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates the Euler rotation `Rx * Ry` for angles `(x, y, 0)`.
    ///
    /// This is the `XYZ` composition order scene-graph objects use, so the
    /// Y rotation is applied to a point first.
    #[inline]
    #[must_use]
    pub fn from_euler_xy(x: f64, y: f64) -> Self {
        Self::from_rotation_x(x) * Self::from_rotation_y(y)
    }

    /// Creates a right-handed perspective projection mapping depth to
    /// `[-1, 1]` clip space.
    ///
    /// `fov_y` is the vertical field of view in radians. The caller is
    /// responsible for passing a positive finite `aspect` and `0 < near < far`.
    #[must_use]
    pub fn perspective(fov_y: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fov_y * 0.5).tan();
        let range_inv = 1.0 / (near - far);
        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, (near + far) * range_inv, -1.0],
                [0.0, 0.0, 2.0 * near * far * range_inv, 0.0],
            ],
        }
    }

    /// Returns the matrix as 16 column-major `f32` values for uniform upload.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "GPU uniforms are single precision"
    )]
    pub fn to_cols_array_f32(self) -> [f32; 16] {
        let mut out = [0.0_f32; 16];
        for (i, v) in self.cols.iter().flatten().enumerate() {
            out[i] = *v as f32;
        }
        out
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for (j, col) in out.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    const EPS: f64 = 1e-9;

    fn apply(t: Transform3d, p: [f64; 3]) -> [f64; 3] {
        let c = t.cols;
        let mut out = [0.0; 3];
        for (i, v) in out.iter_mut().enumerate() {
            *v = c[0][i] * p[0] + c[1][i] * p[1] + c[2][i] * p[2] + c[3][i];
        }
        out
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn identity_multiply() {
        let t = Transform3d::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Transform3d::IDENTITY * t, t);
        assert_eq!(t * Transform3d::IDENTITY, t);
    }

    #[test]
    fn rotation_y_quarter_turn_maps_x_to_negative_z() {
        let p = apply(Transform3d::from_rotation_y(FRAC_PI_2), [1.0, 0.0, 0.0]);
        assert!(p[0].abs() < EPS);
        assert!((p[2] + 1.0).abs() < EPS, "got {p:?}");
    }

    #[test]
    fn rotation_x_quarter_turn_maps_y_to_z() {
        let p = apply(Transform3d::from_rotation_x(FRAC_PI_2), [0.0, 1.0, 0.0]);
        assert!(p[1].abs() < EPS);
        assert!((p[2] - 1.0).abs() < EPS, "got {p:?}");
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_clip_bounds() {
        let proj = Transform3d::perspective(FRAC_PI_2, 1.0, 0.1, 100.0);
        let c = proj.cols;
        for (z, expected) in [(-0.1, -1.0), (-100.0, 1.0)] {
            let clip_z = c[2][2] * z + c[3][2];
            let clip_w = c[2][3] * z;
            assert!((clip_z / clip_w - expected).abs() < 1e-6);
        }
        assert!(proj.is_finite());
    }

    #[test]
    fn f32_export_is_column_major() {
        let t = Transform3d::from_translation(5.0, 6.0, 7.0);
        let arr = t.to_cols_array_f32();
        assert_eq!(&arr[12..16], &[5.0, 6.0, 7.0, 1.0]);
    }

    #[test]
    fn infinity_detected() {
        let mut t = Transform3d::IDENTITY;
        t.cols[0][3] = f64::INFINITY;
        assert!(!t.is_finite());
    }
}
