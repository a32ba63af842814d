#![warn(missing_docs)]

//! Math types for the crease fold engine.
//!
//! Thin wrappers around nalgebra: points and vectors for the flat sheet
//! and the folded 3D frame, a rigid 4x4 transform used for per-segment
//! placement, and tolerance constants.

use nalgebra::{Matrix3, Matrix4, Unit, Vector2, Vector3, Vector4};

/// A point in the folded 3D frame.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point on the flat sheet (sheet-local millimeters).
pub type Point2 = nalgebra::Point2<f64>;

/// A vector on the flat sheet.
pub type Vec2 = Vector2<f64>;

/// A 4x4 affine transformation matrix.
///
/// Fold transforms are always rigid (rotation + translation); the builders
/// only ever compose the constructors below.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians (+Y toward +Z).
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians (+Z toward +X).
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about an arbitrary axis through the origin by `angle` radians.
    ///
    /// Uses Rodrigues' rotation formula.
    pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
        let mut m = Matrix4::identity();
        m[(0, 0)] = t * x * x + c;
        m[(0, 1)] = t * x * y - s * z;
        m[(0, 2)] = t * x * z + s * y;
        m[(1, 0)] = t * x * y + s * z;
        m[(1, 1)] = t * y * y + c;
        m[(1, 2)] = t * y * z - s * x;
        m[(2, 0)] = t * x * z - s * y;
        m[(2, 1)] = t * y * z + s * x;
        m[(2, 2)] = t * z * z + c;
        Self { matrix: m }
    }

    /// Rotation about the line through `point` along `axis`.
    ///
    /// Composed as translate-to-origin, rotate, translate back.
    pub fn rotation_about_line(point: &Point3, axis: &Dir3, angle: f64) -> Self {
        let to_origin = Transform::translation(-point.x, -point.y, -point.z);
        let back = Transform::translation(point.x, point.y, point.z);
        back.then(&Transform::rotation_about_axis(axis, angle))
            .then(&to_origin)
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The product applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a flat-sheet point lying in the z = 0 plane.
    pub fn apply_flat(&self, p: &Point2) -> Point3 {
        self.apply_point(&Point3::new(p.x, p.y, 0.0))
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Check that the upper-left 3x3 block is orthonormal with determinant +1.
    pub fn is_rigid(&self, tol: f64) -> bool {
        let r: Matrix3<f64> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let should_be_identity = r.transpose() * r;
        let off = (should_be_identity - Matrix3::identity()).abs().max();
        off < tol && (r.determinant() - 1.0).abs() < tol
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 mm linear, 1e-9 rad angular).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-9,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

    #[test]
    fn test_rotation_x_lifts_y_into_z() {
        let t = Transform::rotation_x(FRAC_PI_2);
        let result = t.apply_point(&Point3::new(0.0, 1.0, 0.0));
        assert!(result.y.abs() < 1e-12);
        assert_relative_eq!(result.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_translation_then_rotation() {
        // rotate first, then translate
        let t = Transform::translation(0.0, 100.0, 0.0).then(&Transform::rotation_x(FRAC_PI_6));
        let p = t.apply_point(&Point3::new(0.0, 100.0, 0.0));
        assert_relative_eq!(p.y, 100.0 + 100.0 * FRAC_PI_6.cos(), epsilon = 1e-9);
        assert_relative_eq!(p.z, 100.0 * FRAC_PI_6.sin(), epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_about_line_fixes_points_on_line() {
        let origin = Point3::new(10.0, 20.0, 0.0);
        let axis = Dir3::new_normalize(Vec3::new(1.0, 1.0, 0.0));
        let t = Transform::rotation_about_line(&origin, &axis, 0.7);

        let on_line = Point3::new(15.0, 25.0, 0.0);
        assert!(Tolerance::DEFAULT.points_equal(&t.apply_point(&on_line), &on_line));

        let off_line = Point3::new(10.0, 30.0, 0.0);
        let moved = t.apply_point(&off_line);
        assert!(moved.z.abs() > 1.0);
        // distance to the axis is preserved
        let d_before = (off_line - origin).cross(axis.as_ref()).norm();
        let d_after = (moved - origin).cross(axis.as_ref()).norm();
        assert_relative_eq!(d_before, d_after, epsilon = 1e-9);
    }

    #[test]
    fn test_inverse() {
        let t = Transform::translation(1.0, 2.0, 3.0).then(&Transform::rotation_y(0.4));
        let inv = t.inverse().unwrap();
        let p = Point3::new(5.0, 6.0, 7.0);
        let result = inv.apply_point(&t.apply_point(&p));
        assert!((result - p).norm() < 1e-12);
    }

    #[test]
    fn test_is_rigid() {
        let axis = Dir3::new_normalize(Vec3::new(0.3, -1.0, 0.2));
        let t = Transform::rotation_about_line(&Point3::new(4.0, 5.0, 6.0), &axis, 1.1)
            .then(&Transform::rotation_x(-0.5));
        assert!(t.is_rigid(1e-9));

        let mut scaled = Transform::identity();
        scaled.matrix[(0, 0)] = 2.0;
        assert!(!scaled.is_rigid(1e-9));
    }

    #[test]
    fn test_apply_vec_ignores_translation() {
        let t = Transform::translation(9.0, 9.0, 9.0);
        let v = t.apply_vec(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v.x, 1.0);
        assert_relative_eq!(v.y, 0.0);
    }
}
