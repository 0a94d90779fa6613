//! Common geometry traits and functions.

use super::*;
use crate::pbrt::*;

/// Dot product.
pub trait Dot<V> {
    /// Returns the dot product with another vector/normal.
    ///
    /// * `other` - The other vector/normal.
    fn dot(&self, other: &V) -> Float;

    /// Returns the absolute value of the dot product.
    ///
    /// * `other` - The other vector/normal.
    fn abs_dot(&self, other: &V) -> Float {
        abs(self.dot(other))
    }
}

/// Cross product.
pub trait Cross<V> {
    /// Returns the cross product with another vector/normal.
    ///
    /// * `other` - The other vector/normal.
    fn cross(&self, other: &V) -> Vector3f;
}

/// Flips a vector/normal so it lies in the same hemisphere as another one.
pub trait FaceForward<V>: Dot<V> + std::ops::Neg<Output = Self> + Copy + Sized {
    /// Returns `self` flipped so that its dot product with `v` is non-negative.
    ///
    /// * `v` - The reference vector/normal.
    fn face_forward(&self, v: &V) -> Self {
        if self.dot(v) < 0.0 {
            -*self
        } else {
            *self
        }
    }
}

impl FaceForward<Vector3f> for Normal3f {}
impl FaceForward<Normal3f> for Normal3f {}
impl FaceForward<Vector3f> for Vector3f {}
impl FaceForward<Normal3f> for Vector3f {}

/// Constructs a local coordinate system given a unit vector and returns the
/// two remaining axes.
///
/// * `v1` - The first (normalized) axis.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if abs(v1.x) > abs(v1.y) {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3 = v1.cross(&v2);
    (v2, v3)
}

/// Returns a direction from spherical coordinates expressed in the given
/// coordinate frame.
///
/// * `sin_theta` - Sine of polar angle.
/// * `cos_theta` - Cosine of polar angle.
/// * `phi`       - Azimuthal angle.
/// * `x`         - X-axis of the frame.
/// * `y`         - Y-axis of the frame.
/// * `z`         - Z-axis of the frame.
pub fn spherical_direction_in_coord_frame(
    sin_theta: Float,
    cos_theta: Float,
    phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    *x * (sin_theta * phi.cos()) + *y * (sin_theta * phi.sin()) + *z * cos_theta
}

/// Returns the error bound for adding n terms.
///
/// * `n` - Number of terms
#[inline(always)]
pub fn gamma(n: Int) -> Float {
    (n as Float * MACHINE_EPSILON) / (1.0 - n as Float * MACHINE_EPSILON)
}
