//! Shading coordinate system helpers.
//!
//! Directions are expressed in the local frame where the shading normal is
//! the z-axis.

use crate::geometry::*;
use crate::pbrt::*;

/// Returns cos(θ) for a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline(always)]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns |cos(θ)| for a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline(always)]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns true if both directions lie in the same hemisphere.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline(always)]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Reflects a direction about a normal.
///
/// * `wo` - The outgoing direction.
/// * `n`  - The normal.
#[inline(always)]
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -*wo + *n * (2.0 * wo.dot(n))
}

/// Refracts a direction through an interface with relative index of
/// refraction `eta`. Returns `None` on total internal reflection.
///
/// * `wi`  - The incident direction.
/// * `n`   - The normal in the same hemisphere as `wi`.
/// * `eta` - Ratio of indices of refraction (incident over transmitted).
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    // Compute cos(θt) using Snell's law.
    let cos_theta_i = n.dot(wi);
    let sin2_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin2_theta_t = eta * eta * sin2_theta_i;

    // Handle total internal reflection for transmission.
    if sin2_theta_t >= 1.0 {
        return None;
    }

    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some(-*wi * eta + Vector3f::from(*n) * (eta * cos_theta_i - cos_theta_t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn reflect_about_z() {
        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let wi = reflect(&wo, &Vector3f::new(0.0, 0.0, 1.0));
        assert!(approx_eq!(Float, wi.x, -0.6, epsilon = 1e-6));
        assert!(approx_eq!(Float, wi.z, 0.8, epsilon = 1e-6));
    }

    #[test]
    fn refract_straight_through() {
        let wi = Vector3f::new(0.0, 0.0, 1.0);
        let wt = refract(&wi, &Normal3f::new(0.0, 0.0, 1.0), 1.0 / 1.5).unwrap();
        assert!(approx_eq!(Float, wt.z, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn total_internal_reflection() {
        let wi = Vector3f::new(0.9, 0.0, (1.0 - 0.81 as Float).sqrt());
        assert!(refract(&wi, &Normal3f::new(0.0, 0.0, 1.0), 1.5).is_none());
    }
}
