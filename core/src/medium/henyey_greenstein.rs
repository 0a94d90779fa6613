//! Henyey-Greenstein

use crate::geometry::*;
use crate::pbrt::*;

/// Henyey-Greenstein phase function.
#[derive(Copy, Clone, Debug)]
pub struct HenyeyGreenstein {
    /// The asymmetry parameter. It is the average value of the product of the
    /// phase function being approximated and the cosine of the angle between two
    /// directions. Isotropic phase functions use g = 0.
    pub g: Float,
}

impl HenyeyGreenstein {
    /// Returns a new `HenyeyGreenstein`.
    ///
    /// * `g` - The asymmetry parameter.
    pub fn new(g: Float) -> Self {
        Self {
            g: clamp(g, -0.99, 0.99),
        }
    }

    /// Returns the value of the phase function for the given pair of directions.
    ///
    /// * `w`  - First direction.
    /// * `wp` - Second direction.
    pub fn p(&self, w: &Vector3f, wp: &Vector3f) -> Float {
        phase_hg(w.dot(wp), self.g)
    }
}

/// Computes the Henyey-Greenstein phase function. Positive `g` favours
/// `cos_theta` close to 1.
///
/// * `cos_theta` - Cosine of the angle between two direction vectors.
/// * `g`         - Asymmetry parameter.
#[inline]
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g - 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * denom.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn isotropic_phase_is_constant() {
        for cos_theta in [-1.0, -0.3, 0.0, 0.5, 1.0] {
            assert!(approx_eq!(Float, phase_hg(cos_theta, 0.0), INV_FOUR_PI, epsilon = 1e-6));
        }
    }

    #[test]
    fn forward_scattering_peaks_forward() {
        assert!(phase_hg(1.0, 0.7) > phase_hg(-1.0, 0.7));
        assert!(phase_hg(-1.0, -0.7) > phase_hg(1.0, -0.7));
    }

    #[test]
    fn phase_integrates_to_one() {
        let g = 0.45;
        let n = 20000;
        let d_cos = 2.0 / n as Float;
        let integral: Float = (0..n)
            .map(|i| {
                let cos_theta = -1.0 + (i as Float + 0.5) * d_cos;
                phase_hg(cos_theta, g) * TWO_PI * d_cos
            })
            .sum();
        assert!(approx_eq!(Float, integral, 1.0, epsilon = 1e-3));
    }
}
