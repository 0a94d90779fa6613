//! Translucent Material

use photon_core::interaction::*;
use photon_core::material::*;
use photon_core::paramset::*;
use photon_core::reflection::*;
use photon_core::spectrum::*;

/// Implements a thin diffuse surface that scatters light into both
/// hemispheres.
#[derive(Clone, Debug)]
pub struct TranslucentMaterial {
    /// Spectral diffuse coefficient.
    kd: Spectrum,

    /// Fraction of diffusely scattered light that is reflected.
    reflect: Spectrum,

    /// Fraction of diffusely scattered light that is transmitted.
    transmit: Spectrum,
}

impl TranslucentMaterial {
    /// Create a new `TranslucentMaterial`.
    ///
    /// * `kd`       - Spectral diffuse coefficient.
    /// * `reflect`  - Fraction of diffusely scattered light that is reflected.
    /// * `transmit` - Fraction of diffusely scattered light that is transmitted.
    pub fn new(kd: Spectrum, reflect: Spectrum, transmit: Spectrum) -> Self {
        Self {
            kd: kd.clamp(0.0, 1.0),
            reflect: reflect.clamp(0.0, 1.0),
            transmit: transmit.clamp(0.0, 1.0),
        }
    }
}

impl Material for TranslucentMaterial {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `si`   - The surface interaction at the intersection.
    /// * `mode` - Transport mode (ignored).
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, _mode: TransportMode) {
        let mut bsdf = BSDF::new(si, None);
        let r = self.kd * self.reflect;
        let t = self.kd * self.transmit;
        if !r.is_black() {
            bsdf.add(LambertianReflection::new(r));
        }
        if !t.is_black() {
            bsdf.add(LambertianTransmission::new(t));
        }
        si.bsdf = Some(bsdf);
    }
}

impl From<&ParamSet> for TranslucentMaterial {
    /// Create a translucent material from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let kd = params.find_one_spectrum("Kd", Spectrum::new(0.25));
        let reflect = params.find_one_spectrum("reflect", Spectrum::new(0.5));
        let transmit = params.find_one_spectrum("transmit", Spectrum::new(0.5));
        Self::new(kd, reflect, transmit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use float_cmp::*;
    use photon_core::geometry::*;
    use photon_core::pbrt::*;

    #[test]
    fn reflectance_splits_between_hemispheres() {
        let mut si = flat_interaction();
        TranslucentMaterial::new(Spectrum::new(0.8), Spectrum::new(0.25), Spectrum::new(0.75))
            .compute_scattering_functions(&mut si, TransportMode::Radiance);
        let bsdf = si.bsdf.expect("bsdf");

        let u = [Point2f::new(0.5, 0.5)];
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let rho_r = bsdf.rho_hd(&wo, &u, BxDFType::BSDF_ALL_REFLECTION);
        let rho_t = bsdf.rho_hd(&wo, &u, BxDFType::BSDF_ALL_TRANSMISSION);
        assert!(approx_eq!(Float, rho_r[0], 0.2, epsilon = 1e-5));
        assert!(approx_eq!(Float, rho_t[0], 0.6, epsilon = 1e-5));
    }
}
