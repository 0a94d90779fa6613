//! Matte Material

use photon_core::interaction::*;
use photon_core::material::*;
use photon_core::paramset::*;
use photon_core::reflection::*;
use photon_core::spectrum::*;

/// Implements purely diffuse surfaces.
#[derive(Clone, Debug)]
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: Spectrum,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd` - Spectral diffuse reflection.
    pub fn new(kd: Spectrum) -> Self {
        Self {
            kd: kd.clamp(0.0, 1.0),
        }
    }
}

impl Material for MatteMaterial {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `si`   - The surface interaction at the intersection.
    /// * `mode` - Transport mode (ignored).
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, _mode: TransportMode) {
        let mut bsdf = BSDF::new(si, None);
        if !self.kd.is_black() {
            bsdf.add(LambertianReflection::new(self.kd));
        }
        si.bsdf = Some(bsdf);
    }
}

impl From<&ParamSet> for MatteMaterial {
    /// Create a matte material from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let kd = params.find_one_spectrum("Kd", Spectrum::new(0.5));
        Self::new(kd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[test]
    fn matte_is_diffuse_only() {
        let mut si = flat_interaction();
        MatteMaterial::new(Spectrum::new(0.8)).compute_scattering_functions(&mut si, TransportMode::Radiance);
        let bsdf = si.bsdf.expect("bsdf");
        assert!(bsdf.has_non_specular());
        assert_eq!(bsdf.num_components(BxDFType::BSDF_ALL), 1);
        assert_eq!(bsdf.num_components(BxDFType::BSDF_ALL_REFLECTION), 1);
    }

    #[test]
    fn black_matte_has_no_lobes() {
        let mut si = flat_interaction();
        MatteMaterial::new(Spectrum::zero()).compute_scattering_functions(&mut si, TransportMode::Radiance);
        let bsdf = si.bsdf.expect("bsdf");
        assert!(!bsdf.has_non_specular());
    }
}
