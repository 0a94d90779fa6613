//! Mirror Material

use photon_core::interaction::*;
use photon_core::material::*;
use photon_core::paramset::*;
use photon_core::reflection::*;
use photon_core::spectrum::*;

/// Implements a perfectly specular mirror.
#[derive(Clone, Debug)]
pub struct MirrorMaterial {
    /// Spectral reflectance.
    kr: Spectrum,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr` - Spectral reflectance.
    pub fn new(kr: Spectrum) -> Self {
        Self {
            kr: kr.clamp(0.0, 1.0),
        }
    }
}

impl Material for MirrorMaterial {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `si`   - The surface interaction at the intersection.
    /// * `mode` - Transport mode (ignored).
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, _mode: TransportMode) {
        let mut bsdf = BSDF::new(si, None);
        if !self.kr.is_black() {
            bsdf.add(SpecularReflection::new(self.kr, Fresnel::NoOp));
        }
        si.bsdf = Some(bsdf);
    }
}

impl From<&ParamSet> for MirrorMaterial {
    /// Create a mirror material from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let kr = params.find_one_spectrum("Kr", Spectrum::new(0.9));
        Self::new(kr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;
    use photon_core::geometry::*;

    #[test]
    fn mirror_reflects_about_normal() {
        let mut si = flat_interaction();
        MirrorMaterial::new(Spectrum::one()).compute_scattering_functions(&mut si, TransportMode::Radiance);
        let bsdf = si.bsdf.expect("bsdf");
        assert!(!bsdf.has_non_specular());

        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let sample = bsdf.sample_f(
            &wo,
            &Point2f::new(0.5, 0.5),
            0.5,
            BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR,
        );
        assert_eq!(sample.pdf, 1.0);
        assert!((sample.wi - Vector3f::new(-0.6, 0.0, 0.8)).length() < 1e-5);
        assert!(sample.bxdf_type.contains(BxDFType::BSDF_SPECULAR));
    }
}
