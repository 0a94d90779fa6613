//! Glass Material

use photon_core::interaction::*;
use photon_core::material::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::reflection::*;
use photon_core::spectrum::*;

/// Implements perfect specular reflection and transmission, weighted by
/// Fresnel terms.
#[derive(Clone, Debug)]
pub struct GlassMaterial {
    /// Spectral reflectance.
    kr: Spectrum,

    /// Spectral transmittance.
    kt: Spectrum,

    /// Index of refraction of the inside of the object.
    eta: Float,
}

impl GlassMaterial {
    /// Create a new `GlassMaterial`.
    ///
    /// * `kr`  - Spectral reflectance.
    /// * `kt`  - Spectral transmittance.
    /// * `eta` - Index of refraction of the inside of the object.
    pub fn new(kr: Spectrum, kt: Spectrum, eta: Float) -> Self {
        Self {
            kr: kr.clamp(0.0, 1.0),
            kt: kt.clamp(0.0, 1.0),
            eta,
        }
    }
}

impl Material for GlassMaterial {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface.
    ///
    /// * `si`   - The surface interaction at the intersection.
    /// * `mode` - Transport mode.
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, mode: TransportMode) {
        let mut bsdf = BSDF::new(si, Some(self.eta));
        if !self.kr.is_black() {
            bsdf.add(SpecularReflection::new(
                self.kr,
                FresnelDielectric::new(1.0, self.eta),
            ));
        }
        if !self.kt.is_black() {
            bsdf.add(SpecularTransmission::new(self.kt, 1.0, self.eta, mode));
        }
        si.bsdf = Some(bsdf);
    }
}

impl From<&ParamSet> for GlassMaterial {
    /// Create a glass material from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let kr = params.find_one_spectrum("Kr", Spectrum::one());
        let kt = params.find_one_spectrum("Kt", Spectrum::one());
        let mut eta = params.find_one_float("index", 1.5);
        if eta <= 0.0 {
            warn!("Glass index {} must be positive. Using 1.5.", eta);
            eta = 1.5;
        }
        Self::new(kr, kt, eta)
    }
}
