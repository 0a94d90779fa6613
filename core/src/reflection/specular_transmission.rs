//! Specular Transmission

use super::*;
use crate::material::*;

/// BTDF for physically plausible specular transmission using Fresnel interface.
#[derive(Clone, Debug)]
pub struct SpecularTransmission {
    /// BxDF type.
    bxdf_type: BxDFType,

    /// Spectrum used to scale the transmitted colour.
    t: Spectrum,

    /// Index of refraction above the surface (same side as surface normal).
    eta_a: Float,

    /// Index of refraction below the surface (opposite side as surface normal).
    eta_b: Float,

    /// Fresnel interface.
    fresnel: Fresnel,

    /// Indicates whether incident ray started from a light source or from camera.
    mode: TransportMode,
}

impl SpecularTransmission {
    /// Creates a new instance of `SpecularTransmission`.
    ///
    /// * `t`      - Spectrum used to scale the transmitted colour.
    /// * `eta_a`  - Index of refraction above the surface (same side as surface normal).
    /// * `eta_b`  - Index of refraction below the surface (opposite side as surface normal).
    /// * `mode`   - Indicates whether incident ray started from a light source or from camera.
    pub fn new(t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> BxDF {
        BxDF::SpecularTransmission(Self {
            bxdf_type: BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_SPECULAR,
            t,
            eta_a,
            eta_b,
            fresnel: FresnelDielectric::new(eta_a, eta_b),
            mode,
        })
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        self.bxdf_type
    }

    /// Returns the refracted direction with pdf 1, or an empty sample on
    /// total internal reflection.
    ///
    /// * `wo` - Outgoing direction.
    pub fn sample_f(&self, wo: &Vector3f) -> BxDFSample {
        // Figure out which η is incident and which is transmitted.
        let entering = cos_theta(wo) > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };

        // Compute ray direction for specular transmission.
        let n = Normal3f::new(0.0, 0.0, 1.0).face_forward(wo);
        match refract(wo, &n, eta_i / eta_t) {
            Some(wi) => {
                let mut ft = self.t * (Spectrum::one() - self.fresnel.evaluate(cos_theta(&wi)));

                // Account for non-symmetry with transmission to different medium.
                if self.mode == TransportMode::Radiance {
                    ft *= (eta_i * eta_i) / (eta_t * eta_t);
                }
                BxDFSample::new(ft / abs_cos_theta(&wi), 1.0, wi, self.bxdf_type)
            }
            None => BxDFSample::from(self.bxdf_type),
        }
    }
}
