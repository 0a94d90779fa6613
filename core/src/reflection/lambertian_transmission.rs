//! Lambertian Transmission

use super::*;

/// BTDF for the Lambertian model for perfect transmissive surfaces that
/// scatters incident illumination equally through a surface in all directions.
#[derive(Clone, Debug)]
pub struct LambertianTransmission {
    /// BxDF type.
    bxdf_type: BxDFType,

    /// Transmission spectrum which gives the fraction of incident light that
    /// is scattered through the surface.
    t: Spectrum,
}

impl LambertianTransmission {
    /// Create a new instance of `LambertianTransmission`.
    ///
    /// * `t` - Transmission spectrum which gives the fraction of incident
    ///         light that is scattered through the surface.
    pub fn new(t: Spectrum) -> BxDF {
        BxDF::LambertianTransmission(Self {
            bxdf_type: BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_DIFFUSE,
            t,
        })
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        self.bxdf_type
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        self.t * INV_PI
    }

    /// Cosine-sample the opposite hemisphere.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z > 0.0 {
            wi.z *= -1.0;
        }
        let pdf = self.pdf(wo, &wi);
        BxDFSample::new(self.f(wo, &wi), pdf, wi, self.bxdf_type)
    }

    /// Evaluates the PDF of `sample_f()`.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if !same_hemisphere(wo, wi) {
            abs_cos_theta(wi) * INV_PI
        } else {
            0.0
        }
    }

    /// Computes the hemispherical-directional reflectance function ρ.
    pub fn rho_hd(&self) -> Spectrum {
        self.t
    }

    /// Computes the hemispherical-hemispherical reflectance function ρ.
    pub fn rho_hh(&self) -> Spectrum {
        self.t
    }
}
