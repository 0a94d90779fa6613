//! Specular Reflection

use super::*;

/// BRDF for physically plausible specular reflection using Fresnel interface.
#[derive(Clone, Debug)]
pub struct SpecularReflection {
    /// BxDF type.
    bxdf_type: BxDFType,

    /// Spectrum used to scale the reflected colour.
    r: Spectrum,

    /// Fresnel interface for dielectrics and conductors.
    fresnel: Fresnel,
}

impl SpecularReflection {
    /// Create a new instance of `SpecularReflection`.
    ///
    /// * `r`       - Spectrum used to scale the reflected colour.
    /// * `fresnel` - Fresnel interface for dielectrics and conductors.
    pub fn new(r: Spectrum, fresnel: Fresnel) -> BxDF {
        BxDF::SpecularReflection(Self {
            bxdf_type: BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR,
            r,
            fresnel,
        })
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        self.bxdf_type
    }

    /// Returns the mirror direction with pdf 1.
    ///
    /// * `wo` - Outgoing direction.
    pub fn sample_f(&self, wo: &Vector3f) -> BxDFSample {
        // Compute perfect specular reflection direction.
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let f = self.fresnel.evaluate(cos_theta(&wi)) * self.r / abs_cos_theta(&wi);
        BxDFSample::new(f, 1.0, wi, self.bxdf_type)
    }
}
