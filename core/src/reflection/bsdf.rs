//! BSDF

use super::*;
use crate::interaction::*;

/// Maximum number of BxDFs that can be stored in `BSDF`.
pub const MAX_BXDFS: usize = 8;

/// BSDF interface represents a collection of BRDFs and BTDFs.
#[derive(Clone, Debug)]
pub struct BSDF {
    /// The shading normal given by per-vertex normals and/or bump mapping.
    /// It is the first axis in the orthonormal coordinate system and also
    /// used to define hemispheres for integrating incident illumincation for
    /// surface reflection.
    pub ns: Normal3f,

    /// The geometric normal defined by surface geometry.
    pub ng: Normal3f,

    /// Second axis for the orthonormal coordinate system.
    pub ss: Vector3f,

    /// Third axis for the orthonormal coordinate system.
    pub ts: Vector3f,

    /// The `BxDFs`.
    pub bxdfs: Vec<BxDF>,

    /// Relative index of refraction over the surface boundary.
    pub eta: Float,
}

impl BSDF {
    /// Creates a new `BSDF`.
    ///
    /// * `si`  - The differential geometry at the point on a surface.
    /// * `eta` - Optional relative index of refraction over the surface
    ///           boundary. If not provided, defaults to 1.0; used for
    ///           opaque surfaces.
    pub fn new(si: &SurfaceInteraction, eta: Option<Float>) -> Self {
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();

        Self {
            eta: eta.unwrap_or(1.0),
            ns,
            ng: si.hit.n,
            ss,
            ts: Vector3f::from(ns).cross(&ss),
            bxdfs: Vec::with_capacity(MAX_BXDFS),
        }
    }

    /// Add a `BxDF`.
    ///
    /// * `bxdf` - The `BxDF`.
    pub fn add(&mut self, bxdf: BxDF) {
        debug_assert!(
            self.bxdfs.len() < MAX_BXDFS,
            "Cannot add BxDFs. BSDF maximum limit {} reached.",
            MAX_BXDFS
        );
        self.bxdfs.push(bxdf);
    }

    /// Returns the number of `BxDF`s that match the given type.
    ///
    /// * `bxdf_type` - The `BxdFType` to match.
    pub fn num_components(&self, bxdf_type: BxDFType) -> usize {
        self.bxdfs.iter().filter(|b| b.matches_flags(bxdf_type)).count()
    }

    /// Returns true if the BSDF has a component that is not perfectly specular.
    pub fn has_non_specular(&self) -> bool {
        self.num_components(BxDFType::BSDF_ALL)
            > self.num_components(
                BxDFType::BSDF_REFLECTION | BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_SPECULAR,
            )
    }

    /// Transforms a vector from world space to local space.
    ///
    /// * `v` - The vector to transform.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot(&self.ns))
    }

    /// Transforms a vector from local space to world space.
    ///
    /// * `v` - The vector to transform.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        )
    }

    /// Sums the matching reflection or transmission components for a pair of
    /// local directions. The geometric normal decides which side `wi` is on.
    fn f_local(
        &self,
        wo_w: &Vector3f,
        wi_w: &Vector3f,
        wo: &Vector3f,
        wi: &Vector3f,
        bxdf_type: BxDFType,
    ) -> Spectrum {
        let reflect = wi_w.dot(&self.ng) * wo_w.dot(&self.ng) > 0.0;
        let mut l = Spectrum::zero();
        for bxdf in self.bxdfs.iter() {
            let t = bxdf.get_type();
            if bxdf.matches_flags(bxdf_type)
                && ((reflect && t.contains(BxDFType::BSDF_REFLECTION))
                    || (!reflect && t.contains(BxDFType::BSDF_TRANSMISSION)))
            {
                l += bxdf.f(wo, wi);
            }
        }
        l
    }

    /// Returns the BSDF evaluated for a pair of directions.
    ///
    /// * `wo_w`      - Outgoing direction in world-space.
    /// * `wi_w`      - Incident direction in world-space.
    /// * `bxdf_type` - The `BxdFType` to evaluate.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Spectrum {
        let wi = self.world_to_local(wi_w);
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            Spectrum::zero()
        } else {
            self.f_local(wo_w, wi_w, &wo, &wi, bxdf_type)
        }
    }

    /// Samples an incident direction for the given outgoing direction.
    ///
    /// * `wo_w`      - Outgoing direction in world-space.
    /// * `u`         - The 2D uniform random values for the chosen BxDF.
    /// * `u_comp`    - Uniform random value used to choose the BxDF.
    /// * `bxdf_type` - The `BxdFType` to sample.
    pub fn sample_f(
        &self,
        wo_w: &Vector3f,
        u: &Point2f,
        u_comp: Float,
        bxdf_type: BxDFType,
    ) -> BxDFSample {
        // Choose which `BxDF` to sample.
        let matching_comps = self.num_components(bxdf_type);
        if matching_comps == 0 {
            return BxDFSample::default();
        }
        let comp = min(
            (u_comp * matching_comps as Float).floor() as usize,
            matching_comps - 1,
        );
        let Some((index, bxdf)) = self
            .bxdfs
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches_flags(bxdf_type))
            .nth(comp)
        else {
            return BxDFSample::default();
        };

        // Sample chosen `BxDF`.
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return BxDFSample::default();
        }

        let sampled_type = bxdf.get_type();
        let sample = bxdf.sample_f(&wo, u);
        if sample.pdf == 0.0 {
            return BxDFSample::from(sampled_type);
        }
        let wi_w = self.local_to_world(&sample.wi);
        let is_specular = sampled_type.contains(BxDFType::BSDF_SPECULAR);

        // Compute overall PDF with all matching BxDFs.
        let mut pdf = sample.pdf;
        if !is_specular && matching_comps > 1 {
            for (i, b) in self.bxdfs.iter().enumerate() {
                if i != index && b.matches_flags(bxdf_type) {
                    pdf += b.pdf(&wo, &sample.wi);
                }
            }
        }
        if matching_comps > 1 {
            pdf /= matching_comps as Float;
        }

        // Compute value of BSDF for sampled direction.
        let f = if is_specular {
            sample.f
        } else {
            self.f_local(wo_w, &wi_w, &wo, &sample.wi, bxdf_type)
        };
        BxDFSample::new(f, pdf, wi_w, sampled_type)
    }

    /// Computes the hemispherical-directional reflectance function ρ.
    ///
    /// * `wo_w`      - Outgoing direction in world-space.
    /// * `u`         - Samples used by Monte Carlo algorithm.
    /// * `bxdf_type` - The `BxdFType` to evaluate.
    pub fn rho_hd(&self, wo_w: &Vector3f, u: &[Point2f], bxdf_type: BxDFType) -> Spectrum {
        let wo = self.world_to_local(wo_w);
        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(bxdf_type))
            .fold(Spectrum::zero(), |l, b| l + b.rho_hd(&wo, u))
    }

    /// Computes the hemispherical-hemispherical reflectance function ρ.
    ///
    /// * `u1`        - Samples used to pick outgoing directions.
    /// * `u2`        - Samples used to pick incident directions.
    /// * `bxdf_type` - The `BxdFType` to evaluate.
    pub fn rho_hh(&self, u1: &[Point2f], u2: &[Point2f], bxdf_type: BxDFType) -> Spectrum {
        self.bxdfs
            .iter()
            .filter(|b| b.matches_flags(bxdf_type))
            .fold(Spectrum::zero(), |l, b| l + b.rho_hh(u1, u2))
    }

    /// Evaluates the PDF for sampling `wi_w` given `wo_w` using `sample_f()`.
    ///
    /// * `wo_w`      - Outgoing direction in world-space.
    /// * `wi_w`      - Incident direction in world-space.
    /// * `bxdf_type` - The `BxdFType` to evaluate.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Float {
        if self.bxdfs.is_empty() {
            return 0.0;
        }

        let wo = self.world_to_local(wo_w);
        let wi = self.world_to_local(wi_w);
        if wo.z == 0.0 {
            return 0.0;
        }

        let mut matching_comps = 0;
        let mut pdf = 0.0;
        for bxdf in self.bxdfs.iter().filter(|b| b.matches_flags(bxdf_type)) {
            matching_comps += 1;
            pdf += bxdf.pdf(&wo, &wi);
        }
        if matching_comps > 0 {
            pdf / matching_comps as Float
        } else {
            0.0
        }
    }
}
