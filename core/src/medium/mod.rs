//! Medium

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::Arc;

mod henyey_greenstein;

// Re-exports
pub use henyey_greenstein::*;

/// VolumeRegion describes a bounded region of participating media through
/// its absorption, scattering and emission coefficients.
pub trait VolumeRegion: Send + Sync {
    /// Returns the bounding box of the region in world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns the parametric range `[t0, t1]` of the ray that overlaps the
    /// region, or `None` if the ray misses it.
    ///
    /// * `ray` - The ray.
    fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        self.world_bound().intersect_p(ray)
    }

    /// Returns the absorption coefficient σa at a point.
    ///
    /// * `p` - The point.
    /// * `w` - The direction.
    fn sigma_a(&self, p: &Point3f, w: &Vector3f) -> Spectrum;

    /// Returns the scattering coefficient σs at a point.
    ///
    /// * `p` - The point.
    /// * `w` - The direction.
    fn sigma_s(&self, p: &Point3f, w: &Vector3f) -> Spectrum;

    /// Returns the extinction coefficient σt = σa + σs at a point.
    ///
    /// * `p` - The point.
    /// * `w` - The direction.
    fn sigma_t(&self, p: &Point3f, w: &Vector3f) -> Spectrum {
        self.sigma_a(p, w) + self.sigma_s(p, w)
    }

    /// Returns the emitted radiance at a point.
    ///
    /// * `p` - The point.
    /// * `w` - The direction.
    fn lve(&self, p: &Point3f, w: &Vector3f) -> Spectrum;

    /// Returns the phase function value at a point for a pair of directions.
    ///
    /// * `p`  - The point.
    /// * `w`  - First direction.
    /// * `wp` - Second direction.
    fn p(&self, p: &Point3f, w: &Vector3f, wp: &Vector3f) -> Float;

    /// Returns the optical thickness of the region along the ray segment.
    /// The default implementation marches the segment in fixed steps starting
    /// at a fraction `offset` of the first step and sums σt.
    ///
    /// * `ray`       - The ray segment.
    /// * `step_size` - Marching step size.
    /// * `offset`    - Offset in [0, 1) of the first sample within a step.
    fn tau(&self, ray: &Ray, step_size: Float, offset: Float) -> Spectrum {
        debug_assert!(step_size > 0.0, "step_size must be positive");

        let length = ray.d.length();
        if length == 0.0 {
            return Spectrum::zero();
        }
        let rn = Ray::new(ray.o, ray.d / length, ray.t_max * length, ray.time);
        let Some((mut t0, t1)) = self.intersect_p(&rn) else {
            return Spectrum::zero();
        };

        let mut tau = Spectrum::zero();
        t0 += offset * step_size;
        while t0 < t1 {
            tau += self.sigma_t(&rn.at(t0), &(-rn.d));
            t0 += step_size;
        }
        tau * step_size
    }
}

/// Atomic reference counted `VolumeRegion`.
pub type ArcVolumeRegion = Arc<dyn VolumeRegion>;
