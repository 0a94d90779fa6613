//! Homogeneous Volume

use photon_core::geometry::*;
use photon_core::medium::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::spectrum::*;

/// Implements a box-shaped region of space with constant σa, σs and emission
/// throughout its extent.
#[derive(Clone, Debug)]
pub struct HomogeneousVolume {
    /// Extent of the region.
    bounds: Bounds3f,

    /// Absorption cross section `σa` is the probability density that light is
    /// absorbed per unit distance traveled in the medium
    sigma_a: Spectrum,

    /// Scattering coefficient `σs` is the probability of an out-scattering
    /// event occurring per unit distance
    sigma_s: Spectrum,

    /// Emitted radiance.
    le: Spectrum,

    /// The Henyey-Greenstein phase function.
    phase: HenyeyGreenstein,
}

impl HomogeneousVolume {
    /// Create a new `HomogeneousVolume`.
    ///
    /// * `bounds`  - Extent of the region.
    /// * `sigma_a` - Absorption cross section `σa`.
    /// * `sigma_s` - Scattering coefficient `σs`.
    /// * `le`      - Emitted radiance.
    /// * `g`       - The asymmetry parameter for Henyey-Greenstein phase
    ///               function.
    pub fn new(bounds: Bounds3f, sigma_a: Spectrum, sigma_s: Spectrum, le: Spectrum, g: Float) -> Self {
        Self {
            bounds,
            sigma_a,
            sigma_s,
            le,
            phase: HenyeyGreenstein::new(g),
        }
    }
}

impl VolumeRegion for HomogeneousVolume {
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    fn sigma_a(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
        if self.bounds.inside(p) {
            self.sigma_a
        } else {
            Spectrum::zero()
        }
    }

    fn sigma_s(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
        if self.bounds.inside(p) {
            self.sigma_s
        } else {
            Spectrum::zero()
        }
    }

    fn lve(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
        if self.bounds.inside(p) {
            self.le
        } else {
            Spectrum::zero()
        }
    }

    fn p(&self, p: &Point3f, w: &Vector3f, wp: &Vector3f) -> Float {
        if self.bounds.inside(p) {
            self.phase.p(w, wp)
        } else {
            0.0
        }
    }

    /// Returns the optical thickness in closed form. The marching parameters
    /// are ignored.
    ///
    /// * `ray`        - The ray segment.
    /// * `_step_size` - Marching step size.
    /// * `_offset`    - Offset of the first marching sample.
    fn tau(&self, ray: &Ray, _step_size: Float, _offset: Float) -> Spectrum {
        match self.bounds.intersect_p(ray) {
            Some((t0, t1)) => (self.sigma_a + self.sigma_s) * ray.at(t0).distance(&ray.at(t1)),
            None => Spectrum::zero(),
        }
    }
}

impl From<&ParamSet> for HomogeneousVolume {
    /// Create a `HomogeneousVolume` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let sigma_a = params.find_one_spectrum("sigma_a", Spectrum::zero());
        let sigma_s = params.find_one_spectrum("sigma_s", Spectrum::zero());
        let le = params.find_one_spectrum("Le", Spectrum::zero());
        let g = params.find_one_float("g", 0.0);
        let p0 = params.find_one_point3f("p0", Point3f::zero());
        let p1 = params.find_one_point3f("p1", Point3f::new(1.0, 1.0, 1.0));
        Self::new(Bounds3f::new(p0, p1), sigma_a, sigma_s, le, g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn slab() -> HomogeneousVolume {
        HomogeneousVolume::new(
            Bounds3f::new(Point3f::new(-1.0, -1.0, 0.0), Point3f::new(1.0, 1.0, 2.0)),
            Spectrum::new(0.5),
            Spectrum::new(0.25),
            Spectrum::zero(),
            0.0,
        )
    }

    #[test]
    fn analytic_tau_uses_overlap_length() {
        let ray = Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 2.0), 10.0, 0.0);
        let tau = slab().tau(&ray, 1.0, 0.5);
        assert!(approx_eq!(Float, tau[0], 1.5, epsilon = 1e-4));
    }

    #[test]
    fn marched_tau_agrees_with_analytic() {
        struct Marched(HomogeneousVolume);
        impl VolumeRegion for Marched {
            fn world_bound(&self) -> Bounds3f {
                self.0.world_bound()
            }
            fn sigma_a(&self, p: &Point3f, w: &Vector3f) -> Spectrum {
                self.0.sigma_a(p, w)
            }
            fn sigma_s(&self, p: &Point3f, w: &Vector3f) -> Spectrum {
                self.0.sigma_s(p, w)
            }
            fn lve(&self, p: &Point3f, w: &Vector3f) -> Spectrum {
                self.0.lve(p, w)
            }
            fn p(&self, p: &Point3f, w: &Vector3f, wp: &Vector3f) -> Float {
                self.0.p(p, w, wp)
            }
        }

        let ray = Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 1.0), 10.0, 0.0);
        let marched = Marched(slab()).tau(&ray, 0.01, 0.5);
        assert!(approx_eq!(Float, marched[0], 1.5, epsilon = 1e-2));
    }

    #[test]
    fn coefficients_vanish_outside() {
        let outside = Point3f::new(0.0, 0.0, 3.0);
        let w = Vector3f::new(0.0, 0.0, 1.0);
        assert!(slab().sigma_t(&outside, &w).is_black());
        assert!(!slab().sigma_t(&Point3f::new(0.0, 0.0, 1.0), &w).is_black());
    }
}
