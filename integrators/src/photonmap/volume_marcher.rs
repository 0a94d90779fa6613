//! Volume Marcher

use photon_core::geometry::*;
use photon_core::medium::*;
use photon_core::pbrt::*;
use photon_core::rng::*;
use photon_core::spectrum::*;

/// Outcome of marching a ray segment through the volume region.
#[derive(Copy, Clone, Debug)]
pub enum MarchEvent {
    /// The ray interacted with the medium.
    Interaction {
        /// Interaction point.
        p: Point3f,

        /// Distance from the ray origin to `p`.
        distance: Float,

        /// Transmittance from the origin up to `p`.
        tr: Spectrum,
    },

    /// The ray left the medium or reached the end of the segment.
    PassThrough {
        /// Transmittance along the whole segment.
        tr: Spectrum,
    },
}

/// Stochastic free-flight sampling through a volume region in fixed steps.
pub struct VolumeMarcher<'a> {
    /// The medium.
    region: &'a dyn VolumeRegion,

    /// Marching step size.
    step_size: Float,
}

impl<'a> VolumeMarcher<'a> {
    /// Create a new `VolumeMarcher`.
    ///
    /// * `region`    - The medium.
    /// * `step_size` - Marching step size.
    pub fn new(region: &'a dyn VolumeRegion, step_size: Float) -> Self {
        Self { region, step_size }
    }

    /// March along `ray` up to distance `t_end` and decide whether the ray
    /// interacts with the medium before getting there.
    ///
    /// Each step has transmittance `exp(-σt len)` and an interaction happens
    /// with probability `1 - T`. The exact distance inside the step follows
    /// the exponential law truncated to the step. The first step starts at a
    /// random fraction of the step size.
    ///
    /// * `ray`   - The ray. Distances are measured along its normalized
    ///             direction.
    /// * `t_end` - Distance to the surface hit or infinity.
    /// * `rng`   - Random number generator.
    pub fn march(&self, ray: &Ray, t_end: Float, rng: &mut RNG) -> MarchEvent {
        let mut tr = Spectrum::one();

        let length = ray.d.length();
        if length == 0.0 {
            return MarchEvent::PassThrough { tr };
        }
        let d = ray.d / length;
        let rn = Ray::new(ray.o, d, t_end, ray.time);
        let Some((t0, t1)) = self.region.intersect_p(&rn) else {
            return MarchEvent::PassThrough { tr };
        };

        let w = -d;
        let mut a = t0;
        let mut b = t0 + rng.uniform_float() * self.step_size;
        while a < t1 {
            b = min(b, t1);
            let len = b - a;
            let sigma_t = self.region.sigma_t(&rn.at(0.5 * (a + b)), &w);
            let step_tr = (-(sigma_t * len)).exp();

            if rng.uniform_float() < 1.0 - step_tr.y() {
                // Sample the interaction distance within the step.
                let sigma = sigma_t.y();
                let u = rng.uniform_float();
                let dt = if sigma > 0.0 {
                    min(-(1.0 - u * (1.0 - (-sigma * len).exp())).ln() / sigma, len)
                } else {
                    u * len
                };
                let distance = a + dt;
                trace!("volume interaction at {}", distance);
                return MarchEvent::Interaction {
                    p: rn.at(distance),
                    distance,
                    tr: tr * (-(sigma_t * dt)).exp(),
                };
            }

            tr *= step_tr;
            a = b;
            b = a + self.step_size;
        }

        MarchEvent::PassThrough { tr }
    }

    /// Returns the single scattering albedo `σs / σt` at a point. Zero where
    /// the medium does not attenuate.
    ///
    /// * `p` - The point.
    /// * `w` - Direction of the ray at `p`.
    pub fn albedo(&self, p: &Point3f, w: &Vector3f) -> Float {
        let sigma_t = self.region.sigma_t(p, w).y();
        if sigma_t > 0.0 {
            self.region.sigma_s(p, w).y() / sigma_t
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    struct Slab {
        sigma_a: Float,
        sigma_s: Float,
    }

    impl VolumeRegion for Slab {
        fn world_bound(&self) -> Bounds3f {
            Bounds3f::new(Point3f::new(-10.0, -10.0, 0.0), Point3f::new(10.0, 10.0, 4.0))
        }

        fn sigma_a(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
            if self.world_bound().inside(p) {
                Spectrum::new(self.sigma_a)
            } else {
                Spectrum::zero()
            }
        }

        fn sigma_s(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
            if self.world_bound().inside(p) {
                Spectrum::new(self.sigma_s)
            } else {
                Spectrum::zero()
            }
        }

        fn lve(&self, _p: &Point3f, _w: &Vector3f) -> Spectrum {
            Spectrum::zero()
        }

        fn p(&self, _p: &Point3f, _w: &Vector3f, _wp: &Vector3f) -> Float {
            INV_FOUR_PI
        }
    }

    fn up_ray() -> Ray {
        Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0)
    }

    #[test]
    fn empty_medium_passes_through() {
        let slab = Slab {
            sigma_a: 0.0,
            sigma_s: 0.0,
        };
        let marcher = VolumeMarcher::new(&slab, 0.3);
        let mut rng = RNG::new(1);
        for _ in 0..100 {
            match marcher.march(&up_ray(), INFINITY, &mut rng) {
                MarchEvent::PassThrough { tr } => assert!(approx_eq!(Float, tr.y(), 1.0, epsilon = 1e-6)),
                MarchEvent::Interaction { .. } => panic!("interaction in empty medium"),
            }
        }
    }

    #[test]
    fn interactions_stay_inside_segment() {
        let slab = Slab {
            sigma_a: 0.5,
            sigma_s: 0.5,
        };
        let marcher = VolumeMarcher::new(&slab, 0.25);
        let mut rng = RNG::new(7);
        for _ in 0..1000 {
            if let MarchEvent::Interaction { p, distance, .. } = marcher.march(&up_ray(), 3.0, &mut rng) {
                assert!((1.0..=3.0).contains(&distance), "distance {}", distance);
                assert!(p.z >= -1e-4 && p.z <= 2.0 + 1e-4);
            }
        }
    }

    #[test]
    fn albedo() {
        let slab = Slab {
            sigma_a: 0.25,
            sigma_s: 0.75,
        };
        let marcher = VolumeMarcher::new(&slab, 1.0);
        assert!(approx_eq!(Float, marcher.albedo(&Point3f::new(0.0, 0.0, 1.0), &Vector3f::new(0.0, 0.0, 1.0)), 0.75, epsilon = 1e-6));
        assert_eq!(marcher.albedo(&Point3f::new(0.0, 0.0, 9.0), &Vector3f::new(0.0, 0.0, 1.0)), 0.0);
    }
}
