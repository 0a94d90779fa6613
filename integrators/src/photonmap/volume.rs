//! Volume Radiance Estimation

use super::category::*;
use super::integrator::*;
use photon_core::geometry::*;
use photon_core::pbrt::*;
use photon_core::rng::*;
use photon_core::scene::*;
use photon_core::spectrum::*;

/// Transmittance luminance below which ray marching plays Russian roulette.
const ROULETTE_THRESHOLD: Float = 1e-3;

/// Probability of continuing to march once roulette starts.
const ROULETTE_CONTINUE_PROBABILITY: Float = 0.5;

impl PhotonMapIntegrator {
    /// Returns the beam transmittance along a ray through the volume region.
    ///
    /// * `scene` - The scene.
    /// * `ray`   - The ray segment.
    /// * `rng`   - Random number generator for the marching offset.
    pub fn transmittance(&self, scene: &Scene, ray: &Ray, rng: &mut RNG) -> Spectrum {
        scene.transmittance(ray, self.options.step_size, rng.uniform_float())
    }

    /// Ray marches the segment of `ray` inside the volume region and returns
    /// the radiance added along it by emission and multiple scattering.
    ///
    /// * `scene` - The scene.
    /// * `ray`   - The ray segment, up to the first surface hit.
    /// * `rng`   - Random number generator.
    pub fn volume_li(&self, scene: &Scene, ray: &Ray, rng: &mut RNG) -> Spectrum {
        let Some(vr) = scene.volume_region.as_ref() else {
            return Spectrum::zero();
        };
        let length = ray.d.length();
        if length == 0.0 {
            return Spectrum::zero();
        }
        let rn = Ray::new(ray.o, ray.d / length, ray.t_max * length, ray.time);
        let Some((t0, t1)) = vr.intersect_p(&rn) else {
            return Spectrum::zero();
        };
        if t1 <= t0 {
            return Spectrum::zero();
        }

        // Prepare for volume integration stepping.
        let step_size = self.options.step_size;
        let n_steps = max(1.0, ((t1 - t0) / step_size).ceil()) as usize;
        let step = (t1 - t0) / n_steps as Float;
        let w = -rn.d;
        let mut tr = Spectrum::one();
        let mut lv = Spectrum::zero();
        let mut p = rn.at(t0);
        let mut t = t0 + rng.uniform_float() * step;

        let volume_map = self.map(PhotonCategory::Volume).filter(|m| m.paths > 0);
        let scale = volume_map.map_or(0.0, |m| 0.75 / (PI * m.paths as Float));

        for _ in 0..n_steps {
            // Advance to sample at `t` and update `tr`.
            let p_prev = p;
            p = rn.at(t);
            let step_tau = vr.tau(&Ray::new(p_prev, p - p_prev, 1.0, ray.time), 0.5 * step_size, rng.uniform_float());
            tr *= (-step_tau).exp();

            // Possibly terminate ray marching if transmittance is small.
            if tr.y() < ROULETTE_THRESHOLD {
                if rng.uniform_float() > ROULETTE_CONTINUE_PROBABILITY {
                    trace!("volume march terminated by roulette");
                    break;
                }
                tr /= ROULETTE_CONTINUE_PROBABILITY;
            }

            // Compute emission at `p`.
            lv += tr * vr.lve(&p, &w);

            // Compute multiple scattering from the volume photons around `p`.
            if let Some(built) = volume_map {
                let (photons, md2) = built.map.nearest(&p, self.options.n_lookup, self.options.max_dist_squared);
                if md2 > 0.0 && !photons.is_empty() {
                    let lm = photons
                        .iter()
                        .fold(Spectrum::zero(), |lm, c| lm + c.item.alpha * vr.p(&p, &c.item.wi, &w));
                    lv += tr * lm * (scale / md2.powf(1.5));
                }
            }

            t += step;
        }

        lv * step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::options::*;
    use float_cmp::*;
    use photon_core::medium::*;
    use photon_core::primitives::*;
    use photon_media::*;
    use std::sync::Arc;

    fn fog_scene(sigma_a: Float, le: Float) -> Scene {
        let volume: ArcVolumeRegion = Arc::new(HomogeneousVolume::new(
            Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0)),
            Spectrum::new(sigma_a),
            Spectrum::zero(),
            Spectrum::new(le),
            0.0,
        ));
        Scene::new(Arc::new(PrimitiveList::new(vec![])), vec![], Some(volume))
    }

    fn camera_ray() -> Ray {
        Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0)
    }

    #[test]
    fn emission_accumulates_along_segment() {
        let integrator = PhotonMapIntegrator::new(PhotonMapOptions::default());
        let mut rng = RNG::new(3);
        let lv = integrator.volume_li(&fog_scene(0.0, 1.0), &camera_ray(), &mut rng);
        assert!(approx_eq!(Float, lv.y(), 2.0, epsilon = 1e-4));
    }

    #[test]
    fn absorbing_medium_adds_nothing_and_attenuates() {
        let integrator = PhotonMapIntegrator::new(PhotonMapOptions::default());
        let scene = fog_scene(0.5, 0.0);
        let mut rng = RNG::new(3);
        assert!(integrator.volume_li(&scene, &camera_ray(), &mut rng).is_black());
        let tr = integrator.transmittance(&scene, &camera_ray(), &mut rng);
        assert!(approx_eq!(Float, tr.y(), (-1.0 as Float).exp(), epsilon = 1e-4));
    }

    #[test]
    fn rays_missing_the_volume_see_nothing() {
        let integrator = PhotonMapIntegrator::new(PhotonMapOptions::default());
        let ray = Ray::new(Point3f::new(5.0, 5.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        let mut rng = RNG::new(3);
        assert!(integrator.volume_li(&fog_scene(0.0, 1.0), &ray, &mut rng).is_black());
    }
}
