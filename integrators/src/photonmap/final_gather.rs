//! Final Gathering

use super::category::*;
use super::collector::*;
use super::integrator::*;
use super::kd_tree::*;
use super::options::*;
use super::photon::*;
use photon_core::geometry::*;
use photon_core::interaction::*;
use photon_core::pbrt::*;
use photon_core::reflection::*;
use photon_core::rng::*;
use photon_core::sampling::*;
use photon_core::scene::*;
use photon_core::spectrum::*;

/// Gather rays estimate transmittance with coarser steps than camera rays.
const GATHER_STEP_SCALE: Float = 4.0;

/// Returns the incident directions of the indirect photons nearest to `p`.
/// The search radius starts at `max_dist_squared` and doubles until
/// `GATHER_PHOTONS` photons, or every photon of a smaller map, are found.
///
/// * `map`              - The indirect photon map.
/// * `p`                - The shading point.
/// * `max_dist_squared` - Initial squared search radius.
pub fn gather_directions(map: Option<&CategoryMap>, p: &Point3f, max_dist_squared: Float) -> Vec<Vector3f> {
    let Some(built) = map else {
        return vec![];
    };
    let needed = GATHER_PHOTONS.min(built.map.len());
    if needed == 0 {
        return vec![];
    }

    let mut search_dist2 = max_dist_squared;
    loop {
        let (photons, _) = built.map.nearest(p, needed, search_dist2);
        if photons.len() >= needed || !search_dist2.is_finite() {
            return photons.iter().map(|c| c.item.wi).collect();
        }
        search_dist2 *= 2.0;
    }
}

/// Returns the density of sampling `wi` by picking one of the photon
/// directions and sampling the cone of half-angle `acos(cos_gather_angle)`
/// around it.
///
/// * `directions`       - Photon directions.
/// * `wi`               - The direction.
/// * `cos_gather_angle` - Cosine of the cone half-angle.
pub fn photon_direction_pdf(directions: &[Vector3f], wi: &Vector3f, cos_gather_angle: Float) -> Float {
    if directions.is_empty() {
        return 0.0;
    }
    let cone_pdf = uniform_cone_pdf(cos_gather_angle);
    let inside = directions.iter().filter(|d| d.dot(wi) > 0.999 * cos_gather_angle).count();
    inside as Float * cone_pdf / directions.len() as Float
}

/// Returns the radiance photon nearest to `p` whose normal lies in the
/// hemisphere of `n`.
///
/// * `map` - The radiance photon map.
/// * `p`   - Lookup position.
/// * `n`   - Surface normal.
pub fn nearest_radiance_photon<'a>(
    map: &'a PhotonMap<RadiancePhoton>,
    p: &Point3f,
    n: &Normal3f,
) -> Option<&'a RadiancePhoton> {
    let mut collector = BoundedNeighborCollector::with_predicate(1, |rp: &RadiancePhoton| rp.n.dot(n) >= 0.0);
    let mut md2 = INFINITY;
    map.lookup(p, &mut collector, &mut md2);
    collector.nearest()
}

impl PhotonMapIntegrator {
    /// Estimates indirect radiance at a surface point with one bounce of
    /// gather rays. BSDF sampled and photon guided rays are combined with
    /// the power heuristic.
    ///
    /// * `isect` - The surface interaction.
    /// * `bsdf`  - BSDF at the surface interaction.
    /// * `wo`    - Outgoing direction.
    /// * `scene` - The scene.
    /// * `rng`   - Random number generator.
    pub(super) fn final_gather(
        &self,
        isect: &SurfaceInteraction,
        bsdf: &BSDF,
        wo: &Vector3f,
        scene: &Scene,
        rng: &mut RNG,
    ) -> Spectrum {
        let Some(radiance_map) = self.radiance_map.as_ref() else {
            return Spectrum::zero();
        };
        if !bsdf.has_non_specular() {
            return Spectrum::zero();
        }

        let n_samples = self.options.gather_samples;
        let n = n_samples as Int;
        let cos_gather_angle = self.options.cos_gather_angle;
        let non_specular = BxDFType::BSDF_ALL & !BxDFType::BSDF_SPECULAR;
        let ns = bsdf.ns;

        // Find indirect photons around point for importance sampling.
        let directions = gather_directions(
            self.map(PhotonCategory::Indirect),
            &isect.hit.p,
            self.options.max_dist_squared,
        );

        // Use BSDF to do final gathering.
        let mut li = Spectrum::zero();
        for _ in 0..n_samples {
            let BxDFSample { f, pdf, wi, .. } =
                bsdf.sample_f(wo, &rng.uniform_point2f(), rng.uniform_float(), non_specular);
            if f.is_black() || pdf == 0.0 {
                continue;
            }
            let Some(l_indir) = self.gather_radiance(radiance_map, isect, &wi, scene, rng) else {
                continue;
            };
            let photon_pdf = photon_direction_pdf(&directions, &wi, cos_gather_angle);
            let wt = power_heuristic(n, pdf, n, photon_pdf);
            li += f * l_indir * (wi.abs_dot(&ns) * wt / pdf);
        }
        let mut l = li / n_samples as Float;

        // Use nearby photons to do final gathering.
        if !directions.is_empty() {
            let mut li = Spectrum::zero();
            for _ in 0..n_samples {
                let photon_num = min(
                    (rng.uniform_float() * directions.len() as Float) as usize,
                    directions.len() - 1,
                );
                let axis = directions[photon_num];
                let (vx, vy) = coordinate_system(&axis);
                let wi =
                    uniform_sample_cone_coordinate_system(&rng.uniform_point2f(), cos_gather_angle, &vx, &vy, &axis);

                let f = bsdf.f(wo, &wi, non_specular);
                if f.is_black() {
                    continue;
                }
                let photon_pdf = photon_direction_pdf(&directions, &wi, cos_gather_angle);
                if photon_pdf == 0.0 {
                    continue;
                }
                let Some(l_indir) = self.gather_radiance(radiance_map, isect, &wi, scene, rng) else {
                    continue;
                };
                let bsdf_pdf = bsdf.pdf(wo, &wi, non_specular);
                let wt = power_heuristic(n, photon_pdf, n, bsdf_pdf);
                li += f * l_indir * (wi.abs_dot(&ns) * wt / photon_pdf);
            }
            l += li / n_samples as Float;
        }

        l
    }

    /// Traces a gather ray and returns the cached radiance at its hit,
    /// attenuated by the medium along the ray. Returns `None` when the ray
    /// escapes.
    ///
    /// * `radiance_map` - The radiance photon map.
    /// * `isect`        - The surface interaction the ray starts from.
    /// * `wi`           - Gather direction.
    /// * `scene`        - The scene.
    /// * `rng`          - Random number generator.
    fn gather_radiance(
        &self,
        radiance_map: &PhotonMap<RadiancePhoton>,
        isect: &SurfaceInteraction,
        wi: &Vector3f,
        scene: &Scene,
        rng: &mut RNG,
    ) -> Option<Spectrum> {
        let mut bounce_ray = isect.spawn_ray(wi);
        let gather_isect = scene.intersect(&mut bounce_ray)?;

        // Compute exitant radiance using precomputed irradiance.
        let n = gather_isect.hit.n.face_forward(&(-bounce_ray.d));
        let l_indir =
            nearest_radiance_photon(radiance_map, &gather_isect.hit.p, &n).map_or_else(Spectrum::zero, |rp| rp.lo);
        if l_indir.is_black() {
            return Some(l_indir);
        }

        let tr = scene.transmittance(
            &bounce_ray,
            GATHER_STEP_SCALE * self.options.step_size,
            rng.uniform_float(),
        );
        Some(l_indir * tr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn indirect_map(photons: Vec<Photon>) -> PhotonMaps {
        let n = photons.len();
        let mut maps = PhotonMaps::new(0, n, 0);
        for photon in photons {
            maps[PhotonCategory::Indirect].deposit(photon, 1);
        }
        maps
    }

    #[test]
    fn gather_radius_grows_until_enough_photons() {
        // Photons on a line with spacing 1; the initial radius sees none.
        let photons: Vec<Photon> = (0..80)
            .map(|i| {
                Photon::new(
                    Point3f::new(i as Float + 1.0, 0.0, 0.0),
                    Spectrum::one(),
                    Vector3f::new(0.0, 0.0, 1.0),
                )
            })
            .collect();
        let maps = indirect_map(photons);
        let dirs = gather_directions(maps.map(PhotonCategory::Indirect), &Point3f::zero(), 0.01);
        assert_eq!(dirs.len(), GATHER_PHOTONS);
    }

    #[test]
    fn gather_uses_every_photon_of_small_maps() {
        let photons: Vec<Photon> = (0..7)
            .map(|i| Photon::new(Point3f::new(i as Float, 0.0, 0.0), Spectrum::one(), Vector3f::new(0.0, 1.0, 0.0)))
            .collect();
        let maps = indirect_map(photons);
        let dirs = gather_directions(maps.map(PhotonCategory::Indirect), &Point3f::zero(), 0.01);
        assert_eq!(dirs.len(), 7);
        assert!(dirs.iter().all(|d| *d == Vector3f::new(0.0, 1.0, 0.0)));
        assert!(gather_directions(None, &Point3f::zero(), 0.01).is_empty());
    }

    #[test]
    fn photon_pdf_counts_directions_inside_cone() {
        let cos = radians(10.0).cos();
        let up = Vector3f::new(0.0, 0.0, 1.0);
        let directions = vec![up, up, Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(0.0, 1.0, 0.0)];
        let pdf = photon_direction_pdf(&directions, &up, cos);
        assert!(approx_eq!(Float, pdf, 0.5 * uniform_cone_pdf(cos), epsilon = 1e-3));
        assert_eq!(photon_direction_pdf(&[], &up, cos), 0.0);
        assert_eq!(photon_direction_pdf(&directions, &(-up), cos), 0.0);
    }

    #[test]
    fn radiance_lookup_filters_by_normal() {
        let up = Normal3f::new(0.0, 0.0, 1.0);
        let mut facing_down = RadiancePhoton::new(Point3f::zero(), -up);
        facing_down.lo = Spectrum::new(1.0);
        let mut facing_up = RadiancePhoton::new(Point3f::new(5.0, 0.0, 0.0), up);
        facing_up.lo = Spectrum::new(2.0);
        let map = PhotonMap::new(vec![facing_down, facing_up]);

        let found = nearest_radiance_photon(&map, &Point3f::zero(), &up);
        assert_eq!(found.map(|rp| rp.lo), Some(Spectrum::new(2.0)));

        let found = nearest_radiance_photon(&map, &Point3f::zero(), &(-up));
        assert_eq!(found.map(|rp| rp.lo), Some(Spectrum::new(1.0)));

        let empty = PhotonMap::<RadiancePhoton>::new(vec![]);
        assert!(nearest_radiance_photon(&empty, &Point3f::zero(), &up).is_none());
    }
}
