//! Radiance Precomputation

use super::category::*;
use super::kd_tree::*;
use super::options::*;
use super::photon::*;
use super::shooter::*;
use photon_core::app::{create_progress_bar, threads};
use photon_core::geometry::*;
use photon_core::pbrt::*;
use photon_core::spectrum::*;
use std::thread;

/// Number of radiance photons handed to a worker at a time.
const CHUNK_SIZE: usize = 256;

/// Irradiance estimate `E = Σ α / (paths π r²)` at a point from the photons
/// of a map that arrived on the side `n` faces.
///
/// * `map`              - The photon map.
/// * `n_lookup`         - Number of photons to use.
/// * `max_dist_squared` - Squared search radius.
/// * `p`                - The point.
/// * `n`                - Surface normal.
pub fn estimate_e(
    map: Option<&CategoryMap>,
    n_lookup: usize,
    max_dist_squared: Float,
    p: &Point3f,
    n: &Normal3f,
) -> Spectrum {
    let Some(built) = map else {
        return Spectrum::zero();
    };
    let (photons, md2) = built.map.nearest(p, n_lookup, max_dist_squared);
    if photons.is_empty() || built.paths == 0 {
        return Spectrum::zero();
    }

    // Accumulate irradiance value from nearby photons.
    let e = photons
        .iter()
        .filter(|c| n.dot(&c.item.wi) > 0.0)
        .fold(Spectrum::zero(), |e, c| e + c.item.alpha);
    e / (built.paths as Float * md2 * PI)
}

/// Computes the exitant radiance of radiance photons from the direct,
/// indirect and caustic photon maps.
pub struct RadiancePrecomputer<'a> {
    /// The photon maps.
    maps: &'a PhotonMaps,

    /// Number of photons used per irradiance estimate.
    n_lookup: usize,

    /// Squared search radius.
    max_dist_squared: Float,

    /// Number of worker threads.
    n_threads: usize,
}

impl<'a> RadiancePrecomputer<'a> {
    /// Create a new `RadiancePrecomputer`.
    ///
    /// * `maps`    - The finished photon maps.
    /// * `options` - Integrator options.
    pub fn new(maps: &'a PhotonMaps, options: &PhotonMapOptions) -> Self {
        Self {
            maps,
            n_lookup: options.n_lookup,
            max_dist_squared: options.max_dist_squared,
            n_threads: threads(options.n_threads),
        }
    }

    /// Returns the sum of irradiance estimates over the surface photon maps.
    ///
    /// * `p` - The point.
    /// * `n` - Surface normal.
    fn irradiance(&self, p: &Point3f, n: &Normal3f) -> Spectrum {
        [PhotonCategory::Direct, PhotonCategory::Indirect, PhotonCategory::Caustic]
            .into_iter()
            .fold(Spectrum::zero(), |e, category| {
                e + estimate_e(self.maps.map(category), self.n_lookup, self.max_dist_squared, p, n)
            })
    }

    /// Returns `E ρr / π` over the front and `E ρt / π` over the back
    /// hemisphere of a radiance photon.
    ///
    /// * `candidate` - The radiance photon and its reflectances.
    pub fn exitant_radiance(&self, candidate: &RadiancePhotonCandidate) -> Spectrum {
        let RadiancePhotonCandidate { photon, rho_r, rho_t } = candidate;
        let mut lo = Spectrum::zero();
        if !rho_r.is_black() {
            lo += self.irradiance(&photon.p, &photon.n) * *rho_r * INV_PI;
        }
        if !rho_t.is_black() {
            lo += self.irradiance(&photon.p, &(-photon.n)) * *rho_t * INV_PI;
        }
        lo
    }

    /// Computes the radiance of every candidate in parallel and returns the
    /// radiance photon map.
    ///
    /// * `candidates` - The radiance photon candidates.
    pub fn precompute(&self, mut candidates: Vec<RadiancePhotonCandidate>) -> PhotonMap<RadiancePhoton> {
        let progress = create_progress_bar(candidates.len() as u64, "Computing photon radiances");
        let n_threads = self.n_threads;

        thread::scope(|scope| {
            let (tx_worker, rx_worker) = crossbeam_channel::bounded::<&mut [RadiancePhotonCandidate]>(n_threads);

            // Spawn worker threads.
            for _ in 0..n_threads {
                let rx_worker = rx_worker.clone();
                let progress = progress.clone();
                scope.spawn(move || {
                    for chunk in rx_worker.iter() {
                        for candidate in chunk.iter_mut() {
                            candidate.photon.lo = self.exitant_radiance(candidate);
                        }
                        progress.inc(chunk.len() as u64);
                    }
                });
            }
            drop(rx_worker); // Drop extra since we've cloned one for each worker.

            // Send work.
            for chunk in candidates.chunks_mut(CHUNK_SIZE) {
                if tx_worker.send(chunk).is_err() {
                    error!("Radiance workers stopped early");
                    break;
                }
            }
        });
        progress.finish_and_clear();

        info!("{} radiance photons precomputed", candidates.len());
        PhotonMap::new(candidates.into_iter().map(|c| c.photon).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn maps_with_direct(photons: &[Photon], paths: usize) -> PhotonMaps {
        let mut maps = PhotonMaps::new(0, 0, 0);
        for photon in photons {
            maps[PhotonCategory::Direct].deposit(*photon, paths);
        }
        maps[PhotonCategory::Direct].build(paths);
        maps
    }

    fn grid_photons(wi: Vector3f) -> Vec<Photon> {
        let mut photons = vec![];
        for i in 0..10 {
            for j in 0..10 {
                let p = Point3f::new(i as Float * 0.01 - 0.045, j as Float * 0.01 - 0.045, 0.0);
                photons.push(Photon::new(p, Spectrum::new(2.0), wi));
            }
        }
        photons
    }

    #[test]
    fn estimate_e_ignores_photons_from_behind() {
        let up = Normal3f::new(0.0, 0.0, 1.0);
        let maps = maps_with_direct(&grid_photons(Vector3f::new(0.0, 0.0, -1.0)), 10);
        let e = estimate_e(maps.map(PhotonCategory::Direct), 20, 1.0, &Point3f::zero(), &up);
        assert!(e.is_black());
    }

    #[test]
    fn estimate_e_divides_by_paths_and_area() {
        let up = Normal3f::new(0.0, 0.0, 1.0);
        let maps = maps_with_direct(&grid_photons(Vector3f::new(0.0, 0.0, 1.0)), 10);
        // Radius large enough to contain every photon without filling k.
        let e = estimate_e(maps.map(PhotonCategory::Direct), 1000, 1.0, &Point3f::zero(), &up);
        assert!(approx_eq!(Float, e.y(), 100.0 * 2.0 / (10.0 * PI), epsilon = 1e-3));
    }

    #[test]
    fn missing_or_empty_maps_give_zero() {
        let maps = PhotonMaps::new(0, 0, 0);
        let n = Normal3f::new(0.0, 0.0, 1.0);
        assert!(estimate_e(maps.map(PhotonCategory::Indirect), 10, 1.0, &Point3f::zero(), &n).is_black());
        let maps = maps_with_direct(&[], 0);
        assert!(estimate_e(maps.map(PhotonCategory::Direct), 10, 1.0, &Point3f::zero(), &n).is_black());
    }

    #[test]
    fn precompute_uses_front_and_back() {
        let up = Normal3f::new(0.0, 0.0, 1.0);
        let mut photons = grid_photons(Vector3f::new(0.0, 0.0, 1.0));
        photons.extend(grid_photons(Vector3f::new(0.0, 0.0, -1.0)));
        let maps = maps_with_direct(&photons, 10);
        let options = PhotonMapOptions {
            n_lookup: 1000,
            max_dist_squared: 1.0,
            n_threads: 2,
            ..Default::default()
        };
        let precomputer = RadiancePrecomputer::new(&maps, &options);

        let front_only = RadiancePhotonCandidate {
            photon: RadiancePhoton::new(Point3f::zero(), up),
            rho_r: Spectrum::new(0.5),
            rho_t: Spectrum::zero(),
        };
        let both = RadiancePhotonCandidate {
            rho_t: Spectrum::new(0.5),
            ..front_only
        };
        let e = 100.0 * 2.0 / (10.0 * PI);
        let radiance_map = precomputer.precompute(vec![front_only, both]);
        assert_eq!(radiance_map.len(), 2);
        let mut lo: Vec<Float> = radiance_map.iter().map(|rp| rp.lo.y()).collect();
        lo.sort_by(|a, b| a.total_cmp(b));
        assert!(approx_eq!(Float, lo[0], e * 0.5 * INV_PI, epsilon = 1e-3));
        assert!(approx_eq!(Float, lo[1], 2.0 * e * 0.5 * INV_PI, epsilon = 1e-3));
    }
}
