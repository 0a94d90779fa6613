//! Photon Shooter

use super::category::*;
use super::error::*;
use super::options::*;
use super::photon::*;
use super::volume_marcher::*;
use indicatif::ProgressBar;
use photon_core::app::create_progress_bar;
use photon_core::geometry::*;
use photon_core::integrator::*;
use photon_core::low_discrepancy::radical_inverse;
use photon_core::material::*;
use photon_core::pbrt::*;
use photon_core::reflection::*;
use photon_core::rng::*;
use photon_core::sampling::*;
use photon_core::scene::*;
use photon_core::spectrum::*;

/// Number of shots after which the stall heuristic is applied.
const STALL_CHECK_SHOTS: usize = 500_000;

/// Paths are cut after this many surface intersections.
const MAX_PATH_INTERSECTIONS: usize = 10;

/// Probability of keeping a non-specular surface hit as a radiance photon.
const RADIANCE_PHOTON_PROBABILITY: Float = 0.125;

/// Number of samples used to estimate reflectances of radiance photons.
pub(super) const RHO_SAMPLES: usize = 16;

/// A radiance photon waiting for its exitant radiance along with the
/// reflectance and transmittance of the surface it was found on.
#[derive(Copy, Clone, Debug)]
pub struct RadiancePhotonCandidate {
    /// The radiance photon.
    pub photon: RadiancePhoton,

    /// Hemispherical-hemispherical reflectance.
    pub rho_r: Spectrum,

    /// Hemispherical-hemispherical transmittance.
    pub rho_t: Spectrum,
}

/// Everything produced by the shooting pass.
pub struct ShootingResult {
    /// Photon maps of every category. Pending categories never exist here.
    pub maps: PhotonMaps,

    /// Candidates for radiance precomputation.
    pub radiance_candidates: Vec<RadiancePhotonCandidate>,

    /// Total number of light paths shot.
    pub shots: usize,
}

/// Traces photon paths from the lights until every photon category reaches
/// its target.
pub struct PhotonShooter<'a> {
    /// The scene.
    scene: &'a Scene,

    /// Integrator options.
    options: &'a PhotonMapOptions,
}

/// Mutable state shared by all paths of a shooting pass.
struct ShootingState {
    /// Photon collections.
    maps: PhotonMaps,

    /// Radiance photon candidates.
    candidates: Vec<RadiancePhotonCandidate>,

    /// Random numbers for roulette and later bounces.
    rng: RNG,

    /// Progress over the targeted categories.
    progress: ProgressBar,
}

impl ShootingState {
    /// Store a photon in a category and report progress. Logs when this
    /// completes the category.
    ///
    /// * `category` - The category.
    /// * `photon`   - The photon.
    /// * `shots`    - Number of light paths shot so far.
    fn store(&mut self, category: PhotonCategory, photon: Photon, shots: usize) {
        let state = &mut self.maps[category];
        if state.deposit(photon, shots) && state.target().is_some() {
            self.progress.inc(1);
            if state.is_done() {
                debug!("{} photon map complete after {} paths", category, shots);
            }
        }
    }
}

impl<'a> PhotonShooter<'a> {
    /// Create a new `PhotonShooter`.
    ///
    /// * `scene`   - The scene.
    /// * `options` - Integrator options.
    pub fn new(scene: &'a Scene, options: &'a PhotonMapOptions) -> Self {
        Self { scene, options }
    }

    /// Shoot photons until every category with a nonzero target is full.
    /// The direct photon map is built last from every first hit. Fails if
    /// the scene has no lights or stores photons too slowly.
    pub fn shoot(&self) -> Result<ShootingResult, PhotonMapError> {
        let volume_target = if self.scene.volume_region.is_some() {
            self.options.volume_photons
        } else {
            0
        };

        let mut state = ShootingState {
            maps: PhotonMaps::new(
                self.options.caustic_photons,
                self.options.indirect_photons,
                volume_target,
            ),
            candidates: vec![],
            rng: RNG::new(self.options.seed),
            progress: create_progress_bar(
                (self.options.caustic_photons + self.options.indirect_photons + volume_target) as u64,
                "Shooting photons",
            ),
        };

        let mut shots = 0;
        if !state.maps.all_done() {
            let light_distr = compute_light_power_distribution(self.scene).ok_or(PhotonMapError::NoLights)?;

            while !state.maps.all_done() {
                shots += 1;

                // Give up if we're not storing enough photons.
                if shots > STALL_CHECK_SHOTS && state.maps.any_unsuccessful(shots) {
                    state.progress.abandon();
                    let count = |c: PhotonCategory| state.maps[c].stored();
                    let target = |c: PhotonCategory| state.maps[c].target().unwrap_or(0);
                    let err = PhotonMapError::InsufficientPhotons {
                        shots,
                        caustic: count(PhotonCategory::Caustic),
                        caustic_target: target(PhotonCategory::Caustic),
                        indirect: count(PhotonCategory::Indirect),
                        indirect_target: target(PhotonCategory::Indirect),
                        volume: count(PhotonCategory::Volume),
                        volume_target: target(PhotonCategory::Volume),
                    };
                    error!("{}", err);
                    return Err(err);
                }

                self.trace_photon(shots, &light_distr, &mut state);
            }
        }
        state.progress.finish_and_clear();

        state.maps[PhotonCategory::Direct].build(shots);
        for category in PhotonCategory::ALL {
            if let Some(built) = state.maps.map(category) {
                info!("{} photons: {} stored from {} paths", category, built.map.len(), built.paths);
            }
        }
        info!("{} radiance photon candidates", state.candidates.len());

        Ok(ShootingResult {
            maps: state.maps,
            radiance_candidates: state.candidates,
            shots,
        })
    }

    /// Follow one photon path through the scene and deposit photons along
    /// it.
    ///
    /// * `shots`       - Number of the path, starting at 1. Indexes the low
    ///                   discrepancy samples.
    /// * `light_distr` - Light selection distribution.
    /// * `state`       - Shooting state.
    fn trace_photon(&self, shots: usize, light_distr: &Distribution1D, state: &mut ShootingState) {
        let index = shots as u64;

        // Choose light to shoot photon from.
        let (light_num, light_pdf, _) = light_distr.sample_discrete(radical_inverse(4, index));
        if light_pdf == 0.0 {
            return;
        }
        let light = &self.scene.lights[light_num];

        // Generate `photon_ray` from light source and initialize `alpha`.
        let u_pos = Point2f::new(radical_inverse(0, index), radical_inverse(1, index));
        let u_dir = Point2f::new(radical_inverse(2, index), radical_inverse(3, index));
        let le = light.sample_le(&u_pos, &u_dir, 0.0);
        let Some(weight) = le.weight() else {
            trace!("light sample carries no energy");
            return;
        };
        let mut alpha = weight / light_pdf;
        let mut photon_ray = le.ray;

        let marcher = self
            .scene
            .volume_region
            .as_ref()
            .map(|vr| VolumeMarcher::new(vr.as_ref(), self.options.step_size));

        // Follow photon path through scene and record intersections.
        let mut specular_path = false;
        let mut n_intersections = 0;
        loop {
            let mut ray = photon_ray.clone();
            let isect = self.scene.intersect(&mut ray);
            let d = ray.d.normalize();

            // Handle photon/volume interaction.
            if let Some(marcher) = marcher.as_ref() {
                let t_end = if isect.is_some() {
                    ray.t_max * ray.d.length()
                } else {
                    INFINITY
                };
                match marcher.march(&ray, t_end, &mut state.rng) {
                    MarchEvent::Interaction { p, tr, .. } => {
                        alpha *= tr;
                        state.store(PhotonCategory::Volume, Photon::new(p, alpha, -d), shots);

                        if marcher.albedo(&p, &d) < state.rng.uniform_float() {
                            trace!("photon absorbed in volume");
                            return;
                        }
                        alpha *= INV_FOUR_PI;
                        let wi = uniform_sample_sphere(&state.rng.uniform_point2f());
                        photon_ray = Ray::new(p, wi, INFINITY, ray.time);
                        continue;
                    }
                    MarchEvent::PassThrough { tr } => alpha *= tr,
                }
            }

            let Some(mut isect) = isect else {
                break;
            };

            isect.compute_scattering_functions(&ray, TransportMode::Importance);
            let Some(bsdf) = isect.bsdf.as_ref() else {
                photon_ray = isect.spawn_ray(&ray.d);
                continue;
            };
            n_intersections += 1;

            // Handle photon/surface intersection.
            let wo = -d;
            if bsdf.has_non_specular() {
                // Deposit photon at surface.
                let photon = Photon::new(isect.hit.p, alpha, wo);
                let category = if n_intersections == 1 {
                    PhotonCategory::Direct
                } else if specular_path {
                    PhotonCategory::Caustic
                } else {
                    PhotonCategory::Indirect
                };
                state.store(category, photon, shots);

                if self.options.final_gather && state.rng.uniform_float() < RADIANCE_PHOTON_PROBABILITY {
                    // Store data for radiance photon.
                    let n = isect.shading.n.face_forward(&wo);
                    let (u1, u2) = rho_samples(&mut state.rng);
                    state.candidates.push(RadiancePhotonCandidate {
                        photon: RadiancePhoton::new(isect.hit.p, n),
                        rho_r: bsdf.rho_hh(&u1, &u2, BxDFType::BSDF_ALL_REFLECTION),
                        rho_t: bsdf.rho_hh(&u1, &u2, BxDFType::BSDF_ALL_TRANSMISSION),
                    });
                }
            }

            // Sample new photon ray direction. The first bounce uses low
            // discrepancy samples.
            let (u, u_comp) = if n_intersections == 1 {
                (
                    Point2f::new(radical_inverse(5, index), radical_inverse(6, index)),
                    radical_inverse(7, index),
                )
            } else {
                (state.rng.uniform_point2f(), state.rng.uniform_float())
            };
            let BxDFSample { f, pdf, wi, bxdf_type } = bsdf.sample_f(&wo, &u, u_comp, BxDFType::BSDF_ALL);
            if f.is_black() || pdf == 0.0 || alpha.y() <= 0.0 {
                break;
            }

            // Compute new photon weight and possibly terminate with Russian roulette.
            let alpha_new = alpha * f * (wi.abs_dot(&isect.shading.n) / pdf);
            let continue_prob = min(1.0, alpha_new.y() / alpha.y());
            if state.rng.uniform_float() > continue_prob || n_intersections > MAX_PATH_INTERSECTIONS {
                break;
            }
            alpha = alpha_new / continue_prob;
            specular_path =
                (n_intersections == 1 || specular_path) && bxdf_type.contains(BxDFType::BSDF_SPECULAR);
            photon_ray = isect.spawn_ray(&wi);
        }
    }
}

/// Returns sample sets for estimating hemispherical-hemispherical
/// reflectance.
///
/// * `rng` - Random number generator.
fn rho_samples(rng: &mut RNG) -> (Vec<Point2f>, Vec<Point2f>) {
    let u1 = (0..RHO_SAMPLES).map(|_| rng.uniform_point2f()).collect();
    let u2 = (0..RHO_SAMPLES).map(|_| rng.uniform_point2f()).collect();
    (u1, u2)
}
