//! Photon Map Integrator

use super::category::*;
use super::error::*;
use super::kd_tree::*;
use super::options::*;
use super::photon::*;
use super::radiance::*;
use super::shooter::*;
use photon_core::geometry::*;
use photon_core::paramset::*;
use photon_core::rng::*;
use photon_core::scene::*;
use photon_core::spectrum::*;

/// Estimates radiance along camera rays from photon maps built by shooting
/// photons from the lights in a preprocessing pass.
pub struct PhotonMapIntegrator {
    /// Options.
    pub(super) options: PhotonMapOptions,

    /// Photon maps. Only present after a successful `preprocess()`.
    pub(super) maps: Option<PhotonMaps>,

    /// Radiance photons used by final gathering.
    pub(super) radiance_map: Option<PhotonMap<RadiancePhoton>>,
}

impl PhotonMapIntegrator {
    /// Create a new `PhotonMapIntegrator`.
    ///
    /// * `options` - Options.
    pub fn new(options: PhotonMapOptions) -> Self {
        Self {
            options,
            maps: None,
            radiance_map: None,
        }
    }

    /// Returns the options.
    pub fn options(&self) -> &PhotonMapOptions {
        &self.options
    }

    /// Returns the photon maps built by `preprocess()`.
    pub fn photon_maps(&self) -> Option<&PhotonMaps> {
        self.maps.as_ref()
    }

    /// Returns the radiance photon map built by `preprocess()` when final
    /// gathering is enabled.
    pub fn radiance_map(&self) -> Option<&PhotonMap<RadiancePhoton>> {
        self.radiance_map.as_ref()
    }

    /// Returns the finished photon map of a category.
    ///
    /// * `category` - The category.
    pub(super) fn map(&self, category: PhotonCategory) -> Option<&CategoryMap> {
        self.maps.as_ref().and_then(|maps| maps.map(category))
    }

    /// Shoot photons, build the photon maps and, when final gathering is
    /// enabled, precompute radiance photons. Must complete before `li()` is
    /// called. On failure no maps are kept.
    ///
    /// * `scene` - The scene.
    pub fn preprocess(&mut self, scene: &Scene) -> Result<(), PhotonMapError> {
        self.maps = None;
        self.radiance_map = None;

        let ShootingResult {
            maps,
            radiance_candidates,
            shots,
        } = PhotonShooter::new(scene, &self.options).shoot()?;
        info!("Photon shooting finished after {} paths", shots);

        if self.options.final_gather {
            let precomputer = RadiancePrecomputer::new(&maps, &self.options);
            self.radiance_map = Some(precomputer.precompute(radiance_candidates));
        }
        self.maps = Some(maps);
        Ok(())
    }

    /// Returns the radiance arriving at the ray origin along the ray.
    ///
    /// * `ray`   - The ray.
    /// * `scene` - The scene.
    /// * `rng`   - Random number generator.
    /// * `depth` - Specular recursion depth; 0 for camera rays.
    pub fn li(&self, ray: &Ray, scene: &Scene, rng: &mut RNG, depth: usize) -> Spectrum {
        let mut r = ray.clone();
        let ls = match scene.intersect(&mut r) {
            Some(isect) => self.surface_li(isect, &r, scene, rng, depth),
            None => scene.lights.iter().fold(Spectrum::zero(), |l, light| l + light.le(&r)),
        };

        if scene.volume_region.is_none() {
            return ls;
        }
        let tr = self.transmittance(scene, &r, rng);
        let lv = self.volume_li(scene, &r, rng);
        tr * ls + lv
    }
}

impl From<&ParamSet> for PhotonMapIntegrator {
    /// Create a `PhotonMapIntegrator` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        Self::new(PhotonMapOptions::from(params))
    }
}
