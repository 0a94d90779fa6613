//! Photon map options

use photon_core::paramset::*;
use photon_core::pbrt::*;

/// Number of indirect photons around a shading point whose directions guide
/// the photon-driven final gather strategy.
pub const GATHER_PHOTONS: usize = 50;

/// Configuration of the photon mapping integrator.
#[derive(Clone, Debug, PartialEq)]
pub struct PhotonMapOptions {
    /// Number of caustic photons to store.
    pub caustic_photons: usize,

    /// Number of indirect photons to store.
    pub indirect_photons: usize,

    /// Number of volume photons to store.
    pub volume_photons: usize,

    /// Number of photons used for density estimation.
    pub n_lookup: usize,

    /// Maximum specular recursion depth.
    pub max_specular_depth: usize,

    /// Squared maximum search distance for photon lookups.
    pub max_dist_squared: Float,

    /// Whether to do final gathering.
    pub final_gather: bool,

    /// Number of gather rays per strategy.
    pub gather_samples: usize,

    /// Russian roulette threshold. Stored but unused.
    pub rr_threshold: Float,

    /// Cosine of the cone angle used by the photon-driven gather strategy.
    pub cos_gather_angle: Float,

    /// Volume ray marching step size.
    pub step_size: Float,

    /// Number of worker threads for radiance precomputation; 0 uses all
    /// logical CPUs.
    pub n_threads: usize,

    /// Sequence index of the random number generator used while shooting.
    pub seed: u64,
}

impl Default for PhotonMapOptions {
    fn default() -> Self {
        Self::from(&ParamSet::new())
    }
}

impl From<&ParamSet> for PhotonMapOptions {
    /// Create `PhotonMapOptions` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let count = |name: &str, default: Int| -> usize {
            let n = params.find_one_int(name, default);
            if n < 0 {
                warn!("Negative '{}' {} treated as 0", name, n);
            }
            max(n, 0) as usize
        };

        let caustic_photons = count("causticphotons", 20000);
        let indirect_photons = count("indirectphotons", 100000);
        let volume_photons = count("volumephotons", 50000);
        let n_lookup = count("nused", 50);
        let max_specular_depth = count("maxdepth", 5);
        let final_gather = params.find_one_bool("finalgather", true);
        let gather_samples = count("finalgathersamples", 32);
        let mut max_dist = params.find_one_float("maxdist", 0.1);
        let rr_threshold = params.find_one_float("rrthreshold", 0.05);
        let gather_angle = params.find_one_float("gatherangle", 10.0);
        let mut step_size = params.find_one_float("stepsize", 1.0);
        let n_threads = count("nthreads", 0);
        let seed = count("seed", 0) as u64;

        if n_lookup == 0 {
            warn!("'nused' is 0; photon density estimates will be black");
        }
        if max_dist <= 0.0 {
            warn!("Invalid 'maxdist' {}; using 0.1", max_dist);
            max_dist = 0.1;
        }
        if step_size <= 0.0 {
            warn!("Invalid 'stepsize' {}; using 1", step_size);
            step_size = 1.0;
        }

        Self {
            caustic_photons,
            indirect_photons,
            volume_photons,
            n_lookup,
            max_specular_depth,
            max_dist_squared: max_dist * max_dist,
            final_gather,
            gather_samples: max(1, gather_samples / 2),
            rr_threshold,
            cos_gather_angle: radians(gather_angle).cos(),
            step_size,
            n_threads,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn defaults() {
        let options = PhotonMapOptions::default();
        assert_eq!(options.caustic_photons, 20000);
        assert_eq!(options.indirect_photons, 100000);
        assert_eq!(options.volume_photons, 50000);
        assert_eq!(options.n_lookup, 50);
        assert_eq!(options.max_specular_depth, 5);
        assert!(approx_eq!(Float, options.max_dist_squared, 0.01, epsilon = 1e-7));
        assert!(options.final_gather);
        assert_eq!(options.gather_samples, 16);
        assert!(approx_eq!(Float, options.cos_gather_angle, 0.98480775, epsilon = 1e-6));
        assert_eq!(options.step_size, 1.0);
    }

    #[test]
    fn overrides() {
        let mut params = ParamSet::new();
        params.add_int("causticphotons", &[0]);
        params.add_int("finalgathersamples", &[1]);
        params.add_float("maxdist", &[0.5]);
        params.add_bool("finalgather", &[false]);
        params.add_int("indirectphotons", &[-3]);
        let options = PhotonMapOptions::from(&params);
        assert_eq!(options.caustic_photons, 0);
        assert_eq!(options.indirect_photons, 0);
        assert_eq!(options.gather_samples, 1);
        assert_eq!(options.max_dist_squared, 0.25);
        assert!(!options.final_gather);
    }
}
