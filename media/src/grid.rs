//! Grid Density Volume

use photon_core::geometry::*;
use photon_core::medium::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::spectrum::*;

/// Implements volume densities at a regular 3D grid of positions spanning a
/// box. Densities between the sample points are trilinearly interpolated and
/// scale the σa, σs and emission of the region.
#[derive(Clone, Debug)]
pub struct GridDensityVolume {
    /// Extent of the region.
    bounds: Bounds3f,

    /// Absorption cross section `σa` at unit density.
    sigma_a: Spectrum,

    /// Scattering coefficient `σs` at unit density.
    sigma_s: Spectrum,

    /// Emitted radiance at unit density.
    le: Spectrum,

    /// The Henyey-Greenstein phase function.
    phase: HenyeyGreenstein,

    /// Grid size in x-direction.
    nx: usize,

    /// Grid size in y-direction.
    ny: usize,

    /// Grid size in z-direction.
    nz: usize,

    /// Density values in the grid stored in x, then y, then z order.
    density: Vec<Float>,
}

impl GridDensityVolume {
    /// Create a new `GridDensityVolume`. Returns `None` if the number of
    /// density values does not match the grid size.
    ///
    /// * `bounds`  - Extent of the region.
    /// * `sigma_a` - Absorption cross section `σa` at unit density.
    /// * `sigma_s` - Scattering coefficient `σs` at unit density.
    /// * `le`      - Emitted radiance at unit density.
    /// * `g`       - The asymmetry parameter for Henyey-Greenstein phase
    ///               function.
    /// * `nx`      - Grid size in x-direction.
    /// * `ny`      - Grid size in y-direction.
    /// * `nz`      - Grid size in z-direction.
    /// * `density` - Density values in the grid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bounds: Bounds3f,
        sigma_a: Spectrum,
        sigma_s: Spectrum,
        le: Spectrum,
        g: Float,
        nx: usize,
        ny: usize,
        nz: usize,
        density: Vec<Float>,
    ) -> Option<Self> {
        if nx * ny * nz != density.len() || density.is_empty() {
            error!(
                "GridDensityVolume has {} density values; expected nx*ny*nz = {}",
                density.len(),
                nx * ny * nz
            );
            return None;
        }

        Some(Self {
            bounds,
            sigma_a,
            sigma_s,
            le,
            phase: HenyeyGreenstein::new(g),
            nx,
            ny,
            nz,
            density,
        })
    }

    /// Reconstruct the volume density function at the given position.
    ///
    /// * `p` - World space position.
    pub fn density(&self, p: &Point3f) -> Float {
        if !self.bounds.inside(p) {
            return 0.0;
        }

        // Compute voxel coordinates and offsets for `p`.
        let o = self.bounds.offset(p);
        let vx = o.x * self.nx as Float - 0.5;
        let vy = o.y * self.ny as Float - 0.5;
        let vz = o.z * self.nz as Float - 0.5;
        let (ix, iy, iz) = (vx.floor() as i64, vy.floor() as i64, vz.floor() as i64);
        let (dx, dy, dz) = (vx - ix as Float, vy - iy as Float, vz - iz as Float);

        // Trilinearly interpolate density values to compute local density.
        let d00 = lerp(dx, self.d(ix, iy, iz), self.d(ix + 1, iy, iz));
        let d10 = lerp(dx, self.d(ix, iy + 1, iz), self.d(ix + 1, iy + 1, iz));
        let d01 = lerp(dx, self.d(ix, iy, iz + 1), self.d(ix + 1, iy, iz + 1));
        let d11 = lerp(dx, self.d(ix, iy + 1, iz + 1), self.d(ix + 1, iy + 1, iz + 1));
        let d0 = lerp(dy, d00, d10);
        let d1 = lerp(dy, d01, d11);
        lerp(dz, d0, d1)
    }

    /// Returns the density at the given integer sample position clamped to
    /// the grid.
    ///
    /// * `x` - Sample position in x-direction.
    /// * `y` - Sample position in y-direction.
    /// * `z` - Sample position in z-direction.
    fn d(&self, x: i64, y: i64, z: i64) -> Float {
        let x = clamp(x, 0, self.nx as i64 - 1) as usize;
        let y = clamp(y, 0, self.ny as i64 - 1) as usize;
        let z = clamp(z, 0, self.nz as i64 - 1) as usize;
        self.density[(z * self.ny + y) * self.nx + x]
    }
}

impl VolumeRegion for GridDensityVolume {
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    fn sigma_a(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
        self.sigma_a * self.density(p)
    }

    fn sigma_s(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
        self.sigma_s * self.density(p)
    }

    fn sigma_t(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
        (self.sigma_a + self.sigma_s) * self.density(p)
    }

    fn lve(&self, p: &Point3f, _w: &Vector3f) -> Spectrum {
        self.le * self.density(p)
    }

    fn p(&self, p: &Point3f, w: &Vector3f, wp: &Vector3f) -> Float {
        if self.bounds.inside(p) {
            self.phase.p(w, wp)
        } else {
            0.0
        }
    }
}

impl TryFrom<&ParamSet> for GridDensityVolume {
    type Error = String;

    /// Create a `GridDensityVolume` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn try_from(params: &ParamSet) -> Result<Self, Self::Error> {
        let sigma_a = params.find_one_spectrum("sigma_a", Spectrum::one());
        let sigma_s = params.find_one_spectrum("sigma_s", Spectrum::one());
        let le = params.find_one_spectrum("Le", Spectrum::zero());
        let g = params.find_one_float("g", 0.0);
        let p0 = params.find_one_point3f("p0", Point3f::zero());
        let p1 = params.find_one_point3f("p1", Point3f::new(1.0, 1.0, 1.0));
        let nx = params.find_one_int("nx", 1).max(1) as usize;
        let ny = params.find_one_int("ny", 1).max(1) as usize;
        let nz = params.find_one_int("nz", 1).max(1) as usize;
        let density = params.find_float("density");
        GridDensityVolume::new(Bounds3f::new(p0, p1), sigma_a, sigma_s, le, g, nx, ny, nz, density)
            .ok_or_else(|| String::from("GridDensityVolume: density does not match grid size"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn ramp() -> GridDensityVolume {
        // Density 0 on the z = 0 face rising to 1 on the z = 1 face.
        GridDensityVolume::new(
            Bounds3f::new(Point3f::zero(), Point3f::new(1.0, 1.0, 1.0)),
            Spectrum::new(1.0),
            Spectrum::new(1.0),
            Spectrum::zero(),
            0.0,
            1,
            1,
            2,
            vec![0.0, 1.0],
        )
        .expect("grid")
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let bounds = Bounds3f::new(Point3f::zero(), Point3f::new(1.0, 1.0, 1.0));
        let grid = GridDensityVolume::new(
            bounds,
            Spectrum::one(),
            Spectrum::one(),
            Spectrum::zero(),
            0.0,
            2,
            2,
            2,
            vec![1.0; 7],
        );
        assert!(grid.is_none());
    }

    #[test]
    fn from_params_reads_grid() {
        let mut params = ParamSet::new();
        params.add_int("nz", &[2]);
        params.add_float("density", &[0.0, 1.0]);
        let grid = GridDensityVolume::try_from(&params).expect("grid");
        assert!(approx_eq!(Float, grid.density(&Point3f::new(0.5, 0.5, 0.5)), 0.5, epsilon = 1e-6));

        params.add_float("density", &[1.0]);
        assert!(GridDensityVolume::try_from(&params).is_err());
    }

    #[test]
    fn density_interpolates_between_voxel_centers() {
        let grid = ramp();
        assert!(approx_eq!(Float, grid.density(&Point3f::new(0.5, 0.5, 0.25)), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, grid.density(&Point3f::new(0.5, 0.5, 0.5)), 0.5, epsilon = 1e-6));
        assert!(approx_eq!(Float, grid.density(&Point3f::new(0.5, 0.5, 0.75)), 1.0, epsilon = 1e-6));
        assert_eq!(grid.density(&Point3f::new(0.5, 0.5, 1.5)), 0.0);
    }

    proptest! {
        #[test]
        fn density_stays_within_grid_range(
            x in 0.0..1.0f32,
            y in 0.0..1.0f32,
            z in 0.0..1.0f32,
        ) {
            let d = ramp().density(&Point3f::new(x, y, z));
            prop_assert!((0.0..=1.0).contains(&d));
        }
    }
}
