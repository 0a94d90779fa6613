//! Photons

use photon_core::geometry::*;
use photon_core::pbrt::*;
use photon_core::spectrum::*;

/// Anything that can be stored in a `PhotonMap`.
pub trait MapPoint {
    /// Returns the position used to index the point.
    fn position(&self) -> &Point3f;
}

/// A photon deposited on a surface or inside a volume.
#[derive(Copy, Clone, Debug)]
pub struct Photon {
    /// Position.
    pub p: Point3f,

    /// Accumulated path weight.
    pub alpha: Spectrum,

    /// Direction the photon arrived from, pointing away from `p`.
    pub wi: Vector3f,
}

impl Photon {
    /// Create a new `Photon`.
    ///
    /// * `p`     - Position.
    /// * `alpha` - Accumulated path weight.
    /// * `wi`    - Incident direction pointing away from `p`.
    pub fn new(p: Point3f, alpha: Spectrum, wi: Vector3f) -> Self {
        Self { p, alpha, wi }
    }
}

impl MapPoint for Photon {
    fn position(&self) -> &Point3f {
        &self.p
    }
}

/// A surface point with cached exitant radiance.
#[derive(Copy, Clone, Debug)]
pub struct RadiancePhoton {
    /// Position.
    pub p: Point3f,

    /// Surface normal facing the side the photon arrived from.
    pub n: Normal3f,

    /// Precomputed exitant radiance.
    pub lo: Spectrum,
}

impl RadiancePhoton {
    /// Create a new `RadiancePhoton` with no radiance.
    ///
    /// * `p` - Position.
    /// * `n` - Surface normal.
    pub fn new(p: Point3f, n: Normal3f) -> Self {
        Self {
            p,
            n,
            lo: Spectrum::zero(),
        }
    }
}

impl MapPoint for RadiancePhoton {
    fn position(&self) -> &Point3f {
        &self.p
    }
}

/// Smooth density estimation kernel `3/(π r²) (1 - d²/r²)²` that integrates
/// to one over the disk of radius `r`.
///
/// * `photon`               - The photon.
/// * `p`                    - Lookup position.
/// * `max_distance_squared` - Squared radius `r²` of the lookup.
#[inline]
pub fn kernel(photon: &Photon, p: &Point3f, max_distance_squared: Float) -> Float {
    let s = 1.0 - photon.p.distance_squared(p) / max_distance_squared;
    3.0 / (max_distance_squared * PI) * s * s
}
