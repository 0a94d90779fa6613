//! Material

use crate::interaction::*;
use std::sync::Arc;

/// Light transport mode enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportMode {
    /// Indicates incident ray that intersected a point started at the camera.
    Radiance,

    /// Indicates incident ray that intersected a point started at the light
    /// source.
    Importance,
}

/// Material trait provides common behavior.
pub trait Material: Send + Sync {
    /// Initializes representations of the light-scattering properties of the
    /// material at the intersection point on the surface and stores the BSDF
    /// in `si.bsdf`.
    ///
    /// * `si`   - The surface interaction at the intersection.
    /// * `mode` - Transport mode.
    fn compute_scattering_functions(&self, si: &mut SurfaceInteraction, mode: TransportMode);
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material>;
