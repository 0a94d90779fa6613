//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::medium::*;
use crate::pbrt::*;
use crate::primitives::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Scene.
#[derive(Clone)]
pub struct Scene {
    /// An aggregate of all primitives in the scene.
    pub aggregate: ArcPrimitive,

    /// All light sources in the scene.
    pub lights: Vec<ArcLight>,

    /// Optional participating medium.
    pub volume_region: Option<ArcVolumeRegion>,

    /// The bounding box of the scene geometry and the volume region.
    pub world_bound: Bounds3f,
}

impl Scene {
    /// Creates a new `Scene`.
    ///
    /// * `aggregate`     - An aggregate of all primitives in the scene.
    /// * `lights`        - All light sources in the scene.
    /// * `volume_region` - Optional participating medium.
    pub fn new(
        aggregate: ArcPrimitive,
        lights: Vec<ArcLight>,
        volume_region: Option<ArcVolumeRegion>,
    ) -> Self {
        let mut world_bound = aggregate.world_bound();
        if let Some(vr) = volume_region.as_ref() {
            world_bound = world_bound.union(&vr.world_bound());
        }

        Self {
            aggregate: Arc::clone(&aggregate),
            lights,
            volume_region,
            world_bound,
        }
    }

    /// Traces the ray into the scene and returns the `SurfaceInteraction` if
    /// an intersection occurred. The ray's `t_max` is set to the hit distance.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction> {
        self.aggregate.intersect(ray)
    }

    /// Traces the ray into the scene and returns whether or not an intersection
    /// occurred.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }

    /// Returns the beam transmittance along the ray through the volume region.
    /// Surfaces are ignored.
    ///
    /// * `ray`       - The ray.
    /// * `step_size` - Ray marching step size.
    /// * `offset`    - Offset in [0, 1) of the first marching sample.
    pub fn transmittance(&self, ray: &Ray, step_size: Float, offset: Float) -> Spectrum {
        match self.volume_region.as_ref() {
            Some(vr) => (-vr.tau(ray, step_size, offset)).exp(),
            None => Spectrum::one(),
        }
    }
}
