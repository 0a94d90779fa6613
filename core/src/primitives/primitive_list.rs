//! Primitive List

use super::*;

/// Aggregate that tests every primitive in turn. Scenes built for photon
/// mapping are small enough that a linear scan is sufficient.
pub struct PrimitiveList {
    /// The primitives.
    primitives: Vec<ArcPrimitive>,

    /// Bounds of all primitives.
    bounds: Bounds3f,
}

impl PrimitiveList {
    /// Create a new aggregate.
    ///
    /// * `primitives` - The primitives.
    pub fn new(primitives: Vec<ArcPrimitive>) -> Self {
        let bounds = primitives
            .iter()
            .fold(Bounds3f::empty(), |b, p| b.union(&p.world_bound()));
        Self { primitives, bounds }
    }

    /// Returns the number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns true if there are no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl Primitive for PrimitiveList {
    fn world_bound(&self) -> Bounds3f {
        self.bounds
    }

    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction> {
        // Each hit shortens `r.t_max` so the last one found is the closest.
        let mut closest = None;
        for primitive in self.primitives.iter() {
            if let Some(isect) = primitive.intersect(r) {
                closest = Some(isect);
            }
        }
        closest
    }

    fn intersect_p(&self, r: &Ray) -> bool {
        self.primitives.iter().any(|p| p.intersect_p(r))
    }

    fn get_area_light(&self) -> Option<ArcAreaLight> {
        None
    }

    fn get_material(&self) -> Option<ArcMaterial> {
        None
    }

    fn compute_scattering_functions(&self, _si: &mut SurfaceInteraction, _mode: TransportMode) {
        warn!("PrimitiveList::compute_scattering_functions() should not be called");
    }
}
