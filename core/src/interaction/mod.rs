//! Interactions

use crate::geometry::*;
use crate::pbrt::*;

mod surface_interaction;

pub use surface_interaction::*;

/// Hit provides common data shared by surface and volume interactions.
#[derive(Copy, Clone, Debug, Default)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Time when interaction occurred.
    pub time: Float,

    /// The negative ray direction (outgoing direction used when computing
    /// lighting at points).
    pub wo: Vector3f,

    /// Surface normal at the point `p`. Zero for points inside a volume.
    pub n: Normal3f,
}

impl Hit {
    /// Create a new hit.
    ///
    /// `p`    - Point of interaction.
    /// `time` - Time when interaction occurred.
    /// `wo`   - The negative ray direction.
    /// `n`    - Surface normal at the point `p`.
    pub fn new(p: Point3f, time: Float, wo: Vector3f, n: Normal3f) -> Self {
        Self { p, time, wo, n }
    }

    /// Create a new hit at a point that has no surface normal or outgoing
    /// direction.
    ///
    /// `p`    - Point of interaction.
    /// `time` - Time when interaction occurred.
    pub fn new_minimal(p: Point3f, time: Float) -> Self {
        Self {
            p,
            time,
            wo: Vector3f::zero(),
            n: Normal3f::zero(),
        }
    }

    /// Returns `true` if this is a surface interaction.
    pub fn is_surface_interaction(&self) -> bool {
        self.n != Normal3f::zero()
    }

    /// Returns the ray origin moved off the surface towards the side `w`
    /// points to so that the spawned ray does not hit the surface it left.
    ///
    /// * `w` - Direction of the spawned ray.
    pub fn offset_origin(&self, w: &Vector3f) -> Point3f {
        if !self.is_surface_interaction() {
            return self.p;
        }
        let offset = Vector3f::from(self.n) * RAY_EPSILON;
        if w.dot(&self.n) < 0.0 {
            self.p - offset
        } else {
            self.p + offset
        }
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        Ray::new(self.offset_origin(d), *d, INFINITY, self.time)
    }

    /// Spawn's a new ray towards another point. The ray's extent stops just
    /// short of the point.
    ///
    /// * `p` - The target point.
    pub fn spawn_ray_to_point(&self, p: &Point3f) -> Ray {
        let origin = self.offset_origin(&(*p - self.p));
        Ray::new(origin, *p - origin, 1.0 - SHADOW_EPSILON, self.time)
    }

    /// Spawn's a new ray towards another interaction.
    ///
    /// * `hit` - The interaction.
    pub fn spawn_ray_to_hit(&self, hit: &Hit) -> Ray {
        let origin = self.offset_origin(&(hit.p - self.p));
        let target = hit.offset_origin(&(origin - hit.p));
        Ray::new(origin, target - origin, 1.0 - SHADOW_EPSILON, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_ray_leaves_on_direction_side() {
        let hit = Hit::new(
            Point3f::zero(),
            0.0,
            Vector3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, 1.0),
        );
        assert!(hit.spawn_ray(&Vector3f::new(0.0, 0.0, 1.0)).o.z > 0.0);
        assert!(hit.spawn_ray(&Vector3f::new(0.0, 0.0, -1.0)).o.z < 0.0);
    }

    #[test]
    fn volume_points_are_not_offset() {
        let hit = Hit::new_minimal(Point3f::new(1.0, 2.0, 3.0), 0.0);
        let ray = hit.spawn_ray_to_point(&Point3f::new(1.0, 2.0, 5.0));
        assert_eq!(ray.o, hit.p);
        assert!(ray.t_max < 1.0);
    }
}
