//! Disks

use photon_core::geometry::*;
use photon_core::interaction::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::sampling::concentric_sample_disk;

/// A disk defined directly in world space by its center and normal.
#[derive(Clone, Debug)]
pub struct Disk {
    /// Center of disk.
    pub center: Point3f,

    /// Unit surface normal.
    pub normal: Normal3f,

    /// Radius of disk.
    pub radius: Float,

    /// First tangent axis of the disk plane.
    s: Vector3f,

    /// Second tangent axis of the disk plane.
    t: Vector3f,
}

impl Disk {
    /// Create a new disk.
    ///
    /// * `center` - Center of disk.
    /// * `normal` - Surface normal. It does not need to be normalized.
    /// * `radius` - Radius of disk.
    pub fn new(center: Point3f, normal: Normal3f, radius: Float) -> Self {
        let normal = normal.normalize();
        let (s, t) = coordinate_system(&Vector3f::from(normal));
        Self {
            center,
            normal,
            radius,
            s,
            t,
        }
    }

    /// Returns the parametric distance and the hit point in local disk
    /// coordinates of a ray-disk intersection in `(RAY_EPSILON, r.t_max)`.
    ///
    /// * `r` - The ray.
    fn hit_local(&self, r: &Ray) -> Option<(Float, Float, Float)> {
        // Reject disk intersections for rays parallel to the disk's plane.
        let denom = self.normal.dot(&r.d);
        if denom == 0.0 {
            return None;
        }
        let t_shape_hit = self.normal.dot(&(self.center - r.o)) / denom;
        if t_shape_hit <= RAY_EPSILON || t_shape_hit >= r.t_max {
            return None;
        }

        // See if hit point is inside disk radius.
        let d = r.at(t_shape_hit) - self.center;
        let (x, y) = (d.dot(&self.s), d.dot(&self.t));
        if x * x + y * y > self.radius * self.radius {
            return None;
        }
        Some((t_shape_hit, x, y))
    }
}

impl Shape for Disk {
    /// Returns the shape type. Usually these are behind ArcShape and harder to
    /// debug. So this will be helpful.
    fn get_type(&self) -> &'static str {
        "disk"
    }

    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f {
        let n = Vector3f::from(self.normal);
        let e = Vector3f::new(
            self.radius * max(0.0, 1.0 - n.x * n.x).sqrt(),
            self.radius * max(0.0, 1.0 - n.y * n.y).sqrt(),
            self.radius * max(0.0, 1.0 - n.z * n.z).sqrt(),
        );
        Bounds3f::new(self.center - e, self.center + e)
    }

    /// Returns geometric details if a ray intersects the shape intersection.
    /// If there is no intersection, `None` is returned.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        let (t_shape_hit, x, y) = self.hit_local(r)?;

        // Find parametric representation of disk hit. The tangent axes are
        // scaled so dp/du x dp/dv points along the normal.
        let uv = Point2f::new(
            0.5 * (x / self.radius + 1.0),
            0.5 * (y / self.radius + 1.0),
        );
        let dpdu = self.s * (2.0 * self.radius);
        let dpdv = self.t * (2.0 * self.radius);

        let isect = SurfaceInteraction::new(
            self.center + self.s * x + self.t * y,
            uv,
            -r.d,
            dpdu,
            dpdv,
            Normal3f::zero(),
            Normal3f::zero(),
            r.time,
            false,
        );
        Some(Intersection::new(t_shape_hit, isect))
    }

    /// Returns `true` if a ray-shape intersection succeeds; otherwise `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.hit_local(r).is_some()
    }

    /// Returns the surface area of the shape.
    fn area(&self) -> Float {
        PI * self.radius * self.radius
    }

    /// Sample a point on the surface and return the PDF with respect to area on
    /// the surface.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let pd = concentric_sample_disk(u);
        let p = self.center + self.s * (pd.x * self.radius) + self.t * (pd.y * self.radius);
        let hit = Hit::new(p, 0.0, Vector3f::zero(), self.normal);
        (hit, 1.0 / self.area())
    }
}

impl From<&ParamSet> for Disk {
    /// Create a `Disk` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let center = params.find_one_point3f("center", Point3f::zero());
        let n = params.find_one_vector3f("normal", Vector3f::new(0.0, 0.0, 1.0));
        let normal = if n.length_squared() == 0.0 {
            warn!("Disk normal is zero. Using +z.");
            Normal3f::new(0.0, 0.0, 1.0)
        } else {
            Normal3f::from(n)
        };
        let radius = params.find_one_float("radius", 1.0);
        Self::new(center, normal, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn geometric_normal_matches_disk_normal() {
        let disk = Disk::new(Point3f::zero(), Normal3f::new(0.0, 1.0, 0.0), 2.0);
        let ray = Ray::new(Point3f::new(0.5, 3.0, -0.5), Vector3f::new(0.0, -1.0, 0.0), INFINITY, 0.0);
        let Intersection { t, isect } = disk.intersect(&ray).expect("hit");
        assert!(approx_eq!(Float, t, 3.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, isect.hit.n.y, 1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, isect.hit.p.y, 0.0, epsilon = 1e-5));
    }

    #[test]
    fn rays_outside_radius_miss() {
        let disk = Disk::new(Point3f::zero(), Normal3f::new(0.0, 0.0, 1.0), 1.0);
        let ray = Ray::new(Point3f::new(1.5, 0.0, 1.0), Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0);
        assert!(disk.intersect(&ray).is_none());
        assert!(!disk.intersect_p(&ray));
    }

    proptest! {
        #[test]
        fn sampled_points_lie_in_disk(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let center = Point3f::new(1.0, -2.0, 0.5);
            let disk = Disk::new(center, Normal3f::new(1.0, 1.0, 0.0), 0.75);
            let (hit, pdf) = disk.sample_area(&Point2f::new(u0, u1));
            let d = hit.p - center;
            prop_assert!(d.length() <= 0.75 + 1e-4);
            prop_assert!(abs(d.dot(&disk.normal)) < 1e-4);
            prop_assert!(approx_eq!(Float, pdf, 1.0 / disk.area(), epsilon = 1e-5));
        }
    }
}
