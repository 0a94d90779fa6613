//! Spheres

use photon_core::geometry::*;
use photon_core::interaction::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::sampling::*;

/// A sphere defined directly in world space.
#[derive(Clone, Debug)]
pub struct Sphere {
    /// Center of sphere.
    pub center: Point3f,

    /// Radius of sphere.
    pub radius: Float,

    /// Indicates whether the surface normal points inwards.
    pub reverse_orientation: bool,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center`              - Center of sphere.
    /// * `radius`              - Radius of sphere.
    /// * `reverse_orientation` - Indicates whether their surface normal directions
    ///                           should be reversed from the default
    pub fn new(center: Point3f, radius: Float, reverse_orientation: bool) -> Self {
        Self {
            center,
            radius,
            reverse_orientation,
        }
    }

    /// Returns the nearest parametric distance of a ray-sphere intersection
    /// in `(RAY_EPSILON, r.t_max)`.
    ///
    /// * `r` - The ray.
    fn hit_distance(&self, r: &Ray) -> Option<Float> {
        let oc = r.o - self.center;
        let a = r.d.length_squared();
        let b = 2.0 * r.d.dot(&oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let (t0, t1) = quadratic(a, b, c)?;
        if t0 >= r.t_max || t1 <= RAY_EPSILON {
            return None;
        }
        let t_shape_hit = if t0 > RAY_EPSILON { t0 } else { t1 };
        if t_shape_hit >= r.t_max {
            return None;
        }
        Some(t_shape_hit)
    }
}

impl Shape for Sphere {
    /// Returns the shape type. Usually these are behind ArcShape and harder to
    /// debug. So this will be helpful.
    fn get_type(&self) -> &'static str {
        "sphere"
    }

    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    /// Returns geometric details if a ray intersects the shape intersection.
    /// If there is no intersection, `None` is returned.
    ///
    /// * `r` - The ray.
    fn intersect<'scene>(&self, r: &Ray) -> Option<Intersection<'scene>> {
        let t_shape_hit = self.hit_distance(r)?;

        // Refine sphere intersection point in local coordinates.
        let mut p = r.at(t_shape_hit) - self.center;
        p *= self.radius / p.length();
        if p.x == 0.0 && p.y == 0.0 {
            p.x = 1e-5 * self.radius;
        }

        // Find parametric representation of sphere hit.
        let mut phi = p.y.atan2(p.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let u = phi / TWO_PI;
        let cos_theta = clamp(p.z / self.radius, -1.0, 1.0);
        let theta = cos_theta.acos();
        let v = 1.0 - theta * INV_PI;

        // Compute sphere dp/du and dp/dv.
        let z_radius = (p.x * p.x + p.y * p.y).sqrt();
        let cos_phi = p.x / z_radius;
        let sin_phi = p.y / z_radius;
        let dpdu = Vector3f::new(-TWO_PI * p.y, TWO_PI * p.x, 0.0);
        let dpdv = Vector3f::new(p.z * cos_phi, p.z * sin_phi, -self.radius * theta.sin()) * -PI;

        // Compute sphere dn/du and dn/dv.
        let d2pduu = Vector3f::new(p.x, p.y, 0.0) * (-TWO_PI * TWO_PI);
        let d2pduv = Vector3f::new(-sin_phi, cos_phi, 0.0) * (-PI * p.z * TWO_PI);
        let d2pdvv = p * (-PI * PI);
        let (dndu, dndv) = weingarten(&dpdu, &dpdv, &d2pduu, &d2pduv, &d2pdvv);

        let isect = SurfaceInteraction::new(
            r.at(t_shape_hit),
            Point2f::new(u, v),
            -r.d,
            dpdu,
            dpdv,
            dndu,
            dndv,
            r.time,
            self.reverse_orientation,
        );
        Some(Intersection::new(t_shape_hit, isect))
    }

    /// Returns `true` if a ray-shape intersection succeeds; otherwise `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.hit_distance(r).is_some()
    }

    /// Returns the surface area of the shape.
    fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    /// Sample a point on the surface and return the PDF with respect to area on
    /// the surface.
    ///
    /// * `u` - Sample value to use.
    fn sample_area(&self, u: &Point2f) -> (Hit, Float) {
        let d = uniform_sample_sphere(u);
        let p = self.center + d * self.radius;
        let mut n = Normal3f::from(d);
        if self.reverse_orientation {
            n = -n;
        }
        (Hit::new(p, 0.0, Vector3f::zero(), n), 1.0 / self.area())
    }
}

/// Computes the normal derivatives dn/du and dn/dv from the first and second
/// partial derivatives of a surface.
///
/// * `dpdu`   - ∂p/∂u.
/// * `dpdv`   - ∂p/∂v.
/// * `d2pduu` - ∂²p/∂u².
/// * `d2pduv` - ∂²p/∂u∂v.
/// * `d2pdvv` - ∂²p/∂v².
fn weingarten(
    dpdu: &Vector3f,
    dpdv: &Vector3f,
    d2pduu: &Vector3f,
    d2pduv: &Vector3f,
    d2pdvv: &Vector3f,
) -> (Normal3f, Normal3f) {
    // Compute coefficients for fundamental forms.
    let e1 = dpdu.dot(dpdu);
    let f1 = dpdu.dot(dpdv);
    let g1 = dpdv.dot(dpdv);
    let n = dpdu.cross(dpdv).normalize();
    let e2 = n.dot(d2pduu);
    let f2 = n.dot(d2pduv);
    let g2 = n.dot(d2pdvv);

    let egf2 = e1 * g1 - f1 * f1;
    if egf2 == 0.0 {
        return (Normal3f::zero(), Normal3f::zero());
    }
    let inv_egf2 = 1.0 / egf2;
    let dndu = *dpdu * ((f2 * f1 - e2 * g1) * inv_egf2) + *dpdv * ((e2 * f1 - f2 * e1) * inv_egf2);
    let dndv = *dpdu * ((g2 * f1 - f2 * g1) * inv_egf2) + *dpdv * ((f2 * f1 - g2 * e1) * inv_egf2);
    (Normal3f::from(dndu), Normal3f::from(dndv))
}

impl From<&ParamSet> for Sphere {
    /// Create a `Sphere` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let center = params.find_one_point3f("center", Point3f::zero());
        let mut radius = params.find_one_float("radius", 1.0);
        if radius <= 0.0 {
            warn!("Sphere radius {} must be positive. Using 1.", radius);
            radius = 1.0;
        }
        let reverse_orientation = params.find_one_bool("reverseorientation", false);
        Self::new(center, radius, reverse_orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn hit_from_outside_has_outward_normal() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, false);
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
        let Intersection { t, isect } = sphere.intersect(&ray).expect("hit");
        assert!(approx_eq!(Float, t, 4.0, epsilon = 1e-4));
        assert!(isect.hit.n.z < -0.99);
    }

    #[test]
    fn hit_from_inside_uses_far_root() {
        let sphere = Sphere::new(Point3f::zero(), 2.0, true);
        let ray = Ray::new(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0), INFINITY, 0.0);
        let Intersection { t, isect } = sphere.intersect(&ray).expect("hit");
        assert!(approx_eq!(Float, t, 2.0, epsilon = 1e-4));
        assert!(isect.hit.n.x < -0.99);
    }

    #[test]
    fn t_max_limits_hits() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, false);
        let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), 3.5, 0.0);
        assert!(sphere.intersect(&ray).is_none());
        assert!(!sphere.intersect_p(&ray));
    }

    #[test]
    fn sampled_points_lie_on_surface() {
        let sphere = Sphere::new(Point3f::new(1.0, 2.0, 3.0), 0.5, false);
        let (hit, pdf) = sphere.sample_area(&Point2f::new(0.3, 0.7));
        assert!(approx_eq!(Float, hit.p.distance(&sphere.center), 0.5, epsilon = 1e-5));
        assert!(approx_eq!(Float, pdf, 1.0 / sphere.area(), epsilon = 1e-6));
    }
}
