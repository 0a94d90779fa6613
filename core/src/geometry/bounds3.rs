//! 3-D Axis Aligned Bounding Boxes.

use super::*;
use crate::pbrt::*;

/// 3-D axis aligned bounding box of `Float` values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    /// Returns an empty box.
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds3f {
    /// Creates a new bounding box from two opposite corners.
    ///
    /// * `p1` - First corner.
    /// * `p2` - Second corner.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns a box with inverted extents so that any union yields the
    /// other operand.
    pub fn empty() -> Self {
        Self {
            p_min: Point3f::new(INFINITY, INFINITY, INFINITY),
            p_max: Point3f::new(-INFINITY, -INFINITY, -INFINITY),
        }
    }

    /// Returns the box enclosing this one and the given point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    /// Returns the box enclosing this one and another.
    ///
    /// * `other` - The other box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }

    /// Returns true if the point lies inside the box (boundary inclusive).
    ///
    /// * `p` - The point.
    pub fn inside(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }

    /// Returns the vector from the minimum to the maximum corner.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the index of the longest axis.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Returns the continuous position of a point relative to the corners;
    /// `p_min` maps to (0, 0, 0) and `p_max` to (1, 1, 1).
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o = *p - self.p_min;
        for axis in 0..3 {
            let extent = self.p_max[axis] - self.p_min[axis];
            if extent > 0.0 {
                o[axis] /= extent;
            }
        }
        o
    }

    /// Returns the sphere that bounds this box as its center and radius.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = lerp(0.5, self.p_min, self.p_max);
        let radius = if self.inside(&center) {
            center.distance(&self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }

    /// Returns the parametric range `[t0, t1]` of the ray segment
    /// `[0, ray.t_max]` that overlaps the box, or `None` if they are disjoint.
    ///
    /// * `ray` - The ray.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0 = 0.0;
        let mut t1 = ray.t_max;

        for axis in 0..3 {
            // Update interval for ith bounding box slab.
            let inv_ray_dir = 1.0 / ray.d[axis];
            let mut t_near = (self.p_min[axis] - ray.o[axis]) * inv_ray_dir;
            let mut t_far = (self.p_max[axis] - ray.o[axis]) * inv_ray_dir;

            // Update parametric interval from slab intersection t values.
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }

            // Update t_far to ensure robust ray-bounds intersection.
            t_far *= 1.0 + 2.0 * gamma(3);

            // NaN comparisons are false so a NaN leaves the interval intact.
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }

        Some((t0, t1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn ray_through_box() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point3f::new(-5.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), INFINITY, 0.0);
        let (t0, t1) = b.intersect_p(&ray).unwrap();
        assert!(approx_eq!(Float, t0, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, t1, 6.0, epsilon = 1e-4));
    }

    #[test]
    fn ray_missing_box() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point3f::new(-5.0, 3.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), INFINITY, 0.0);
        assert!(b.intersect_p(&ray).is_none());
    }

    #[test]
    fn ray_segment_clipped_by_t_max() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0), 0.5, 0.0);
        assert_eq!(b.intersect_p(&ray), Some((0.0, 0.5)));
    }

    #[test]
    fn offset_maps_corners() {
        let b = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(2.0, 4.0, 8.0));
        assert_eq!(b.offset(&Point3f::new(1.0, 1.0, 2.0)), Vector3f::new(0.5, 0.25, 0.25));
    }
}
