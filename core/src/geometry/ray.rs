//! Rays

use super::*;
use crate::pbrt::*;

/// A semi-infinite line specified by its origin and direction.
#[derive(Clone, Debug, Default)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,

    /// Optional offset rays used for specular differentials.
    pub differentials: Option<RayDifferential>,
}

/// Stores the two auxilliary rays offset by one sample in x and y.
#[derive(Copy, Clone, Debug, Default)]
pub struct RayDifferential {
    /// Origin of the ray offset in x-direction.
    pub rx_origin: Point3f,

    /// Origin of the ray offset in y-direction.
    pub ry_origin: Point3f,

    /// Direction of the ray offset in x-direction.
    pub rx_direction: Vector3f,

    /// Direction of the ray offset in y-direction.
    pub ry_direction: Vector3f,
}

impl Ray {
    /// Create a new ray.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_max` - Maximum extent of the ray.
    /// * `time`  - Time value.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            differentials: None,
        }
    }

    /// Returns the position along the ray at a given parameter.
    ///
    /// * `t` - Parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Scale the differential rays based on the estimated spacing between
    /// image samples.
    ///
    /// * `s` - Scale factor.
    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(diff) = self.differentials.as_mut() {
            diff.rx_origin = self.o + (diff.rx_origin - self.o) * s;
            diff.ry_origin = self.o + (diff.ry_origin - self.o) * s;
            diff.rx_direction = self.d + (diff.rx_direction - self.d) * s;
            diff.ry_direction = self.d + (diff.ry_direction - self.d) * s;
        }
    }
}
