//! Spot Light Source

use photon_core::geometry::*;
use photon_core::interaction::*;
use photon_core::light::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::sampling::*;
use photon_core::spectrum::*;

/// Implements a point light that emits light in a cone of directions from
/// its position.
#[derive(Clone, Debug)]
pub struct SpotLight {
    /// Light source type.
    pub light_type: LightType,

    /// Position.
    pub p_light: Point3f,

    /// Axis of the cone.
    pub direction: Vector3f,

    /// Axes perpendicular to `direction`.
    frame: (Vector3f, Vector3f),

    /// Intensity.
    pub intensity: Spectrum,

    /// Cosine of overall angular width of cone.
    cos_total_width: Float,

    /// Cosine of angle at which falloff starts.
    cos_falloff_start: Float,
}

impl SpotLight {
    /// Returns a new `SpotLight`.
    ///
    /// * `p_light`       - Position.
    /// * `to`            - Point the cone axis passes through.
    /// * `intensity`     - Intensity.
    /// * `total_width`   - Overall angular width of cone in degrees.
    /// * `falloff_start` - Angle at which falloff starts in degrees.
    pub fn new(
        p_light: Point3f,
        to: Point3f,
        intensity: Spectrum,
        total_width: Float,
        falloff_start: Float,
    ) -> Self {
        let direction = (to - p_light).normalize();
        Self {
            light_type: LightType::DELTA_POSITION_LIGHT,
            p_light,
            direction,
            frame: coordinate_system(&direction),
            intensity,
            cos_total_width: radians(total_width).cos(),
            cos_falloff_start: radians(falloff_start).cos(),
        }
    }

    /// Returns the fraction of intensity emitted in a direction.
    ///
    /// * `w` - The world space direction.
    fn falloff(&self, w: &Vector3f) -> Float {
        let cos_theta = w.normalize().dot(&self.direction);
        if cos_theta < self.cos_total_width {
            return 0.0;
        }
        if cos_theta >= self.cos_falloff_start {
            return 1.0;
        }

        // Compute falloff inside spotlight cone.
        let delta =
            (cos_theta - self.cos_total_width) / (self.cos_falloff_start - self.cos_total_width);
        (delta * delta) * (delta * delta)
    }
}

impl Light for SpotLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `_u`  - Sample value for Monte Carlo integration (ignored).
    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Li {
        let dist2 = self.p_light.distance_squared(&hit.p);
        if dist2 == 0.0 {
            return Li::default();
        }
        let wi = (self.p_light - hit.p).normalize();
        let visibility = VisibilityTester::new(*hit, Hit::new_minimal(self.p_light, hit.time));
        let value = self.intensity * (self.falloff(&(-wi)) / dist2);
        Li::new(wi, 1.0, Some(visibility), value)
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        self.intensity * (TWO_PI * (1.0 - 0.5 * (self.cos_falloff_start + self.cos_total_width)))
    }

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`.
    ///
    /// * `_hit` - The interaction hit point.
    /// * `_wi`  - The incident direction.
    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }

    /// Returns a sampled light-carrying ray leaving the light source.
    ///
    /// * `u1`   - Sample values for the ray direction.
    /// * `_u2`  - Sample values (ignored).
    /// * `time` - Time to use for the ray.
    fn sample_le(&self, u1: &Point2f, _u2: &Point2f, time: Float) -> Le {
        let w = uniform_sample_cone_coordinate_system(
            u1,
            self.cos_total_width,
            &self.frame.0,
            &self.frame.1,
            &self.direction,
        );
        let ray = Ray::new(self.p_light, w, INFINITY, time);
        Le::new(
            ray,
            Normal3f::from(w),
            1.0,
            uniform_cone_pdf(self.cos_total_width),
            self.intensity * self.falloff(&w),
        )
    }
}

impl From<&ParamSet> for SpotLight {
    /// Create a `SpotLight` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let intensity = params.find_one_spectrum("I", Spectrum::one());
        let sc = params.find_one_spectrum("scale", Spectrum::one());
        let cone_angle = params.find_one_float("coneangle", 30.0);
        let cone_delta = params.find_one_float("conedeltaangle", 5.0);
        let from = params.find_one_point3f("from", Point3f::zero());
        let mut to = params.find_one_point3f("to", Point3f::new(0.0, 0.0, 1.0));
        if from == to {
            warn!("Spotlight 'from' and 'to' coincide. Pointing down +z.");
            to = from + Vector3f::new(0.0, 0.0, 1.0);
        }
        Self::new(from, to, intensity * sc, cone_angle, cone_angle - cone_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn light() -> SpotLight {
        SpotLight::new(
            Point3f::zero(),
            Point3f::new(0.0, 0.0, -1.0),
            Spectrum::new(10.0),
            30.0,
            25.0,
        )
    }

    #[test]
    fn nothing_outside_cone() {
        let hit = Hit::new_minimal(Point3f::new(0.0, 0.0, 1.0), 0.0);
        assert!(light().sample_li(&hit, &Point2f::zero()).value.is_black());
    }

    #[test]
    fn full_intensity_on_axis() {
        let hit = Hit::new_minimal(Point3f::new(0.0, 0.0, -2.0), 0.0);
        let li = light().sample_li(&hit, &Point2f::zero());
        assert!(approx_eq!(Float, li.value[0], 2.5, epsilon = 1e-5));
    }

    proptest! {
        #[test]
        fn emitted_rays_stay_in_cone(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let spot = light();
            let le = spot.sample_le(&Point2f::new(u0, u1), &Point2f::zero(), 0.0);
            prop_assert!(le.ray.d.dot(&spot.direction) >= radians(30.0).cos() - 1e-4);
            prop_assert!(le.pdf_dir > 0.0);
        }
    }
}
