//! Point Light Source

use photon_core::geometry::*;
use photon_core::interaction::*;
use photon_core::light::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::sampling::*;
use photon_core::spectrum::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone, Debug)]
pub struct PointLight {
    /// Light source type.
    pub light_type: LightType,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`   - Position.
    /// * `intensity` - Intensity.
    pub fn new(p_light: Point3f, intensity: Spectrum) -> Self {
        Self {
            light_type: LightType::DELTA_POSITION_LIGHT,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
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
        Li::new(wi, 1.0, Some(visibility), self.intensity / dist2)
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        self.intensity * FOUR_PI
    }

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`. It is zero since a delta distribution cannot be
    /// sampled by chance.
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
        let d = uniform_sample_sphere(u1);
        let ray = Ray::new(self.p_light, d, INFINITY, time);
        Le::new(ray, Normal3f::from(d), 1.0, uniform_sphere_pdf(), self.intensity)
    }
}

impl From<&ParamSet> for PointLight {
    /// Create a `PointLight` from given parameter set.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let intensity = params.find_one_spectrum("I", Spectrum::one());
        let sc = params.find_one_spectrum("scale", Spectrum::one());
        let from = params.find_one_point3f("from", Point3f::zero());
        Self::new(from, intensity * sc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn emission_weight_is_power() {
        let light = PointLight::new(Point3f::zero(), Spectrum::new(2.0));
        let le = light.sample_le(&Point2f::new(0.3, 0.6), &Point2f::new(0.5, 0.5), 0.0);
        let weight = le.weight().expect("weight");
        assert!(approx_eq!(Float, weight.y(), light.power().y(), epsilon = 1e-3));
    }

    #[test]
    fn incident_radiance_falls_off_with_distance() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 2.0), Spectrum::new(4.0));
        let hit = Hit::new_minimal(Point3f::zero(), 0.0);
        let li = light.sample_li(&hit, &Point2f::zero());
        assert!(approx_eq!(Float, li.value[0], 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, li.wi.z, 1.0, epsilon = 1e-6));
        assert!(light.is_delta_light());
    }
}
