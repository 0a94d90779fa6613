//! Diffuse Area Light Source

use photon_core::geometry::*;
use photon_core::interaction::*;
use photon_core::light::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::rng::ONE_MINUS_EPSILON;
use photon_core::sampling::*;
use photon_core::spectrum::*;
use std::sync::Arc;

/// Implements a basic area light source with uniform spatial and directional
/// radiance distribution.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// Used to trace multiple shadow rays to the light to compute soft shadows.
    pub n_samples: usize,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Shape describing surface of the light source.
    pub shape: ArcShape,

    /// Surface area of the shape.
    pub area: Float,

    /// Indicates whether light source 2-sided.
    pub two_sided: bool,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `l_emit`    - Emitted radiance.
    /// * `n_samples` - Used to trace multiple shadow rays to the light
    ///                 to compute soft shadows. Default to 1.
    /// * `shape`     - Shape describing surface of the light source.
    /// * `two_sided` - Indicates whether light source 2-sided.
    pub fn new(l_emit: Spectrum, n_samples: usize, shape: ArcShape, two_sided: bool) -> Self {
        let area = shape.area();
        Self {
            light_type: LightType::AREA_LIGHT,
            n_samples: n_samples.max(1),
            l_emit,
            shape: Arc::clone(&shape),
            area,
            two_sided,
        }
    }
}

impl Light for DiffuseAreaLight {
    /// Returns the type of light.
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Li {
        let (p_shape_hit, pdf) = self.shape.sample_solid_angle(hit, u);

        let wi = p_shape_hit.p - hit.p;
        if pdf == 0.0 || wi.length_squared() == 0.0 {
            return Li::default();
        }
        let wi = wi.normalize();
        let visibility = VisibilityTester::new(*hit, p_shape_hit);
        let value = self.l(&p_shape_hit, &(-wi));
        Li::new(wi, pdf, Some(visibility), value)
    }

    /// Return the total emitted power.
    fn power(&self) -> Spectrum {
        let sides = if self.two_sided { 2.0 } else { 1.0 };
        self.l_emit * (sides * self.area * PI)
    }

    /// Returns the probability density with respect to solid angle for the light's
    /// `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float {
        self.shape.pdf_solid_angle(hit, wi)
    }

    /// Returns a sampled light-carrying ray leaving the light source.
    ///
    /// * `u1`   - Sample values for the ray origin.
    /// * `u2`   - Sample values for the ray direction.
    /// * `time` - Time to use for the ray.
    fn sample_le(&self, u1: &Point2f, u2: &Point2f, time: Float) -> Le {
        let (p_shape_hit, pdf_pos) = self.shape.sample_area(u1);
        let n_light = p_shape_hit.n;

        // Sample a cosine-weighted outgoing direction `w` for area light.
        let (w, pdf_dir) = if self.two_sided {
            let mut u = *u2;
            // Choose a side to sample and then remap u[0] to [0,1] before
            // applying cosine-weighted hemisphere sampling for the chosen side.
            if u.x < 0.5 {
                u.x = min(u.x * 2.0, ONE_MINUS_EPSILON);
                let w = cosine_sample_hemisphere(&u);
                (w, 0.5 * cosine_hemisphere_pdf(abs(w.z)))
            } else {
                u.x = min((u.x - 0.5) * 2.0, ONE_MINUS_EPSILON);
                let mut w = cosine_sample_hemisphere(&u);
                w.z *= -1.0;
                (w, 0.5 * cosine_hemisphere_pdf(abs(w.z)))
            }
        } else {
            let w = cosine_sample_hemisphere(u2);
            (w, cosine_hemisphere_pdf(w.z))
        };

        let n = Vector3f::from(n_light);
        let (v1, v2) = coordinate_system(&n);
        let w = v1 * w.x + v2 * w.y + n * w.z;

        let mut ray = p_shape_hit.spawn_ray(&w);
        ray.time = time;

        let value = self.l(&p_shape_hit, &w);
        Le::new(ray, n_light, pdf_pos, pdf_dir, value)
    }

    /// Returns the number of samples to use for the light source.
    fn get_num_samples(&self) -> usize {
        self.n_samples
    }
}

impl AreaLight for DiffuseAreaLight {
    /// Returns emitted radiance based on `two_sided` flag.
    ///
    /// * `hit` - The interaction point.
    /// * `w`   - Direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum {
        if self.two_sided || hit.n.dot(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::zero()
        }
    }
}

impl From<(&ParamSet, ArcShape)> for DiffuseAreaLight {
    /// Create a `DiffuseAreaLight` from given parameter set and shape.
    ///
    /// * `p` - A tuple containing the parameter set and shape.
    fn from(p: (&ParamSet, ArcShape)) -> Self {
        let (params, shape) = p;

        let l = params.find_one_spectrum("L", Spectrum::one());
        let sc = params.find_one_spectrum("scale", Spectrum::one());
        let two_sided = params.find_one_bool("twosided", false);

        let n_samples = params.find_one_int("samples", params.find_one_int("nsamples", 1));
        if n_samples < 1 {
            warn!("Area light samples {} < 1. Using 1.", n_samples);
        }

        Self::new(l * sc, max(1, n_samples) as usize, shape, two_sided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use photon_shapes::Disk;

    fn light(two_sided: bool) -> DiffuseAreaLight {
        let disk: ArcShape = Arc::new(Disk::new(
            Point3f::new(0.0, 0.0, 1.0),
            Normal3f::new(0.0, 0.0, -1.0),
            0.5,
        ));
        DiffuseAreaLight::new(Spectrum::new(3.0), 1, disk, two_sided)
    }

    #[test]
    fn one_sided_light_emits_along_normal() {
        let light = light(false);
        let below = Hit::new_minimal(Point3f::zero(), 0.0);
        let li = light.sample_li(&below, &Point2f::new(0.5, 0.5));
        assert!(li.pdf > 0.0);
        assert!(approx_eq!(Float, li.value[0], 3.0, epsilon = 1e-6));

        let above = Hit::new_minimal(Point3f::new(0.0, 0.0, 2.0), 0.0);
        assert!(light.sample_li(&above, &Point2f::new(0.5, 0.5)).value.is_black());
    }

    #[test]
    fn emission_weight_matches_power() {
        for two_sided in [false, true] {
            let light = light(two_sided);
            let le = light.sample_le(&Point2f::new(0.2, 0.7), &Point2f::new(0.3, 0.4), 0.0);
            let weight = le.weight().expect("weight");
            assert!(approx_eq!(Float, weight[0], light.power()[0], epsilon = 1e-3));
            if !two_sided {
                assert!(le.ray.d.z < 0.0);
            }
        }
    }
}
