//! Common

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::rng::*;
use crate::sampling::*;
use crate::scene::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Sample every light in the scene for direct lighting, taking
/// `Light::get_num_samples()` samples from each.
///
/// * `si`        - The surface interaction with an initialized BSDF.
/// * `scene`     - The scene.
/// * `rng`       - Random number generator.
/// * `step_size` - Ray marching step size for shadow ray transmittance.
pub fn uniform_sample_all_lights(
    si: &SurfaceInteraction,
    scene: &Scene,
    rng: &mut RNG,
    step_size: Float,
) -> Spectrum {
    let mut l = Spectrum::zero();

    for light in scene.lights.iter() {
        // Accumulate contribution of light to `l`.
        let n_samples = light.get_num_samples().max(1);
        let mut ld = Spectrum::zero();
        for _ in 0..n_samples {
            let u_light = rng.uniform_point2f();
            let u_scattering = rng.uniform_point2f();
            let u_component = rng.uniform_float();
            ld += estimate_direct(
                si,
                light,
                &u_light,
                &u_scattering,
                u_component,
                scene,
                rng,
                step_size,
            );
        }
        l += ld / n_samples as Float;
    }
    l
}

/// Compute a direct lighting estimate for a light source sample by applying
/// multiple importance sampling. Perfectly specular lobes are ignored.
///
/// * `si`           - The surface interaction with an initialized BSDF.
/// * `light`        - The light.
/// * `u_light`      - Light sample.
/// * `u_scattering` - BSDF sample.
/// * `u_component`  - Sample used to choose the BSDF component.
/// * `scene`        - The scene.
/// * `rng`          - Random number generator.
/// * `step_size`    - Ray marching step size for shadow ray transmittance.
#[allow(clippy::too_many_arguments)]
pub fn estimate_direct(
    si: &SurfaceInteraction,
    light: &ArcLight,
    u_light: &Point2f,
    u_scattering: &Point2f,
    u_component: Float,
    scene: &Scene,
    rng: &mut RNG,
    step_size: Float,
) -> Spectrum {
    let Some(bsdf) = si.bsdf.as_ref() else {
        return Spectrum::zero();
    };
    let bsdf_flags = BxDFType::BSDF_ALL & !BxDFType::BSDF_SPECULAR;
    let hit = &si.hit;
    let ns = si.shading.n;
    let mut ld = Spectrum::zero();

    // Sample light source with multiple importance sampling.
    let Li {
        wi,
        pdf: light_pdf,
        visibility,
        value,
    } = light.sample_li(hit, u_light);
    if light_pdf > 0.0 && !value.is_black() {
        let f = bsdf.f(&hit.wo, &wi, bsdf_flags);
        if !f.is_black() {
            let li = match visibility {
                Some(vis) if vis.unoccluded(scene) => value * vis.tr(scene, step_size, rng),
                Some(_) => {
                    trace!("shadow ray blocked");
                    Spectrum::zero()
                }
                None => value,
            };

            // Add light's contribution to reflected radiance.
            if !li.is_black() {
                if light.is_delta_light() {
                    ld += f * li * (wi.abs_dot(&ns) / light_pdf);
                } else {
                    let bsdf_pdf = bsdf.pdf(&hit.wo, &wi, bsdf_flags);
                    let weight = power_heuristic(1, light_pdf, 1, bsdf_pdf);
                    ld += f * li * (wi.abs_dot(&ns) * weight / light_pdf);
                }
            }
        }
    }

    // Sample BSDF with multiple importance sampling.
    if !light.is_delta_light() {
        let BxDFSample { f, pdf: bsdf_pdf, wi, .. } =
            bsdf.sample_f(&hit.wo, u_scattering, u_component, bsdf_flags);
        if !f.is_black() && bsdf_pdf > 0.0 {
            let light_pdf = light.pdf_li(hit, &wi);
            if light_pdf > 0.0 {
                let weight = power_heuristic(1, bsdf_pdf, 1, light_pdf);

                // Add light contribution from BSDF sampling.
                let mut ray = hit.spawn_ray(&wi);
                let li = match scene.intersect(&mut ray) {
                    Some(light_isect) => {
                        let same_light = light_isect
                            .primitive
                            .and_then(|p| p.get_area_light())
                            .is_some_and(|area_light| {
                                Arc::as_ptr(&area_light) as *const ()
                                    == Arc::as_ptr(light) as *const ()
                            });
                        if same_light {
                            light_isect.le(&(-wi))
                        } else {
                            Spectrum::zero()
                        }
                    }
                    None => light.le(&ray),
                };

                if !li.is_black() {
                    let tr = scene.transmittance(&ray, step_size, rng.uniform_float());
                    ld += f * li * tr * (wi.abs_dot(&ns) * weight / bsdf_pdf);
                }
            }
        }
    }

    ld
}

/// Returns a distribution proportional to the luminance of each light's
/// power, or `None` if the scene has no lights.
///
/// * `scene` - The scene.
pub fn compute_light_power_distribution(scene: &Scene) -> Option<Distribution1D> {
    if scene.lights.is_empty() {
        None
    } else {
        let light_power: Vec<Float> = scene.lights.iter().map(|light| light.power().y()).collect();
        Some(Distribution1D::new(light_power))
    }
}
