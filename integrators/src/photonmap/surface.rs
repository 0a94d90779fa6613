//! Surface Radiance Estimation

use super::category::*;
use super::integrator::*;
use super::photon::*;
use super::shooter::RHO_SAMPLES;
use photon_core::geometry::*;
use photon_core::integrator::*;
use photon_core::interaction::*;
use photon_core::material::*;
use photon_core::pbrt::*;
use photon_core::reflection::*;
use photon_core::rng::*;
use photon_core::scene::*;
use photon_core::spectrum::*;

/// Estimates exitant radiance at a surface point from the photons of a map.
/// Glossy surfaces evaluate the BSDF for every photon; purely diffuse ones
/// scale the front and back photon sums by the hemispherical-directional
/// reflectance and transmittance.
///
/// * `map`              - The photon map.
/// * `n_lookup`         - Number of photons to use.
/// * `max_dist_squared` - Squared search radius.
/// * `bsdf`             - BSDF at the surface point.
/// * `p`                - The surface point.
/// * `wo`               - Outgoing direction.
/// * `rng`              - Random number generator for reflectance estimates.
pub fn lphoton(
    map: Option<&CategoryMap>,
    n_lookup: usize,
    max_dist_squared: Float,
    bsdf: &BSDF,
    p: &Point3f,
    wo: &Vector3f,
    rng: &mut RNG,
) -> Spectrum {
    let Some(built) = map else {
        return Spectrum::zero();
    };
    if built.paths == 0 || !bsdf.has_non_specular() {
        return Spectrum::zero();
    }

    let (photons, md2) = built.map.nearest(p, n_lookup, max_dist_squared);
    if photons.is_empty() {
        return Spectrum::zero();
    }

    let paths = built.paths as Float;
    let nf = bsdf.ns.face_forward(wo);
    let glossy = BxDFType::BSDF_REFLECTION | BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_GLOSSY;

    if bsdf.num_components(glossy) > 0 {
        // Compute exitant radiance from photons for glossy surface.
        photons.iter().fold(Spectrum::zero(), |l, c| {
            let photon = c.item;
            let flags = if nf.dot(&photon.wi) > 0.0 {
                BxDFType::BSDF_ALL_REFLECTION
            } else {
                BxDFType::BSDF_ALL_TRANSMISSION
            };
            let k = kernel(photon, p, md2);
            l + bsdf.f(wo, &photon.wi, flags) * photon.alpha * (k / paths)
        })
    } else {
        // Compute exitant radiance from photons for diffuse surface.
        let (lr, lt) = photons.iter().fold((Spectrum::zero(), Spectrum::zero()), |(lr, lt), c| {
            let photon = c.item;
            let contrib = photon.alpha * (kernel(photon, p, md2) / paths);
            if nf.dot(&photon.wi) > 0.0 {
                (lr + contrib, lt)
            } else {
                (lr, lt + contrib)
            }
        });
        let u: Vec<Point2f> = (0..RHO_SAMPLES).map(|_| rng.uniform_point2f()).collect();
        lr * bsdf.rho_hd(wo, &u, BxDFType::BSDF_ALL_REFLECTION) * INV_PI
            + lt * bsdf.rho_hd(wo, &u, BxDFType::BSDF_ALL_TRANSMISSION) * INV_PI
    }
}

impl PhotonMapIntegrator {
    /// Returns the radiance leaving a surface hit towards the ray origin.
    ///
    /// * `isect` - The surface interaction.
    /// * `ray`   - The ray that found it.
    /// * `scene` - The scene.
    /// * `rng`   - Random number generator.
    /// * `depth` - Specular recursion depth of the ray.
    pub(super) fn surface_li(
        &self,
        mut isect: SurfaceInteraction,
        ray: &Ray,
        scene: &Scene,
        rng: &mut RNG,
        depth: usize,
    ) -> Spectrum {
        isect.compute_scattering_functions(ray, TransportMode::Radiance);
        let Some(bsdf) = isect.bsdf.as_ref() else {
            // Surfaces without a material only delimit media.
            return self.li(&isect.spawn_ray(&ray.d), scene, rng, depth);
        };

        let wo = isect.hit.wo.normalize();
        let p = isect.hit.p;
        let options = &self.options;

        // Compute emitted light if ray hit an area light source.
        let mut l = isect.le(&wo);
        l += uniform_sample_all_lights(&isect, scene, rng, options.step_size);

        // Compute indirect lighting for photon map integrator.
        l += lphoton(
            self.map(PhotonCategory::Caustic),
            options.n_lookup,
            options.max_dist_squared,
            bsdf,
            &p,
            &wo,
            rng,
        );
        if options.final_gather {
            l += self.final_gather(&isect, bsdf, &wo, scene, rng);
        } else {
            l += lphoton(
                self.map(PhotonCategory::Indirect),
                options.n_lookup,
                options.max_dist_squared,
                bsdf,
                &p,
                &wo,
                rng,
            );
        }

        if depth < options.max_specular_depth {
            // Trace rays for specular reflection and refraction.
            l += self.specular_reflect(ray, &isect, bsdf, &wo, scene, rng, depth);
            l += self.specular_transmit(ray, &isect, bsdf, &wo, scene, rng, depth);
        }
        l
    }

    /// Trace rays for specular reflection.
    ///
    /// * `ray`   - The incoming ray.
    /// * `isect` - The surface interaction.
    /// * `bsdf`  - The BSDF at the surface interaction.
    /// * `wo`    - Outgoing direction.
    /// * `scene` - The scene.
    /// * `rng`   - Random number generator.
    /// * `depth` - Specular recursion depth of `ray`.
    #[allow(clippy::too_many_arguments)]
    fn specular_reflect(
        &self,
        ray: &Ray,
        isect: &SurfaceInteraction,
        bsdf: &BSDF,
        wo: &Vector3f,
        scene: &Scene,
        rng: &mut RNG,
        depth: usize,
    ) -> Spectrum {
        let bxdf_type = BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR;
        let BxDFSample { f, pdf, wi, .. } = bsdf.sample_f(wo, &rng.uniform_point2f(), rng.uniform_float(), bxdf_type);

        let ns = isect.shading.n;
        if pdf == 0.0 || f.is_black() || wi.abs_dot(&ns) == 0.0 {
            return Spectrum::zero();
        }

        // Compute ray differential `rd` for specular reflection.
        let mut rd = isect.spawn_ray(&wi);
        if let Some(differentials) = ray.differentials {
            let (dndx, dndy) = shading_normal_differentials(isect);
            let dwodx = -differentials.rx_direction - *wo;
            let dwody = -differentials.ry_direction - *wo;
            let ddndx = dwodx.dot(&ns) + wo.dot(&dndx);
            let ddndy = dwody.dot(&ns) + wo.dot(&dndy);
            rd.differentials = Some(RayDifferential {
                rx_origin: isect.hit.p + isect.der.dpdx,
                ry_origin: isect.hit.p + isect.der.dpdy,
                rx_direction: wi - dwodx + 2.0 * Vector3f::from(wo.dot(&ns) * dndx + ddndx * ns),
                ry_direction: wi - dwody + 2.0 * Vector3f::from(wo.dot(&ns) * dndy + ddndy * ns),
            });
        }

        f * self.li(&rd, scene, rng, depth + 1) * (wi.abs_dot(&ns) / pdf)
    }

    /// Trace rays for specular refraction.
    ///
    /// * `ray`   - The incoming ray.
    /// * `isect` - The surface interaction.
    /// * `bsdf`  - The BSDF at the surface interaction.
    /// * `wo`    - Outgoing direction.
    /// * `scene` - The scene.
    /// * `rng`   - Random number generator.
    /// * `depth` - Specular recursion depth of `ray`.
    #[allow(clippy::too_many_arguments)]
    fn specular_transmit(
        &self,
        ray: &Ray,
        isect: &SurfaceInteraction,
        bsdf: &BSDF,
        wo: &Vector3f,
        scene: &Scene,
        rng: &mut RNG,
        depth: usize,
    ) -> Spectrum {
        let bxdf_type = BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_SPECULAR;
        let BxDFSample { f, pdf, wi, .. } = bsdf.sample_f(wo, &rng.uniform_point2f(), rng.uniform_float(), bxdf_type);

        let mut ns = isect.shading.n;
        if pdf == 0.0 || f.is_black() || wi.abs_dot(&ns) == 0.0 {
            return Spectrum::zero();
        }

        // Compute ray differential `rd` for specular transmission.
        let mut rd = isect.spawn_ray(&wi);
        if let Some(differentials) = ray.differentials {
            let (mut dndx, mut dndy) = shading_normal_differentials(isect);

            // The BSDF stores the index of refraction of the interior, so
            // assume the ray enters and flip everything if it leaves.
            let mut eta = 1.0 / bsdf.eta;
            if wo.dot(&ns) < 0.0 {
                eta = 1.0 / eta;
                ns = -ns;
                dndx = -dndx;
                dndy = -dndy;
            }

            let dwodx = -differentials.rx_direction - *wo;
            let dwody = -differentials.ry_direction - *wo;
            let ddndx = dwodx.dot(&ns) + wo.dot(&dndx);
            let ddndy = dwody.dot(&ns) + wo.dot(&dndy);

            let mu = eta * wo.dot(&ns) - wi.abs_dot(&ns);
            let dmu = eta - (eta * eta * wo.dot(&ns)) / wi.abs_dot(&ns);
            let dmudx = dmu * ddndx;
            let dmudy = dmu * ddndy;

            rd.differentials = Some(RayDifferential {
                rx_origin: isect.hit.p + isect.der.dpdx,
                ry_origin: isect.hit.p + isect.der.dpdy,
                rx_direction: wi - eta * dwodx + Vector3f::from(mu * dndx + dmudx * ns),
                ry_direction: wi - eta * dwody + Vector3f::from(mu * dndy + dmudy * ns),
            });
        }

        f * self.li(&rd, scene, rng, depth + 1) * (wi.abs_dot(&ns) / pdf)
    }
}

/// Returns the screen space change of the shading normal ∂n/∂x and ∂n/∂y.
///
/// * `isect` - The surface interaction.
fn shading_normal_differentials(isect: &SurfaceInteraction) -> (Normal3f, Normal3f) {
    let shading = &isect.shading;
    let der = &isect.der;
    (
        shading.dndu * der.dudx + shading.dndv * der.dvdx,
        shading.dndu * der.dudy + shading.dndv * der.dvdy,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn flat_bsdf(bxdfs: Vec<BxDF>) -> BSDF {
        let si = SurfaceInteraction::new(
            Point3f::zero(),
            Point2f::zero(),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::zero(),
            Normal3f::zero(),
            0.0,
            false,
        );
        let mut bsdf = BSDF::new(&si, None);
        for bxdf in bxdfs {
            bsdf.add(bxdf);
        }
        bsdf
    }

    fn direct_map(photons: &[Photon], paths: usize) -> PhotonMaps {
        let mut maps = PhotonMaps::new(0, 0, 0);
        for photon in photons {
            maps[PhotonCategory::Direct].deposit(*photon, paths);
        }
        maps[PhotonCategory::Direct].build(paths);
        maps
    }

    #[test]
    fn diffuse_photon_from_front() {
        let maps = direct_map(
            &[Photon::new(Point3f::zero(), Spectrum::one(), Vector3f::new(0.0, 0.0, 1.0))],
            2,
        );
        let bsdf = flat_bsdf(vec![LambertianReflection::new(Spectrum::new(0.5))]);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let mut rng = RNG::new(0);

        let l = lphoton(
            maps.map(PhotonCategory::Direct),
            10,
            1.0,
            &bsdf,
            &Point3f::zero(),
            &wo,
            &mut rng,
        );
        let expected = 3.0 / PI / 2.0 * 0.5 * INV_PI;
        assert!(approx_eq!(Float, l.y(), expected, epsilon = 1e-5));
    }

    #[test]
    fn diffuse_photon_from_behind_needs_transmission() {
        let maps = direct_map(
            &[Photon::new(Point3f::zero(), Spectrum::one(), Vector3f::new(0.0, 0.0, -1.0))],
            1,
        );
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let mut rng = RNG::new(0);

        let opaque = flat_bsdf(vec![LambertianReflection::new(Spectrum::new(0.5))]);
        let l = lphoton(maps.map(PhotonCategory::Direct), 10, 1.0, &opaque, &Point3f::zero(), &wo, &mut rng);
        assert!(l.is_black());

        let translucent = flat_bsdf(vec![LambertianTransmission::new(Spectrum::new(0.25))]);
        let l = lphoton(maps.map(PhotonCategory::Direct), 10, 1.0, &translucent, &Point3f::zero(), &wo, &mut rng);
        assert!(approx_eq!(Float, l.y(), 3.0 / PI * 0.25 * INV_PI, epsilon = 1e-5));
    }

    #[test]
    fn specular_surfaces_see_no_photons() {
        let maps = direct_map(
            &[Photon::new(Point3f::zero(), Spectrum::one(), Vector3f::new(0.0, 0.0, 1.0))],
            1,
        );
        let mirror = flat_bsdf(vec![SpecularReflection::new(Spectrum::one(), Fresnel::NoOp)]);
        let mut rng = RNG::new(0);
        let l = lphoton(
            maps.map(PhotonCategory::Direct),
            10,
            1.0,
            &mirror,
            &Point3f::zero(),
            &Vector3f::new(0.0, 0.0, 1.0),
            &mut rng,
        );
        assert!(l.is_black());
    }

    #[test]
    fn missing_map_gives_zero() {
        let bsdf = flat_bsdf(vec![LambertianReflection::new(Spectrum::new(0.5))]);
        let mut rng = RNG::new(0);
        let l = lphoton(None, 10, 1.0, &bsdf, &Point3f::zero(), &Vector3f::new(0.0, 0.0, 1.0), &mut rng);
        assert!(l.is_black());
    }
}
