mod common;

use common::*;
use float_cmp::*;
use photon_core::geometry::*;
use photon_core::light::*;
use photon_core::pbrt::*;
use photon_core::rng::*;
use photon_core::scene::*;
use photon_core::sampling::*;
use photon_core::spectrum::*;
use photon_integrators::*;
use photon_lights::*;
use photon_shapes::*;
use proptest::prelude::*;
use std::sync::Arc;

fn random_photons(n: usize, rng: &mut RNG) -> Vec<Photon> {
    (0..n)
        .map(|_| {
            let p = Point3f::new(rng.uniform_float(), rng.uniform_float(), rng.uniform_float());
            Photon::new(p, Spectrum::one(), Vector3f::new(0.0, 0.0, 1.0))
        })
        .collect()
}

fn brute_force(map: &PhotonMap<Photon>, p: &Point3f, k: usize) -> Vec<Float> {
    let mut d2: Vec<Float> = map.iter().map(|photon| photon.p.distance_squared(p)).collect();
    d2.sort_by(|a, b| a.total_cmp(b));
    d2.truncate(k);
    d2
}

#[test]
fn lookups_match_brute_force() {
    let mut rng = RNG::new(11);
    let map = PhotonMap::new(random_photons(10000, &mut rng));

    for k in [1, 8, 64] {
        for _ in 0..20 {
            let p = Point3f::new(rng.uniform_float(), rng.uniform_float(), rng.uniform_float());
            let expected = brute_force(&map, &p, k);

            let (found, md2) = map.nearest(&p, k, INFINITY);
            let found: Vec<Float> = found.iter().map(|c| c.distance_squared).collect();
            assert_eq!(found, expected);
            assert_eq!(md2, expected[k - 1]);

            // Feeding every photon to a collector directly agrees too.
            let mut collector = BoundedNeighborCollector::new(k);
            let mut md2 = INFINITY;
            for (i, photon) in map.iter().enumerate() {
                collector.visit(photon, i, photon.p.distance_squared(&p), &mut md2);
            }
            let direct: Vec<Float> = collector.into_sorted_vec().iter().map(|c| c.distance_squared).collect();
            assert_eq!(direct, expected);
        }
    }
}

#[test]
fn kernel_integrates_to_one_over_its_disk() {
    let photon = Photon::new(Point3f::zero(), Spectrum::one(), Vector3f::new(0.0, 0.0, 1.0));
    let md2 = 0.25;
    let n = 400;
    let cell = 1.0 / n as Float;
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            let p = Point3f::new(-0.5 + (i as Float + 0.5) * cell, -0.5 + (j as Float + 0.5) * cell, 0.0);
            if p.distance_squared(&photon.p) < md2 {
                sum += kernel(&photon, &p, md2) * cell * cell;
            }
        }
    }
    assert!(approx_eq!(Float, sum, 1.0, epsilon = 5e-3), "integral {}", sum);
}

#[test]
fn free_flight_distances_follow_exponential_law() {
    let sigma_s = 0.5;
    let volume = fog(
        Point3f::new(-50.0, -50.0, 0.0),
        Point3f::new(50.0, 50.0, 100.0),
        0.0,
        sigma_s,
    )
    .unwrap();
    let marcher = VolumeMarcher::new(volume.as_ref(), 0.7);
    let ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
    let mut rng = RNG::new(5);

    let trials = 20000;
    let distances: Vec<Float> = (0..trials)
        .map(|_| match marcher.march(&ray, INFINITY, &mut rng) {
            MarchEvent::Interaction { distance, .. } => distance,
            MarchEvent::PassThrough { .. } => INFINITY,
        })
        .collect();

    for t in [0.5, 1.0, 2.0, 4.0] {
        let survived = distances.iter().filter(|&&d| d > t).count() as Float / trials as Float;
        let expected = (-sigma_s * t).exp();
        assert!(
            approx_eq!(Float, survived, expected, epsilon = 0.02),
            "P(d > {}) = {} expected {}",
            t,
            survived,
            expected
        );
    }
}

#[test]
fn preprocess_stores_exact_photon_counts() {
    let scene = enclosed_room();
    let mut options = options(100, 500, 300);
    options.final_gather = true;
    options.n_threads = 2;
    let mut integrator = PhotonMapIntegrator::new(options);
    assert!(integrator.photon_maps().is_none());

    integrator.preprocess(&scene).unwrap();
    let maps = integrator.photon_maps().unwrap();

    let caustic = maps.map(PhotonCategory::Caustic).unwrap();
    assert_eq!(caustic.map.len(), 100);
    assert!(caustic.paths > 0);

    let indirect = maps.map(PhotonCategory::Indirect).unwrap();
    assert_eq!(indirect.map.len(), 500);
    assert!(indirect.paths > 0);

    // Built after shooting stops, so it saw every path.
    let direct = maps.map(PhotonCategory::Direct).unwrap();
    assert!(!direct.map.is_empty());
    assert!(direct.paths >= caustic.paths);
    assert!(direct.paths >= indirect.paths);

    // No volume region, so no volume photons.
    assert!(maps.map(PhotonCategory::Volume).is_none());

    let radiance = integrator.radiance_map().unwrap();
    assert!(!radiance.is_empty());
    assert!(radiance.iter().all(|rp| !rp.lo.has_nans() && rp.lo.y() >= 0.0));

    // The wall opposite the mirror ball is lit directly.
    let ray = Ray::new(Point3f::zero(), Vector3f::new(-1.0, 0.0, 0.0), INFINITY, 0.0);
    let mut rng = RNG::new(1);
    let l = integrator.li(&ray, &scene, &mut rng, 0);
    assert!(!l.has_nans());
    assert!(l.y() > 0.0);
}

#[test]
fn direct_photons_estimate_irradiance_on_diffuse_plane() {
    // The light's surface reflects, so paths reach a second diffuse hit.
    let scene = lit_plane(0.5);
    let mut integrator = PhotonMapIntegrator::new(options(0, 5000, 0));
    integrator.preprocess(&scene).unwrap();
    let maps = integrator.photon_maps().unwrap();

    // A unit radiance disk of radius 1 at height 1 gives E = π/2 below its
    // center, so a Lambertian surface with albedo 0.5 reflects 0.25.
    for (n_lookup, tolerance) in [(200, 0.05), (1000, 0.025)] {
        let e = estimate_e(
            maps.map(PhotonCategory::Direct),
            n_lookup,
            0.25,
            &Point3f::zero(),
            &Normal3f::new(0.0, 0.0, 1.0),
        );
        let lo = e.y() * 0.5 * INV_PI;
        assert!(
            (lo - 0.25).abs() < tolerance,
            "reflected radiance {} from {} photons",
            lo,
            n_lookup
        );
    }
}

#[test]
fn diffuse_plane_reflects_analytic_radiance() {
    let scene = lit_plane(0.0);
    let mut integrator = PhotonMapIntegrator::new(options(0, 0, 0));
    integrator.preprocess(&scene).unwrap();

    let ray = Ray::new(Point3f::new(0.0, 0.0, 0.5), Vector3f::new(0.0, 0.0, -1.0), INFINITY, 0.0);
    let mut rng = RNG::new(8);
    let n = 2000;
    let sum = (0..n).fold(Spectrum::zero(), |l, _| l + integrator.li(&ray, &scene, &mut rng, 0));
    let lo = sum.y() / n as Float;
    assert!((lo - 0.25).abs() < 0.01, "reflected radiance {}", lo);
}

/// Averages `li` over rays from the center of `diffuse_shell` towards
/// several wall points.
fn shell_radiance(integrator: &PhotonMapIntegrator, scene: &Scene, samples: usize) -> Float {
    let directions = [
        Vector3f::new(1.0, 0.0, 0.0),
        Vector3f::new(-1.0, 0.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        Vector3f::new(0.0, -1.0, 0.0),
        Vector3f::new(0.0, 0.0, 1.0),
        Vector3f::new(0.0, 0.0, -1.0),
        Vector3f::new(1.0, 1.0, 1.0).normalize(),
        Vector3f::new(-1.0, 1.0, -1.0).normalize(),
    ];
    let mut rng = RNG::new(6);
    let mut sum = 0.0;
    for d in directions {
        let ray = Ray::new(Point3f::zero(), d, INFINITY, 0.0);
        for _ in 0..samples {
            sum += integrator.li(&ray, scene, &mut rng, 0).y();
        }
    }
    sum / (directions.len() * samples) as Float
}

#[test]
fn closed_shell_matches_analytic_radiance_with_and_without_gathering() {
    let scene = diffuse_shell();
    let expected = INV_PI * 10.0 / 100.0;

    for final_gather in [false, true] {
        let mut options = options(0, 20000, 0);
        options.n_lookup = 200;
        options.max_dist_squared = 4.0;
        options.final_gather = final_gather;
        let mut integrator = PhotonMapIntegrator::new(options);
        integrator.preprocess(&scene).unwrap();
        assert_eq!(integrator.radiance_map().is_some(), final_gather);

        let l = shell_radiance(&integrator, &scene, 4);
        assert!(
            (l - expected).abs() < 0.1 * expected,
            "radiance {} expected {} (final gather {})",
            l,
            expected,
            final_gather
        );
    }
}

#[test]
fn mirror_reflections_stop_at_max_depth() {
    // Towards the mirror ball, which reflects the wall behind the light.
    let scene = enclosed_room();
    let ray = Ray::new(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0), INFINITY, 0.0);
    let wall = 0.5 * INV_PI * 10.0 / 100.0;
    let mut rng = RNG::new(3);

    let defaults = options(0, 0, 0);
    let max_depth = defaults.max_specular_depth;
    assert!(max_depth > 1);
    let integrator = PhotonMapIntegrator::new(defaults);
    let l = integrator.li(&ray, &scene, &mut rng, 0);
    assert!(approx_eq!(Float, l.y(), wall, epsilon = 1e-4), "reflected {}", l.y());

    // One bounce left.
    let l = integrator.li(&ray, &scene, &mut rng, max_depth - 1);
    assert!(approx_eq!(Float, l.y(), wall, epsilon = 1e-4));

    // None left, and a mirror reflects nothing by itself.
    assert!(integrator.li(&ray, &scene, &mut rng, max_depth).is_black());

    let mut options = options(0, 0, 0);
    options.max_specular_depth = 0;
    let integrator = PhotonMapIntegrator::new(options);
    assert!(integrator.li(&ray, &scene, &mut rng, 0).is_black());
}

#[test]
fn absorbing_medium_attenuates_without_scattering() {
    let backdrop: ArcShape = Arc::new(Disk::new(
        Point3f::new(0.0, 0.0, 10.0),
        Normal3f::new(0.0, 0.0, -1.0),
        5.0,
    ));
    let light: ArcLight = Arc::new(PointLight::new(Point3f::new(0.0, 0.0, 1.0), Spectrum::one()));
    let scene = scene(
        vec![primitive(backdrop, matte(0.5), None)],
        vec![light],
        fog(Point3f::new(-3.0, -3.0, 2.0), Point3f::new(3.0, 3.0, 14.0), 0.3, 0.0),
    );
    let integrator = PhotonMapIntegrator::new(options(0, 0, 0));

    let mut ray = Ray::new(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
    assert!(scene.intersect(&mut ray).is_some());

    let mut rng = RNG::new(2);
    let tr = integrator.transmittance(&scene, &ray, &mut rng);
    assert!(approx_eq!(Float, tr.y(), (-2.4 as Float).exp(), epsilon = 1e-4));
    assert!(integrator.volume_li(&scene, &ray, &mut rng).is_black());
}

#[test]
fn volume_photons_light_the_fog() {
    let light: ArcLight = Arc::new(PointLight::new(Point3f::zero(), Spectrum::new(10.0)));
    let scene = scene(
        vec![],
        vec![light],
        fog(Point3f::new(-2.0, -2.0, -2.0), Point3f::new(2.0, 2.0, 2.0), 0.1, 0.5),
    );
    let mut options = options(0, 0, 300);
    options.max_dist_squared = 1.0;
    options.step_size = 0.25;
    let mut integrator = PhotonMapIntegrator::new(options);
    integrator.preprocess(&scene).unwrap();

    let maps = integrator.photon_maps().unwrap();
    assert_eq!(maps.map(PhotonCategory::Volume).map(|m| m.map.len()), Some(300));

    let ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0);
    let mut rng = RNG::new(4);
    let lv = integrator.volume_li(&scene, &ray, &mut rng);
    assert!(lv.y() > 0.0);

    // Nothing is hit and the point light has no emission of its own.
    let l = integrator.li(&ray, &scene, &mut rng, 0);
    assert!(l.y() > 0.0);
    assert!(!l.has_nans());
}

#[test]
fn preprocess_gives_up_when_photons_escape() {
    let floor: ArcShape = Arc::new(Disk::new(
        Point3f::new(0.0, 0.0, -5.0),
        Normal3f::new(0.0, 0.0, 1.0),
        5.0,
    ));
    let spot: ArcLight = Arc::new(SpotLight::new(
        Point3f::zero(),
        Point3f::new(0.0, 0.0, 1.0),
        Spectrum::one(),
        30.0,
        25.0,
    ));
    let scene = scene(vec![primitive(floor, matte(0.5), None)], vec![spot], None);
    let mut integrator = PhotonMapIntegrator::new(options(10, 0, 0));

    let err = integrator.preprocess(&scene).unwrap_err();
    assert_eq!(
        err,
        PhotonMapError::InsufficientPhotons {
            shots: 500_001,
            caustic: 0,
            caustic_target: 10,
            indirect: 0,
            indirect_target: 0,
            volume: 0,
            volume_target: 0,
        }
    );
    assert!(integrator.photon_maps().is_none());
    assert!(integrator.radiance_map().is_none());
}

#[test]
fn photons_need_lights() {
    let floor: ArcShape = Arc::new(Disk::new(Point3f::zero(), Normal3f::new(0.0, 0.0, 1.0), 5.0));
    let dark = scene(vec![primitive(floor, matte(0.5), None)], vec![], None);

    let mut integrator = PhotonMapIntegrator::new(options(10, 10, 0));
    assert_eq!(integrator.preprocess(&dark), Err(PhotonMapError::NoLights));

    let mut integrator = PhotonMapIntegrator::new(options(0, 0, 0));
    integrator.preprocess(&dark).unwrap();
    let direct = integrator.photon_maps().and_then(|m| m.map(PhotonCategory::Direct)).unwrap();
    assert!(direct.map.is_empty());
    assert_eq!(direct.paths, 0);
}

#[test]
fn gather_weights_vanish_when_neither_strategy_can_sample() {
    assert_eq!(power_heuristic(16, 0.0, 16, 0.0), 0.0);
}

proptest! {
    #[test]
    fn gather_strategy_weights_are_symmetric(
        n in 1..32i32,
        bsdf_pdf in 0.001..50.0f32,
        photon_pdf in 0.001..50.0f32,
    ) {
        let w_bsdf = power_heuristic(n, bsdf_pdf, n, photon_pdf);
        let w_photon = power_heuristic(n, photon_pdf, n, bsdf_pdf);
        prop_assert!((0.0..=1.0).contains(&w_bsdf));
        prop_assert!((0.0..=1.0).contains(&w_photon));
        prop_assert!((w_bsdf + w_photon - 1.0).abs() < 1e-5);
    }
}
