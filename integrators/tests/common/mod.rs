#![allow(dead_code)]

use photon_core::geometry::*;
use photon_core::light::*;
use photon_core::material::*;
use photon_core::medium::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::primitives::*;
use photon_core::scene::*;
use photon_core::spectrum::*;
use photon_integrators::*;
use photon_lights::*;
use photon_materials::*;
use photon_media::*;
use photon_shapes::*;
use std::sync::Arc;

pub fn matte(kd: Float) -> Option<ArcMaterial> {
    Some(Arc::new(MatteMaterial::new(Spectrum::new(kd))))
}

pub fn mirror() -> Option<ArcMaterial> {
    Some(Arc::new(MirrorMaterial::new(Spectrum::one())))
}

pub fn primitive(shape: ArcShape, material: Option<ArcMaterial>, area_light: Option<ArcAreaLight>) -> ArcPrimitive {
    Arc::new(GeometricPrimitive::new(shape, material, area_light))
}

pub fn scene(primitives: Vec<ArcPrimitive>, lights: Vec<ArcLight>, volume: Option<ArcVolumeRegion>) -> Scene {
    Scene::new(Arc::new(PrimitiveList::new(primitives)), lights, volume)
}

pub fn fog(min: Point3f, max: Point3f, sigma_a: Float, sigma_s: Float) -> Option<ArcVolumeRegion> {
    Some(Arc::new(HomogeneousVolume::new(
        Bounds3f::new(min, max),
        Spectrum::new(sigma_a),
        Spectrum::new(sigma_s),
        Spectrum::zero(),
        0.0,
    )))
}

/// Options with the given photon targets and final gathering switched off.
pub fn options(caustic: Int, indirect: Int, volume: Int) -> PhotonMapOptions {
    let mut params = ParamSet::new();
    params.add_int("causticphotons", &[caustic]);
    params.add_int("indirectphotons", &[indirect]);
    params.add_int("volumephotons", &[volume]);
    params.add_bool("finalgather", &[false]);
    PhotonMapOptions::from(&params)
}

/// A point light of intensity 10 at the center of a closed matte sphere of
/// radius 10 with albedo 0.5. Every wall point reflects `1/π · I/r²`: half
/// of it direct light, half interreflection.
pub fn diffuse_shell() -> Scene {
    let walls: ArcShape = Arc::new(Sphere::new(Point3f::zero(), 10.0, true));
    let light: ArcLight = Arc::new(PointLight::new(Point3f::zero(), Spectrum::new(10.0)));
    scene(vec![primitive(walls, matte(0.5), None)], vec![light], None)
}

/// A point light inside a closed matte sphere of radius 10 with a mirror
/// ball next to the light.
pub fn enclosed_room() -> Scene {
    let walls: ArcShape = Arc::new(Sphere::new(Point3f::zero(), 10.0, true));
    let ball: ArcShape = Arc::new(Sphere::new(Point3f::new(3.0, 0.0, 0.0), 1.0, false));
    let light: ArcLight = Arc::new(PointLight::new(Point3f::zero(), Spectrum::new(10.0)));
    scene(
        vec![primitive(walls, matte(0.5), None), primitive(ball, mirror(), None)],
        vec![light],
        None,
    )
}

/// A disk light of radius 1 facing down from height 1 over a large matte
/// plane with albedo 0.5. `light_kd` is the albedo of the light's own
/// surface.
pub fn lit_plane(light_kd: Float) -> Scene {
    let light_disk: ArcShape = Arc::new(Disk::new(
        Point3f::new(0.0, 0.0, 1.0),
        Normal3f::new(0.0, 0.0, -1.0),
        1.0,
    ));
    let plane: ArcShape = Arc::new(Disk::new(Point3f::zero(), Normal3f::new(0.0, 0.0, 1.0), 100.0));
    let area = Arc::new(DiffuseAreaLight::new(Spectrum::one(), 1, Arc::clone(&light_disk), false));
    scene(
        vec![
            primitive(plane, matte(0.5), None),
            primitive(light_disk, matte(light_kd), Some(Arc::clone(&area) as ArcAreaLight)),
        ],
        vec![area as ArcLight],
        None,
    )
}
