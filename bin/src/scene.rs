//! Built-in demo scene

use photon_core::geometry::*;
use photon_core::light::*;
use photon_core::material::*;
use photon_core::medium::*;
use photon_core::paramset::*;
use photon_core::pbrt::*;
use photon_core::primitives::*;
use photon_core::scene::*;
use photon_lights::*;
use photon_materials::*;
use photon_media::*;
use photon_shapes::*;
use std::sync::Arc;

/// Collects primitives and lights while the scene is assembled.
#[derive(Default)]
struct SceneBuilder {
    primitives: Vec<ArcPrimitive>,
    lights: Vec<ArcLight>,
}

impl SceneBuilder {
    /// Add a shape with an optional material.
    ///
    /// * `shape`    - The shape.
    /// * `material` - The material.
    fn shape(&mut self, shape: ArcShape, material: Option<ArcMaterial>) {
        self.primitives
            .push(Arc::new(GeometricPrimitive::new(shape, material, None)));
    }

    /// Add an emitting shape. The same light is registered with the scene and
    /// attached to the primitive.
    ///
    /// * `shape`    - The shape.
    /// * `material` - The material.
    /// * `params`   - Area light parameters.
    fn area_light(&mut self, shape: ArcShape, material: Option<ArcMaterial>, params: &ParamSet) {
        let light = Arc::new(DiffuseAreaLight::from((params, Arc::clone(&shape))));
        self.primitives.push(Arc::new(GeometricPrimitive::new(
            shape,
            material,
            Some(Arc::clone(&light) as ArcAreaLight),
        )));
        self.lights.push(light);
    }

    fn light(&mut self, light: ArcLight) {
        self.lights.push(light);
    }

    fn build(self, volume_region: Option<ArcVolumeRegion>) -> Scene {
        info!(
            "Scene has {} primitives and {} lights",
            self.primitives.len(),
            self.lights.len()
        );
        Scene::new(Arc::new(PrimitiveList::new(self.primitives)), self.lights, volume_region)
    }
}

fn disk(center: Point3f, normal: Vector3f, radius: Float) -> ArcShape {
    let mut params = ParamSet::new();
    params.add_point3f("center", &[center]);
    params.add_vector3f("normal", &[normal]);
    params.add_float("radius", &[radius]);
    Arc::new(Disk::from(&params))
}

fn sphere(center: Point3f, radius: Float) -> ArcShape {
    let mut params = ParamSet::new();
    params.add_point3f("center", &[center]);
    params.add_float("radius", &[radius]);
    Arc::new(Sphere::from(&params))
}

fn matte(r: Float, g: Float, b: Float) -> Option<ArcMaterial> {
    let mut params = ParamSet::new();
    params.add_rgb_spectrum("Kd", &[r, g, b]);
    Some(Arc::new(MatteMaterial::from(&params)))
}

/// Returns a room made of a floor and three walls, lit by a ceiling panel
/// and a spot light, holding a glass ball, a mirror ball and a translucent
/// ball. With `fog` the room is filled with a thin scattering medium.
///
/// * `fog` - Add a participating medium.
pub fn demo_scene(fog: bool) -> Scene {
    let mut builder = SceneBuilder::default();

    // Walls.
    builder.shape(
        disk(Point3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 1.0), 12.0),
        matte(0.6, 0.6, 0.6),
    );
    builder.shape(
        disk(Point3f::new(0.0, 6.0, 5.0), Vector3f::new(0.0, -1.0, 0.0), 12.0),
        matte(0.6, 0.6, 0.55),
    );
    builder.shape(
        disk(Point3f::new(-6.0, 0.0, 5.0), Vector3f::new(1.0, 0.0, 0.0), 12.0),
        matte(0.6, 0.15, 0.1),
    );
    builder.shape(
        disk(Point3f::new(6.0, 0.0, 5.0), Vector3f::new(-1.0, 0.0, 0.0), 12.0),
        matte(0.1, 0.2, 0.6),
    );

    // Balls.
    let mut glass = ParamSet::new();
    glass.add_float("index", &[1.5]);
    builder.shape(
        sphere(Point3f::new(-2.5, 0.0, 1.5), 1.5),
        Some(Arc::new(GlassMaterial::from(&glass))),
    );
    builder.shape(
        sphere(Point3f::new(2.5, 2.5, 1.5), 1.5),
        Some(Arc::new(MirrorMaterial::from(&ParamSet::new()))),
    );
    builder.shape(
        sphere(Point3f::new(1.5, -2.0, 1.0), 1.0),
        Some(Arc::new(TranslucentMaterial::from(&ParamSet::new()))),
    );

    // Lights.
    let mut panel = ParamSet::new();
    panel.add_rgb_spectrum("L", &[8.0, 8.0, 7.0]);
    builder.area_light(
        disk(Point3f::new(0.0, 0.0, 9.5), Vector3f::new(0.0, 0.0, -1.0), 1.5),
        matte(0.0, 0.0, 0.0),
        &panel,
    );

    let mut spot = ParamSet::new();
    spot.add_rgb_spectrum("I", &[40.0, 36.0, 30.0]);
    spot.add_point3f("from", &[Point3f::new(4.0, -8.0, 8.0)]);
    spot.add_point3f("to", &[Point3f::new(-1.0, 0.0, 0.0)]);
    spot.add_float("coneangle", &[25.0]);
    spot.add_float("conedeltaangle", &[5.0]);
    builder.light(Arc::new(SpotLight::from(&spot)));

    let volume_region = fog.then(|| {
        let mut params = ParamSet::new();
        params.add_rgb_spectrum("sigma_a", &[0.01, 0.01, 0.01]);
        params.add_rgb_spectrum("sigma_s", &[0.04, 0.04, 0.04]);
        params.add_float("g", &[0.3]);
        params.add_point3f("p0", &[Point3f::new(-6.0, -12.0, 0.0)]);
        params.add_point3f("p1", &[Point3f::new(6.0, 6.0, 10.0)]);
        Arc::new(HomogeneousVolume::from(&params)) as ArcVolumeRegion
    });

    builder.build(volume_region)
}
