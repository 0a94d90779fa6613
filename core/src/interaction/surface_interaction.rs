//! Surface Interactions

use super::Hit;
use crate::geometry::*;
use crate::material::*;
use crate::pbrt::*;
use crate::primitives::*;
use crate::reflection::*;
use crate::spectrum::*;

/// SurfaceInteraction represents geometry of a particular point on a surface.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing primitive.
#[derive(Clone)]
pub struct SurfaceInteraction<'scene> {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Derivatives.
    pub der: Derivatives,

    /// Shading geometry used for perturbed values.
    pub shading: Shading,

    /// The primitive.
    pub primitive: Option<&'scene dyn Primitive>,

    /// The BSDF computed by the primitive's material.
    pub bsdf: Option<BSDF>,
}

impl<'scene> SurfaceInteraction<'scene> {
    /// Create a new surface interaction.
    ///
    /// * `p`                   - Point of interaction.
    /// * `uv`                  - The uv coordinates from surface parametrization.
    /// * `wo`                  - The negative ray direction.
    /// * `dpdu`                - Parametric partial derivative of the point ∂p/∂u.
    /// * `dpdv`                - Parametric partial derivative of the point ∂p/∂v.
    /// * `dndu`                - Differential change ∂n/∂u in surface normal as we move along u.
    /// * `dndv`                - Differential change ∂n/∂v in surface normal as we move along v.
    /// * `time`                - Time when interaction occurred.
    /// * `reverse_orientation` - Flip the normal computed from the derivatives.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: Point3f,
        uv: Point2f,
        wo: Vector3f,
        dpdu: Vector3f,
        dpdv: Vector3f,
        dndu: Normal3f,
        dndv: Normal3f,
        time: Float,
        reverse_orientation: bool,
    ) -> Self {
        // Calculate normal n from the partial derivatives.
        let mut n = Normal3f::from(dpdu.cross(&dpdv).normalize());
        if reverse_orientation {
            n = -n;
        }

        Self {
            hit: Hit::new(p, time, wo, n),
            uv,
            der: Derivatives {
                dpdu,
                dpdv,
                dndu,
                dndv,
                ..Default::default()
            },
            shading: Shading {
                n,
                dpdu,
                dpdv,
                dndu,
                dndv,
            },
            primitive: None,
            bsdf: None,
        }
    }

    /// Initializes the BSDF of the material at the intersection point on
    /// the primitive's surface.
    ///
    /// * `ray`  - The ray.
    /// * `mode` - Transport mode.
    pub fn compute_scattering_functions(&mut self, ray: &Ray, mode: TransportMode) {
        self.compute_differentials(ray);
        if let Some(primitive) = self.primitive {
            primitive.compute_scattering_functions(self, mode);
        }
    }

    /// Use offset rays to estimate the partial derivatives mapping p(x, y)
    /// from image position to world space position and the partial
    /// derivatives of the mappings u(x, y) and v(x, y).
    ///
    /// * `ray` - The ray.
    pub fn compute_differentials(&mut self, ray: &Ray) {
        let Some(rd) = ray.differentials else {
            self.der.clear_screen_space();
            return;
        };

        // Estimate screen space change in p and (u, v).
        let n = self.hit.n;
        let p = self.hit.p;

        // Compute auxiliary intersection points with plane.
        let d = n.dot(&Vector3f::from(p));
        let tx = -(n.dot(&Vector3f::from(rd.rx_origin)) - d) / n.dot(&rd.rx_direction);
        let ty = -(n.dot(&Vector3f::from(rd.ry_origin)) - d) / n.dot(&rd.ry_direction);
        if !tx.is_finite() || !ty.is_finite() {
            self.der.clear_screen_space();
            return;
        }
        let px = rd.rx_origin + rd.rx_direction * tx;
        let py = rd.ry_origin + rd.ry_direction * ty;
        self.der.dpdx = px - p;
        self.der.dpdy = py - p;

        // Choose two dimensions to use for ray offset computation.
        let dim = if abs(n.x) > abs(n.y) && abs(n.x) > abs(n.z) {
            [1, 2]
        } else if abs(n.y) > abs(n.z) {
            [0, 2]
        } else {
            [0, 1]
        };

        // Initialize A, Bx and By matrices for offset computation.
        let a = [
            [self.der.dpdu[dim[0]], self.der.dpdv[dim[0]]],
            [self.der.dpdu[dim[1]], self.der.dpdv[dim[1]]],
        ];
        let bx = [px[dim[0]] - p[dim[0]], px[dim[1]] - p[dim[1]]];
        let by = [py[dim[0]] - p[dim[0]], py[dim[1]] - p[dim[1]]];
        (self.der.dudx, self.der.dvdx) = solve_linear_system_2x2(&a, &bx).unwrap_or((0.0, 0.0));
        (self.der.dudy, self.der.dvdy) = solve_linear_system_2x2(&a, &by).unwrap_or((0.0, 0.0));
    }

    /// Returns the emitted radiance at a surface point intersected by a ray
    /// for an area light.
    ///
    /// * `w` - The outgoing direction.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        self.primitive
            .and_then(|p| p.get_area_light())
            .map_or_else(Spectrum::zero, |area_light| area_light.l(&self.hit, w))
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        self.hit.spawn_ray(d)
    }
}

/// Solves the 2x2 linear system `a x = b`.
///
/// * `a` - The matrix.
/// * `b` - The right hand side.
fn solve_linear_system_2x2(a: &[[Float; 2]; 2], b: &[Float; 2]) -> Option<(Float, Float)> {
    let det = a[0][0] * a[1][1] - a[0][1] * a[1][0];
    if abs(det) < 1e-10 {
        return None;
    }
    let x0 = (a[1][1] * b[0] - a[0][1] * b[1]) / det;
    let x1 = (a[0][0] * b[1] - a[1][0] * b[0]) / det;
    if x0.is_nan() || x1.is_nan() {
        None
    } else {
        Some((x0, x1))
    }
}

/// Shading geometry used for perturbed values.
#[derive(Copy, Clone, Debug, Default)]
pub struct Shading {
    /// Surface normal.
    pub n: Normal3f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Differential change ∂n/∂u in surface normal as we move along u.
    pub dndu: Normal3f,

    /// Differential change ∂n/∂v in surface normal as we move along v.
    pub dndv: Normal3f,
}

/// Surface interaction derivatives.
#[derive(Copy, Clone, Debug, Default)]
pub struct Derivatives {
    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Differential change ∂n/∂u in surface normal as we move along u.
    pub dndu: Normal3f,

    /// Differential change ∂n/∂v in surface normal as we move along v.
    pub dndv: Normal3f,

    /// Differential change ∂u/∂x in parameteric coordinate u as we move along x.
    pub dudx: Float,

    /// Differential change ∂u/∂y in parameteric coordinate u as we move along y.
    pub dudy: Float,

    /// Differential change ∂v/∂x in parameteric coordinate v as we move along x.
    pub dvdx: Float,

    /// Differential change ∂v/∂y in parameteric coordinate v as we move along y.
    pub dvdy: Float,

    /// Partial derivative of the point ∂p/∂x in world space.
    pub dpdx: Vector3f,

    /// Partial derivative of the point ∂p/∂y in world space.
    pub dpdy: Vector3f,
}

impl Derivatives {
    /// Zeroes the screen space derivatives.
    fn clear_screen_space(&mut self) {
        self.dudx = 0.0;
        self.dvdx = 0.0;
        self.dudy = 0.0;
        self.dvdy = 0.0;
        self.dpdx = Vector3f::zero();
        self.dpdy = Vector3f::zero();
    }
}
