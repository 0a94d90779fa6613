//! Materials

#[macro_use]
extern crate log;

mod glass;
mod matte;
mod mirror;
mod translucent;

// Re-export
pub use glass::*;
pub use matte::*;
pub use mirror::*;
pub use translucent::*;

#[cfg(test)]
pub(crate) mod test_util {
    use photon_core::geometry::*;
    use photon_core::interaction::*;

    /// Returns an interaction on the z = 0 plane facing +z.
    pub fn flat_interaction<'scene>() -> SurfaceInteraction<'scene> {
        SurfaceInteraction::new(
            Point3f::zero(),
            Point2f::zero(),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Normal3f::zero(),
            Normal3f::zero(),
            0.0,
            false,
        )
    }
}
