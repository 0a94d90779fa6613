//! Photon Mapping

mod category;
mod collector;
mod error;
mod final_gather;
mod integrator;
mod kd_tree;
mod options;
mod photon;
mod radiance;
mod shooter;
mod surface;
mod volume;
mod volume_marcher;

// Re-export
pub use category::*;
pub use collector::*;
pub use error::*;
pub use final_gather::*;
pub use integrator::*;
pub use kd_tree::*;
pub use options::*;
pub use photon::*;
pub use radiance::*;
pub use shooter::*;
pub use surface::*;
pub use volume_marcher::*;
