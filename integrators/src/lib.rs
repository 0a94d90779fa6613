//! Integrators

#[macro_use]
extern crate log;

mod photonmap;

// Re-export.
pub use photonmap::*;
