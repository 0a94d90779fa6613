//! Lights

#[macro_use]
extern crate log;

mod diffuse;
mod point;
mod spot;

// Re-export
pub use diffuse::*;
pub use point::*;
pub use spot::*;
