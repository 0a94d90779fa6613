//! Photon map errors

use thiserror::Error;

/// Failures of the photon shooting pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotonMapError {
    /// The scene does not produce enough photons of some category.
    #[error(
        "Unable to store enough photons after {shots} shots: caustic {caustic}/{caustic_target}, \
         indirect {indirect}/{indirect_target}, volume {volume}/{volume_target}"
    )]
    InsufficientPhotons {
        shots: usize,
        caustic: usize,
        caustic_target: usize,
        indirect: usize,
        indirect_target: usize,
        volume: usize,
        volume_target: usize,
    },

    /// Photons were requested from a scene without lights.
    #[error("Photons were requested but the scene has no lights")]
    NoLights,
}
