//! Photon Categories

use super::kd_tree::*;
use super::photon::*;
use std::fmt;
use std::ops::{Index, IndexMut};

/// The kinds of photons stored by the shooting pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PhotonCategory {
    /// Photons that reached a non-specular surface through specular bounces
    /// only.
    Caustic,

    /// Photons that reached a non-specular surface after some non-specular
    /// bounce.
    Indirect,

    /// First surface hits after leaving a light.
    Direct,

    /// Photons that interacted inside the participating medium.
    Volume,
}

impl PhotonCategory {
    /// All categories.
    pub const ALL: [PhotonCategory; 4] = [Self::Caustic, Self::Indirect, Self::Direct, Self::Volume];

    fn index(self) -> usize {
        match self {
            Self::Caustic => 0,
            Self::Indirect => 1,
            Self::Direct => 2,
            Self::Volume => 3,
        }
    }
}

impl fmt::Display for PhotonCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Caustic => "caustic",
            Self::Indirect => "indirect",
            Self::Direct => "direct",
            Self::Volume => "volume",
        };
        write!(f, "{}", name)
    }
}

/// A finished photon map and the number of paths shot to fill it.
pub struct CategoryMap {
    /// The photons.
    pub map: PhotonMap<Photon>,

    /// Number of light paths shot when the map was built. Normalizes
    /// density estimates.
    pub paths: usize,
}

/// Accumulation state for one category.
pub struct PhotonCategoryState {
    /// Number of photons wanted; `None` stores every photon offered.
    target: Option<usize>,

    /// Photons collected while the category is pending.
    photons: Vec<Photon>,

    /// The map, once built.
    built: Option<CategoryMap>,
}

impl PhotonCategoryState {
    /// Create a new state.
    ///
    /// * `target` - Number of photons wanted; `None` for no limit.
    pub fn new(target: Option<usize>) -> Self {
        let capacity = target.unwrap_or(0);
        Self {
            target,
            photons: Vec::with_capacity(capacity),
            built: None,
        }
    }

    /// Returns the number of photons wanted.
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Returns true when the category accepts no more photons. Categories
    /// with a zero target start out done.
    pub fn is_done(&self) -> bool {
        self.built.is_some() || self.target == Some(0)
    }

    /// Returns true if the category still wants photons towards a target.
    pub fn is_pending(&self) -> bool {
        self.target.is_some() && !self.is_done()
    }

    /// Returns the number of photons stored so far.
    pub fn stored(&self) -> usize {
        self.built.as_ref().map_or(self.photons.len(), |b| b.map.len())
    }

    /// Store a photon unless the category is done. Reaching the target
    /// builds the map immediately. Returns true if the photon was stored.
    ///
    /// * `photon` - The photon.
    /// * `shots`  - Number of light paths shot so far.
    pub fn deposit(&mut self, photon: Photon, shots: usize) -> bool {
        if self.is_done() {
            return false;
        }
        self.photons.push(photon);
        if Some(self.photons.len()) == self.target {
            self.build(shots);
        }
        true
    }

    /// Build the map from whatever has been collected. Does nothing if the
    /// map already exists.
    ///
    /// * `shots` - Number of light paths shot so far.
    pub fn build(&mut self, shots: usize) {
        if self.built.is_none() {
            let photons = std::mem::take(&mut self.photons);
            self.built = Some(CategoryMap {
                map: PhotonMap::new(photons),
                paths: shots,
            });
        }
    }

    /// Returns the finished map.
    pub fn map(&self) -> Option<&CategoryMap> {
        self.built.as_ref()
    }

    /// Returns true if the category is pending and storing photons too
    /// slowly for the number of shots taken.
    ///
    /// * `shots` - Number of light paths shot so far.
    pub fn is_unsuccessful(&self, shots: usize) -> bool {
        match self.target {
            Some(needed) if !self.is_done() => unsuccessful(needed, self.stored(), shots),
            _ => false,
        }
    }
}

/// Returns true if fewer than `needed` photons were found and either none at
/// all or fewer than one per 1024 shots.
///
/// * `needed` - Target count.
/// * `found`  - Stored count.
/// * `shots`  - Number of light paths shot.
pub fn unsuccessful(needed: usize, found: usize, shots: usize) -> bool {
    found < needed && (found == 0 || found < shots / 1024)
}

/// The per-category photon collections and maps.
pub struct PhotonMaps {
    states: [PhotonCategoryState; 4],
}

impl PhotonMaps {
    /// Create empty collections for the given targets. Direct photons have
    /// no target.
    ///
    /// * `caustic`  - Caustic target.
    /// * `indirect` - Indirect target.
    /// * `volume`   - Volume target.
    pub fn new(caustic: usize, indirect: usize, volume: usize) -> Self {
        Self {
            states: [
                PhotonCategoryState::new(Some(caustic)),
                PhotonCategoryState::new(Some(indirect)),
                PhotonCategoryState::new(None),
                PhotonCategoryState::new(Some(volume)),
            ],
        }
    }

    /// Returns true when no targeted category is pending.
    pub fn all_done(&self) -> bool {
        self.states.iter().all(|s| !s.is_pending())
    }

    /// Returns true if some pending category stores photons too slowly.
    ///
    /// * `shots` - Number of light paths shot so far.
    pub fn any_unsuccessful(&self, shots: usize) -> bool {
        self.states.iter().any(|s| s.is_unsuccessful(shots))
    }

    /// Returns the finished map for a category.
    ///
    /// * `category` - The category.
    pub fn map(&self, category: PhotonCategory) -> Option<&CategoryMap> {
        self[category].map()
    }
}

impl Index<PhotonCategory> for PhotonMaps {
    type Output = PhotonCategoryState;

    fn index(&self, category: PhotonCategory) -> &Self::Output {
        &self.states[category.index()]
    }
}

impl IndexMut<PhotonCategory> for PhotonMaps {
    fn index_mut(&mut self, category: PhotonCategory) -> &mut Self::Output {
        &mut self.states[category.index()]
    }
}
