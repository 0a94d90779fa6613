//! BxDF Type

use bitflags::bitflags;

bitflags! {
    /// Stores combinations of reflection models.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BxDFType: u8 {
        const BSDF_REFLECTION = 1;
        const BSDF_TRANSMISSION = 2;
        const BSDF_DIFFUSE = 4;
        const BSDF_GLOSSY = 8;
        const BSDF_SPECULAR = 16;
        const BSDF_ALL_TYPES = Self::BSDF_DIFFUSE.bits()
            | Self::BSDF_GLOSSY.bits()
            | Self::BSDF_SPECULAR.bits();
        const BSDF_ALL_REFLECTION = Self::BSDF_REFLECTION.bits() | Self::BSDF_ALL_TYPES.bits();
        const BSDF_ALL_TRANSMISSION = Self::BSDF_TRANSMISSION.bits() | Self::BSDF_ALL_TYPES.bits();
        const BSDF_ALL = Self::BSDF_ALL_REFLECTION.bits() | Self::BSDF_ALL_TRANSMISSION.bits();
    }
}

impl BxDFType {
    /// Tests a single type flag and returns whether it is set or not.
    ///
    /// * `flag` - BxDFType flag.
    pub fn matches(&self, flag: Self) -> bool {
        self.bits() & flag.bits() > 0
    }
}
