//! RGB Spectrum

use crate::pbrt::*;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub};

/// Number of RGB samples.
pub const RGB_SAMPLES: usize = 3;

/// Weights of the RGB channels in the luminance (y) of a colour.
const Y_WEIGHT: [Float; RGB_SAMPLES] = [0.212671, 0.715160, 0.072169];

/// Stores a spectral power distribution as RGB coefficients.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    /// RGB coefficients.
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Create a spectrum with all channels set to the same value.
    ///
    /// * `v` - The value.
    pub fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Create a spectrum from separate channel values.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Create a black spectrum.
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    /// Create a unit spectrum.
    pub fn one() -> Self {
        Self::new(1.0)
    }

    /// Returns true if every channel is zero.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|&v| v == 0.0)
    }

    /// Returns true if any channel is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns the luminance.
    pub fn y(&self) -> Float {
        (0..RGB_SAMPLES).fold(0.0, |a, i| a + Y_WEIGHT[i] * self.c[i])
    }

    /// Returns the RGB channels.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    /// Returns `e^c` for each channel `c`.
    pub fn exp(&self) -> Self {
        Self {
            c: self.c.map(|v| v.exp()),
        }
    }

    /// Returns the square root of each channel.
    pub fn sqrt(&self) -> Self {
        Self {
            c: self.c.map(|v| v.sqrt()),
        }
    }

    /// Clamps each channel to `[low, high]`.
    ///
    /// * `low`  - Lower bound.
    /// * `high` - Upper bound.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        Self {
            c: self.c.map(|v| clamp(v, low, high)),
        }
    }

    /// Returns the largest channel value.
    pub fn max_component_value(&self) -> Float {
        self.c.iter().fold(-INFINITY, |a, &b| max(a, b))
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    /// Adds the given spectrum and returns the result.
    ///
    /// * `other` - The spectrum to add.
    fn add(self, other: Self) -> Self::Output {
        Self {
            c: [self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2]],
        }
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    /// Subtracts the given spectrum and returns the result.
    ///
    /// * `other` - The spectrum to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self {
            c: [self.c[0] - other.c[0], self.c[1] - other.c[1], self.c[2] - other.c[2]],
        }
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    /// Multiplies channel-wise with another spectrum.
    ///
    /// * `other` - The other spectrum.
    fn mul(self, other: Self) -> Self::Output {
        Self {
            c: [self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2]],
        }
    }
}

impl MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    /// Scales every channel.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Self::Output {
        Self {
            c: self.c.map(|v| v * f),
        }
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, f: Float) {
        *self = *self * f;
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    /// Scales every channel of a spectrum.
    ///
    /// * `s` - The spectrum.
    fn mul(self, s: RGBSpectrum) -> Self::Output {
        s * self
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    /// Divides every channel.
    ///
    /// * `f` - The divisor.
    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        self * (1.0 / f)
    }
}

impl DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Div for RGBSpectrum {
    type Output = Self;

    /// Divides channel-wise by another spectrum. Channels with a zero divisor
    /// are set to zero.
    ///
    /// * `other` - The divisor.
    fn div(self, other: Self) -> Self::Output {
        let mut c = [0.0; RGB_SAMPLES];
        for i in 0..RGB_SAMPLES {
            if other.c[i] != 0.0 {
                c[i] = self.c[i] / other.c[i];
            }
        }
        Self { c }
    }
}

impl Neg for RGBSpectrum {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            c: self.c.map(|v| -v),
        }
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    /// Returns a channel value.
    ///
    /// * `i` - Channel index (0, 1 or 2).
    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl From<Float> for RGBSpectrum {
    /// Create a spectrum with all channels set to the same value.
    ///
    /// * `v` - The value.
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn luminance_of_white_is_one() {
        assert!(approx_eq!(Float, RGBSpectrum::one().y(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn black_detection() {
        assert!(RGBSpectrum::zero().is_black());
        assert!(!RGBSpectrum::from_rgb(0.0, 0.1, 0.0).is_black());
    }

    #[test]
    fn exp_of_negated_optical_depth() {
        let tau = RGBSpectrum::from_rgb(0.0, 1.0, 2.0);
        let tr = (-tau).exp();
        assert!(approx_eq!(Float, tr[0], 1.0, epsilon = 1e-6));
        assert!(approx_eq!(Float, tr[1], (-1.0 as Float).exp(), epsilon = 1e-6));
        assert!(approx_eq!(Float, tr[2], (-2.0 as Float).exp(), epsilon = 1e-6));
    }

    #[test]
    fn division_by_zero_channel_is_zero() {
        let s = RGBSpectrum::one() / RGBSpectrum::from_rgb(2.0, 0.0, 4.0);
        assert_eq!(s, RGBSpectrum::from_rgb(0.5, 0.0, 0.25));
    }
}
