//! Low Discrepancy Sequences

use crate::pbrt::*;
use crate::rng::ONE_MINUS_EPSILON;

/// Number of supported prime bases.
pub const PRIME_TABLE_SIZE: usize = 16;

/// The first prime numbers used as radical inverse bases.
pub const PRIMES: [u64; PRIME_TABLE_SIZE] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Returns the radical inverse of `a` in the prime base `PRIMES[base_index]`,
/// mirroring the digits of `a` about the radix point.
///
/// * `base_index` - Index of the prime base (0 is base 2).
/// * `a`          - The value.
pub fn radical_inverse(base_index: usize, a: u64) -> Float {
    match base_index {
        0 => {
            let v = a.reverse_bits() as f64 * hexf64!("0x1.0p-64");
            min(v as Float, ONE_MINUS_EPSILON)
        }
        i if i < PRIME_TABLE_SIZE => radical_inverse_specialized(PRIMES[i], a),
        i => {
            warn!("Radical inverse base index {} out of range. Using 0.", i);
            0.0
        }
    }
}

/// Returns the radical inverse of `a` in the given base.
///
/// * `base` - The base.
/// * `a`    - The value.
fn radical_inverse_specialized(base: u64, mut a: u64) -> Float {
    let inv_base = 1.0 / base as f64;
    let mut reversed_digits: u64 = 0;
    let mut inv_base_n = 1.0;
    while a != 0 {
        let next = a / base;
        let digit = a - next * base;
        reversed_digits = reversed_digits.wrapping_mul(base).wrapping_add(digit);
        inv_base_n *= inv_base;
        a = next;
    }
    min((reversed_digits as f64 * inv_base_n) as Float, ONE_MINUS_EPSILON)
}
