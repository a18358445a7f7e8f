//! Single-precision inspection helpers.
//!
//! # ULP
//! An `f32` carries a 24-bit significand (23 stored bits plus the implicit
//! leading one). For `x` in `[2ᵉ, 2ᵉ⁺¹)` the spacing to the next
//! representable value is `2ᵉ⁻²³`, so `|x| × 2⁻²³` is an order-of-magnitude
//! estimate of the ULP that is exact at powers of two and at most a factor of
//! two too large elsewhere. [`exact_ulp`] measures the spacing from the bit
//! pattern instead.
//!
//! An addend smaller than half an ULP of the accumulator is rounded away
//! entirely; this is what makes a long `f32` accumulation stagnate.

use std::fmt;

/// Stored significand bits of `f32`.
pub const STORED_SIGNIFICAND_BITS: u32 = f32::MANTISSA_DIGITS - 1;

/// 2⁻²³
const ULP_SCALE: f32 = 1.0 / (1_u32 << STORED_SIGNIFICAND_BITS) as f32;

/// Order-of-magnitude ULP estimate `|x| × 2⁻²³`.
///
/// # Examples
/// ```
/// use u_sumorder::float::ulp_estimate;
/// assert_eq!(ulp_estimate(1.0), f32::EPSILON);
/// assert_eq!(ulp_estimate(-0.5), f32::EPSILON / 2.0);
/// ```
pub fn ulp_estimate(x: f32) -> f32 {
    x.abs() * ULP_SCALE
}

/// Spacing between `|x|` and the next representable `f32` away from zero.
///
/// Returns `None` for NaN and infinities. At `f32::MAX` the spacing below is
/// returned, since there is no finite value above.
///
/// # Examples
/// ```
/// use u_sumorder::float::exact_ulp;
/// assert_eq!(exact_ulp(1.0), Some(f32::EPSILON));
/// assert_eq!(exact_ulp(0.75), Some(f32::EPSILON / 2.0));
/// assert_eq!(exact_ulp(0.0), Some(f32::from_bits(1)));
/// assert_eq!(exact_ulp(f32::NAN), None);
/// ```
pub fn exact_ulp(x: f32) -> Option<f32> {
    if !x.is_finite() {
        return None;
    }
    let a = x.abs();
    if a == f32::MAX {
        return Some(a - f32::from_bits(a.to_bits() - 1));
    }
    Some(f32::from_bits(a.to_bits() + 1) - a)
}

/// `true` if the value moved strictly from one side of zero to the other.
///
/// Zeros of either sign count as neither side.
pub fn sign_flipped(before: f32, after: f32) -> bool {
    (before > 0.0 && after < 0.0) || (before < 0.0 && after > 0.0)
}

/// `true` if `before × after`, evaluated in `f32`, is negative.
///
/// Usually the same as [`sign_flipped`], but the product underflows to a
/// signed zero when both magnitudes are tiny, and then no crossing is seen.
///
/// # Examples
/// ```
/// use u_sumorder::float::{crosses_zero, sign_flipped};
/// assert!(crosses_zero(0.5, -0.25));
/// // 1e-30 × 1e-30 underflows
/// assert!(sign_flipped(1e-30, -1e-30));
/// assert!(!crosses_zero(1e-30, -1e-30));
/// ```
pub fn crosses_zero(before: f32, after: f32) -> bool {
    before * after < 0.0
}

/// Raw IEEE 754 bit pattern of an `f32`, shown in hexadecimal.
///
/// # Examples
/// ```
/// use u_sumorder::float::BitPattern;
/// assert_eq!(BitPattern::from(1.0_f32).to_string(), "0x3f800000");
/// assert_eq!(BitPattern::from(-0.25_f32).bits(), 0xbe80_0000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitPattern(u32);

impl BitPattern {
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn sign(self) -> bool {
        self.0 >> 31 == 1
    }

    /// Biased exponent field.
    pub fn exponent(self) -> u32 {
        (self.0 >> STORED_SIGNIFICAND_BITS) & 0xff
    }

    /// Stored significand field, without the implicit leading bit.
    pub fn significand(self) -> u32 {
        self.0 & ((1 << STORED_SIGNIFICAND_BITS) - 1)
    }
}

impl From<f32> for BitPattern {
    fn from(value: f32) -> Self {
        Self(value.to_bits())
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
