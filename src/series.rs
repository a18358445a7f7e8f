//! The telescoping series `Σ_{i=2}^{n} 1/(i² − 1)` and its closed form.
//!
//! # Mathematical Definition
//! Partial fractions give `1/(i² − 1) = ½ (1/(i − 1) − 1/(i + 1))`, so the
//! sum telescopes to
//!
//! ```text
//! S(n) = ½ (1 + ½ − 1/n − 1/(n + 1)) = 0.5 × (1.5 − 1/n − 1/(n + 1))
//! ```
//!
//! Every term is positive and strictly decreasing in `i`, so `S(n)` is
//! strictly increasing and bounded above by `0.75` (and therefore by `1.5`).
//!
//! # Index Arithmetic
//! The reduced-precision term is `1.0_f32 / (d as f32)` where `d = i² − 1` is
//! computed in integer arithmetic. [`IndexArithmetic::Exact`] squares in
//! `u64`; [`IndexArithmetic::Wrapping32`] squares in 32-bit two's-complement
//! wrapping arithmetic, which is what a loop over a 32-bit signed index
//! computes once `i² > i32::MAX` (from `i = 46341`). At `i = 65536 = 2¹⁶` the
//! wrapped square is `0`, the denominator `−1`, and the term `−1.0`.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::SeriesError;

/// First index of the series. `i = 1` would divide by zero.
pub const FIRST_INDEX: u64 = 2;

/// Integer arithmetic used to form the denominator `i² − 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexArithmetic {
    /// Exact unsigned 64-bit arithmetic.
    #[default]
    Exact,
    /// Two's-complement wrapping 32-bit signed arithmetic.
    Wrapping32,
}

impl IndexArithmetic {
    /// Largest index whose square the arithmetic can form.
    ///
    /// Exact arithmetic squares in `u64`, so the index must fit in `u32`.
    /// Wrapping arithmetic needs the index itself to be a valid `i32`.
    pub fn max_index(self) -> u64 {
        match self {
            IndexArithmetic::Exact => u64::from(u32::MAX),
            IndexArithmetic::Wrapping32 => i32::MAX as u64,
        }
    }

    /// Denominator `i² − 1`, converted to `f32`.
    fn denominator(self, index: u64) -> f32 {
        match self {
            IndexArithmetic::Exact => (index * index - 1) as f32,
            IndexArithmetic::Wrapping32 => {
                let i = index as i32;
                i.wrapping_mul(i).wrapping_sub(1) as f32
            }
        }
    }

    /// Reduced-precision term `1 / (i² − 1)`.
    ///
    /// `index` must lie in `FIRST_INDEX..=self.max_index()`; [`SeriesRange`]
    /// guarantees this. In wrapping mode the term may be negative, and at
    /// `i = i32::MAX` the wrapped denominator is zero and the term infinite.
    pub fn term(self, index: u64) -> f32 {
        1.0 / self.denominator(index)
    }
}

impl fmt::Display for IndexArithmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexArithmetic::Exact => f.write_str("exact"),
            IndexArithmetic::Wrapping32 => f.write_str("32-bit wrapping"),
        }
    }
}

/// Mathematically exact term `1 / (i² − 1)` rounded once to `f64`.
///
/// The square is formed in `u128`, so this is valid for every `index ≥ 2`.
///
/// # Examples
/// ```
/// use u_sumorder::series::exact_term;
/// assert_eq!(exact_term(2), 1.0 / 3.0);
/// assert_eq!(exact_term(3), 0.125);
/// ```
pub fn exact_term(index: u64) -> f64 {
    let square = u128::from(index) * u128::from(index);
    1.0 / (square - 1) as f64
}

/// Closed-form partial sum `S(n)` evaluated in `f64`.
///
/// The expression is evaluated in the fixed order
/// `0.5 * (1.5 - 1.0 / n - 1.0 / (n + 1))`, so the result is reproducible
/// bit-for-bit. It serves as ground truth for the `f32` summations.
///
/// # Errors
/// Returns [`SeriesError::TooFewTerms`] if `n == 0`.
///
/// # Examples
/// ```
/// use u_sumorder::series::reference_sum;
/// // S(2) is the single term 1/3.
/// assert!((reference_sum(2).unwrap() - 1.0 / 3.0).abs() < 1e-15);
/// assert!(reference_sum(0).is_err());
/// ```
pub fn reference_sum(n: u64) -> Result<f64, SeriesError> {
    if n < 1 {
        return Err(SeriesError::TooFewTerms { n, min: 1 });
    }
    let n = n as f64;
    Ok(0.5 * (1.5 - 1.0 / n - 1.0 / (n + 1.0)))
}

/// A validated index range `2..=n` together with its index arithmetic.
///
/// Construction checks every precondition once; iterating the terms of a
/// `SeriesRange` cannot fail.
///
/// # Examples
/// ```
/// use u_sumorder::series::{IndexArithmetic, SeriesRange};
/// let series = SeriesRange::new(4, IndexArithmetic::Exact).unwrap();
/// let indices: Vec<u64> = series.terms().map(|(i, _)| i).collect();
/// assert_eq!(indices, vec![2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesRange {
    last: u64,
    arithmetic: IndexArithmetic,
}

impl SeriesRange {
    /// Creates the range `2..=n` under the given index arithmetic.
    ///
    /// # Errors
    /// - [`SeriesError::TooFewTerms`] if `n < 2`.
    /// - [`SeriesError::IndexOverflow`] if `n` exceeds
    ///   [`IndexArithmetic::max_index`].
    pub fn new(n: u64, arithmetic: IndexArithmetic) -> Result<Self, SeriesError> {
        if n < FIRST_INDEX {
            return Err(SeriesError::TooFewTerms {
                n,
                min: FIRST_INDEX,
            });
        }
        if n > arithmetic.max_index() {
            return Err(SeriesError::IndexOverflow {
                index: n,
                arithmetic,
            });
        }
        Ok(Self { last: n, arithmetic })
    }

    /// Creates the range `2..=n` with exact index arithmetic.
    ///
    /// # Errors
    /// See [`SeriesRange::new`].
    pub fn exact(n: u64) -> Result<Self, SeriesError> {
        Self::new(n, IndexArithmetic::Exact)
    }

    /// The last index `n`.
    pub fn last(&self) -> u64 {
        self.last
    }

    pub fn arithmetic(&self) -> IndexArithmetic {
        self.arithmetic
    }

    /// Number of terms, `n − 1`; at least one for a valid range.
    pub fn term_count(&self) -> u64 {
        self.last - FIRST_INDEX + 1
    }

    /// Index range `2..=n`.
    pub fn indices(&self) -> RangeInclusive<u64> {
        FIRST_INDEX..=self.last
    }

    /// Reduced-precision term at `index`.
    pub fn term(&self, index: u64) -> f32 {
        debug_assert!(self.indices().contains(&index));
        self.arithmetic.term(index)
    }

    /// `(index, term)` pairs in ascending index order.
    ///
    /// Reverse the iterator for descending index order.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (u64, f32)> {
        let arithmetic = self.arithmetic;
        self.indices().map(move |i| (i, arithmetic.term(i)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- reference_sum ---

    #[test]
    fn test_reference_matches_literal_expression() {
        for n in [1_u64, 2, 3, 100, 10_000, 1_000_000, 123_456_789] {
            let nf = n as f64;
            let literal = 0.5 * (1.5 - 1.0 / nf - 1.0 / (nf + 1.0));
            assert_eq!(reference_sum(n).unwrap().to_bits(), literal.to_bits());
        }
    }

    #[test]
    fn test_reference_known_values() {
        let r100 = reference_sum(100).unwrap();
        assert!((r100 - 0.740049504950495).abs() < 1e-15, "got {r100}");
        let r1m = reference_sum(1_000_000).unwrap();
        assert!((r1m - 0.749999000001).abs() < 1e-12, "got {r1m}");
    }

    #[test]
    fn test_reference_one_is_empty_sum() {
        // 0.5 × (1.5 − 1 − 0.5) = 0
        assert_eq!(reference_sum(1).unwrap(), 0.0);
    }

    #[test]
    fn test_reference_rejects_zero() {
        assert_eq!(
            reference_sum(0),
            Err(SeriesError::TooFewTerms { n: 0, min: 1 })
        );
    }

    #[test]
    fn test_reference_matches_f64_summation() {
        let direct: f64 = (2..=1000_u64).rev().map(exact_term).sum();
        let closed = reference_sum(1000).unwrap();
        assert!((direct - closed).abs() < 1e-14, "{direct} vs {closed}");
    }

    // --- SeriesRange ---

    #[test]
    fn test_range_rejects_small_n() {
        assert_eq!(
            SeriesRange::exact(1),
            Err(SeriesError::TooFewTerms { n: 1, min: 2 })
        );
        assert!(SeriesRange::exact(0).is_err());
    }

    #[test]
    fn test_range_rejects_overflowing_n() {
        let too_big = i32::MAX as u64 + 1;
        assert_eq!(
            SeriesRange::new(too_big, IndexArithmetic::Wrapping32),
            Err(SeriesError::IndexOverflow {
                index: too_big,
                arithmetic: IndexArithmetic::Wrapping32,
            })
        );
        assert!(SeriesRange::exact(too_big).is_ok());
        assert!(SeriesRange::exact(u64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_range_term_count() {
        let s = SeriesRange::exact(2).unwrap();
        assert_eq!(s.term_count(), 1);
        assert_eq!(SeriesRange::exact(100).unwrap().term_count(), 99);
        assert_eq!(s.terms().count() as u64, s.term_count());
    }

    #[test]
    fn test_terms_descending_order() {
        let s = SeriesRange::exact(5).unwrap();
        let indices: Vec<u64> = s.terms().rev().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![5, 4, 3, 2]);
    }

    // --- IndexArithmetic ---

    #[test]
    fn test_exact_terms_are_positive_and_decreasing() {
        let s = SeriesRange::exact(100_000).unwrap();
        let mut prev = f32::INFINITY;
        for (i, t) in s.terms() {
            assert!(t > 0.0, "term at {i} must be positive");
            assert!(t <= prev, "term at {i} must not grow");
            prev = t;
        }
    }

    #[test]
    fn test_modes_agree_below_wrap() {
        for i in [2_u64, 3, 1000, 46_340] {
            assert_eq!(
                IndexArithmetic::Exact.term(i).to_bits(),
                IndexArithmetic::Wrapping32.term(i).to_bits(),
                "index {i}"
            );
        }
    }

    #[test]
    fn test_wrapping_first_negative_term() {
        // 46341² = 2_147_488_281 > i32::MAX
        assert!(IndexArithmetic::Wrapping32.term(46_341) < 0.0);
        assert!(IndexArithmetic::Exact.term(46_341) > 0.0);
    }

    #[test]
    fn test_wrapping_minus_one_at_two_pow_16() {
        assert_eq!(IndexArithmetic::Wrapping32.term(65_536), -1.0);
        // 65537² − 1 wraps to 131072 = 2¹⁷
        assert_eq!(IndexArithmetic::Wrapping32.term(65_537), 1.0 / 131_072.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(IndexArithmetic::Exact.to_string(), "exact");
        assert_eq!(IndexArithmetic::Wrapping32.to_string(), "32-bit wrapping");
    }
}
