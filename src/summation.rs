//! Single-precision summation strategies.
//!
//! All strategies accumulate the same `f32` terms from a [`SeriesRange`] and
//! differ only in the order and the arithmetic of the accumulation.
//!
//! # Order
//! Terms shrink as the index grows. Ascending index order therefore adds the
//! largest terms first: once the total is near its limit, every later term
//! falls below half an ULP of the accumulator and is lost. Descending index
//! order adds the smallest terms first, while the accumulator is still small
//! enough to represent them, and is the more accurate of the two for large
//! `n`.
//!
//! # Compensation
//! [`CompensatedSum`] carries the rounding error of each addition in a
//! second `f32`, recovering most of what plain ascending summation loses.
//! [`compensated_parts`] keeps that carried error visible.

use crate::error::SeriesError;
use crate::series::SeriesRange;

/// Index order in which the terms are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SumOrder {
    /// `i = 2, 3, …, n` (largest terms first).
    #[default]
    Ascending,
    /// `i = n, n − 1, …, 2` (smallest terms first).
    Descending,
}

/// Sums the series `2..=n` in ascending index order with exact index
/// arithmetic.
///
/// # Errors
/// Returns [`SeriesError::TooFewTerms`] if `n < 2`, or
/// [`SeriesError::IndexOverflow`] if `n` does not fit the index arithmetic.
///
/// # Examples
/// ```
/// use u_sumorder::summation::ascending;
/// // 1/3 + 1/8
/// assert!((ascending(3).unwrap() - 11.0 / 24.0).abs() < 1e-7);
/// ```
pub fn ascending(n: u64) -> Result<f32, SeriesError> {
    Ok(sum_ascending(&SeriesRange::exact(n)?))
}

/// Sums the series `2..=n` in descending index order with exact index
/// arithmetic.
///
/// # Errors
/// See [`ascending`].
pub fn descending(n: u64) -> Result<f32, SeriesError> {
    Ok(sum_descending(&SeriesRange::exact(n)?))
}

/// Plain `f32` accumulation in ascending index order.
pub fn sum_ascending(series: &SeriesRange) -> f32 {
    let mut total = 0.0_f32;
    for (_, term) in series.terms() {
        total += term;
    }
    total
}

/// Plain `f32` accumulation in descending index order.
pub fn sum_descending(series: &SeriesRange) -> f32 {
    let mut total = 0.0_f32;
    for (_, term) in series.terms().rev() {
        total += term;
    }
    total
}

/// Plain `f32` accumulation in the given order.
pub fn sum_ordered(series: &SeriesRange, order: SumOrder) -> f32 {
    match order {
        SumOrder::Ascending => sum_ascending(series),
        SumOrder::Descending => sum_descending(series),
    }
}

/// Running Neumaier sum in `f32`.
///
/// `sum` is exactly the plain rounded accumulation of the same terms in the
/// same order; `compensation` holds the low-order bits each addition shed.
/// Their sum is the compensated result.
///
/// # Algorithm
/// Each addition `sum + x` loses the low-order bits of whichever operand has
/// the smaller magnitude. Those bits are recovered exactly, in `f32`, and
/// collected in `compensation`.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
///
/// # Examples
/// ```
/// use u_sumorder::summation::CompensatedSum;
/// let mut acc = CompensatedSum::default();
/// acc.extend([1.0_f32, 1e-8, 1e-8]);
/// assert_eq!(acc.sum, 1.0);
/// // both small terms were rounded away from `sum` but kept here
/// assert_eq!(acc.compensation, 2e-8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompensatedSum {
    /// Plain rounded total.
    pub sum: f32,
    /// Rounding error carried alongside `sum`.
    pub compensation: f32,
}

impl CompensatedSum {
    /// Adds one term.
    pub fn add(&mut self, x: f32) {
        let rounded = self.sum + x;
        let (larger, smaller) = if self.sum.abs() >= x.abs() {
            (self.sum, x)
        } else {
            (x, self.sum)
        };
        self.compensation += (larger - rounded) + smaller;
        self.sum = rounded;
    }

    /// `sum + compensation`.
    pub fn value(&self) -> f32 {
        self.sum + self.compensation
    }
}

impl Extend<f32> for CompensatedSum {
    fn extend<I: IntoIterator<Item = f32>>(&mut self, terms: I) {
        for x in terms {
            self.add(x);
        }
    }
}

/// Neumaier accumulation of `series` in the given order, with the plain
/// total and the carried error kept apart.
///
/// # Complexity
/// Time: O(n), Space: O(1)
pub fn compensated_parts(series: &SeriesRange, order: SumOrder) -> CompensatedSum {
    let mut acc = CompensatedSum::default();
    match order {
        SumOrder::Ascending => acc.extend(series.terms().map(|(_, t)| t)),
        SumOrder::Descending => acc.extend(series.terms().rev().map(|(_, t)| t)),
    }
    acc
}

/// Compensated `f32` sum of `series` in the given order.
///
/// See [`CompensatedSum`].
pub fn sum_compensated(series: &SeriesRange, order: SumOrder) -> f32 {
    compensated_parts(series, order).value()
}

/// Signed error `reference − value`, evaluated in `f64`.
///
/// The `f32` value widens exactly, so the subtraction does not hide the
/// error being measured.
pub fn signed_error(reference: f64, value: f32) -> f64 {
    reference - f64::from(value)
}

// ---------------------------------------------------------------------------
// Harmonic comparison
// ---------------------------------------------------------------------------

/// The harmonic partial sum `Σ_{i=1}^{n} 1/i` in three renditions.
///
/// The harmonic series diverges, so its `f32` accumulation in ascending
/// order stalls far earlier than the telescoping series does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicComparison {
    pub n: u64,
    /// `f32`, `i = 1..=n`.
    pub forward: f32,
    /// `f32`, `i = n..=1`.
    pub backward: f32,
    /// `f64`, `i = 1..=n`.
    pub double: f64,
}

impl HarmonicComparison {
    /// `|backward − forward|`, in `f32`.
    pub fn order_gap(&self) -> f32 {
        (self.backward - self.forward).abs()
    }

    /// `|double − backward|`: what single precision costs even in the
    /// favourable order.
    pub fn precision_gap(&self) -> f64 {
        (self.double - f64::from(self.backward)).abs()
    }
}

/// Sums `1/i` for `i = 1..=n` forward and backward in `f32` and forward in
/// `f64`.
///
/// # Errors
/// Returns [`SeriesError::TooFewTerms`] if `n == 0`.
///
/// # Examples
/// ```
/// use u_sumorder::summation::harmonic_comparison;
/// let h = harmonic_comparison(4).unwrap();
/// assert!((h.double - 25.0 / 12.0).abs() < 1e-15);
/// ```
pub fn harmonic_comparison(n: u64) -> Result<HarmonicComparison, SeriesError> {
    if n < 1 {
        return Err(SeriesError::TooFewTerms { n, min: 1 });
    }
    let mut forward = 0.0_f32;
    let mut double = 0.0_f64;
    for i in 1..=n {
        forward += 1.0 / i as f32;
        double += 1.0 / i as f64;
    }
    let mut backward = 0.0_f32;
    for i in (1..=n).rev() {
        backward += 1.0 / i as f32;
    }
    Ok(HarmonicComparison {
        n,
        forward,
        backward,
        double,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
