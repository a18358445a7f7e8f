//! Lazy step-by-step view of an ascending `f32` accumulation.
//!
//! [`Steps`] performs exactly the additions of
//! [`sum_ascending`](crate::summation::sum_ascending) and yields one
//! [`Step`] per index, so instrumented analyses observe the accumulation
//! without re-implementing it. Whatever stops consuming the iterator decides
//! where the accumulation ends.

use std::iter::FusedIterator;
use std::ops::RangeInclusive;

use crate::float;
use crate::series::{IndexArithmetic, SeriesRange};

/// One addition of the accumulation: `after = before + term` in `f32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub index: u64,
    pub before: f32,
    pub term: f32,
    pub after: f32,
}

impl Step {
    /// See [`float::sign_flipped`].
    pub fn sign_flipped(&self) -> bool {
        float::sign_flipped(self.before, self.after)
    }

    /// See [`float::crosses_zero`].
    pub fn crossed_zero(&self) -> bool {
        float::crosses_zero(self.before, self.after)
    }

    /// `true` if the total went from positive to negative.
    pub fn went_negative(&self) -> bool {
        self.before > 0.0 && self.after < 0.0
    }

    /// `true` if a nonzero term was rounded away entirely.
    pub fn stagnated(&self) -> bool {
        self.term != 0.0 && self.after == self.before
    }
}

/// Iterator over the [`Step`]s of an ascending accumulation.
///
/// # Examples
/// ```
/// use u_sumorder::series::SeriesRange;
/// use u_sumorder::summation::sum_ascending;
/// use u_sumorder::trace::Steps;
///
/// let series = SeriesRange::exact(1000).unwrap();
/// let last = Steps::ascending(&series).last().unwrap();
/// assert_eq!(last.index, 1000);
/// assert_eq!(last.after, sum_ascending(&series));
/// ```
#[derive(Debug, Clone)]
pub struct Steps {
    indices: RangeInclusive<u64>,
    arithmetic: IndexArithmetic,
    total: f32,
}

impl Steps {
    /// Starts an accumulation over `2..=n` from a zero total.
    pub fn ascending(series: &SeriesRange) -> Self {
        Self {
            indices: series.indices(),
            arithmetic: series.arithmetic(),
            total: 0.0,
        }
    }

    /// Running total after the steps yielded so far.
    pub fn total(&self) -> f32 {
        self.total
    }
}

impl Iterator for Steps {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let index = self.indices.next()?;
        let term = self.arithmetic.term(index);
        let before = self.total;
        self.total += term;
        Some(Step {
            index,
            before,
            term,
            after: self.total,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl FusedIterator for Steps {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
