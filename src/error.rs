//! Precondition failures for series evaluation.
//!
//! Every numeric routine in this crate is a deterministic single pass. The
//! only things that can go wrong are degenerate inputs, which are rejected
//! before any arithmetic runs.

use thiserror::Error;

use crate::series::IndexArithmetic;

/// Error type for invalid series parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    /// The last index is below the smallest the routine accepts.
    #[error("series needs a last index of at least {min}, got n={n}")]
    TooFewTerms { n: u64, min: u64 },

    /// Squaring the index would leave the range of the index arithmetic.
    #[error("index {index} is too large for {arithmetic} index arithmetic")]
    IndexOverflow {
        index: u64,
        arithmetic: IndexArithmetic,
    },

    /// An analysis window whose start lies past its end.
    #[error("analysis window is empty: start={start}, end={end}")]
    EmptyWindow { start: u64, end: u64 },
}
