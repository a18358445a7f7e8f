//! Coarse diagnostics of an ascending `f32` accumulation.
//!
//! [`analyze_coarse`] runs the full accumulation and watches every step for
//! the symptoms of lost information:
//!
//! - **sign flips**: the total changes side of zero;
//! - **zero crossings**: `before × after < 0` in `f32` (misses flips whose
//!   product underflows);
//! - **first negative total**, with a `|total| × 2⁻²³` ULP estimate;
//! - **first stagnation**: a nonzero term that leaves the total unchanged.
//!
//! The mathematical partial sums are positive and increasing, so each of
//! these is an artifact. Only the first few flips and crossings are kept;
//! counts cover the whole run.

use tracing::{debug, info};

use crate::float;
use crate::series::{IndexArithmetic, SeriesRange};
use crate::trace::{Step, Steps};

/// Limits and cadence for [`analyze_coarse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoarseConfig {
    /// Sign flips kept in [`CoarseReport::flips`].
    pub flip_limit: usize,
    /// Zero crossings kept in [`CoarseReport::crossings`].
    pub crossing_limit: usize,
    /// Emit a progress event every this many indices. `0` disables progress.
    pub progress_interval: u64,
}

impl Default for CoarseConfig {
    fn default() -> Self {
        Self {
            flip_limit: 5,
            crossing_limit: 3,
            progress_interval: 100_000,
        }
    }
}

/// A recorded sign flip or zero crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipEvent {
    /// 1-based position among events of the same kind.
    pub ordinal: u64,
    pub index: u64,
    pub before: f32,
    pub after: f32,
    pub term: f32,
}

impl FlipEvent {
    fn new(ordinal: u64, step: &Step) -> Self {
        Self {
            ordinal,
            index: step.index,
            before: step.before,
            after: step.after,
            term: step.term,
        }
    }
}

/// The first step after which the total is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeEvent {
    pub index: u64,
    pub total: f32,
    pub term: f32,
    /// `|total| × 2⁻²³`, from the magnitude of the negative total, so
    /// never negative.
    pub ulp: f32,
}

/// The first step whose nonzero term was rounded away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagnationEvent {
    pub index: u64,
    pub total: f32,
    pub term: f32,
    /// Exact spacing of `f32` values at `total`.
    pub ulp: f32,
}

impl StagnationEvent {
    /// `term / ulp`; below one half the term cannot move the total.
    pub fn term_over_ulp(&self) -> f32 {
        self.term / self.ulp
    }
}

/// Result of [`analyze_coarse`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoarseReport {
    pub n: u64,
    pub arithmetic: IndexArithmetic,
    /// Total number of sign flips.
    pub sign_flips: u64,
    /// Total number of zero crossings.
    pub zero_crossings: u64,
    /// The first sign flips, up to [`CoarseConfig::flip_limit`].
    pub flips: Vec<FlipEvent>,
    /// The first zero crossings, up to [`CoarseConfig::crossing_limit`].
    pub crossings: Vec<FlipEvent>,
    pub first_negative: Option<NegativeEvent>,
    pub first_stagnation: Option<StagnationEvent>,
    /// Final running total; identical to the plain ascending sum.
    pub total: f32,
}

impl CoarseReport {
    /// Index of the first recorded sign flip, if any.
    pub fn first_flip_index(&self) -> Option<u64> {
        self.flips.first().map(|e| e.index)
    }
}

/// Runs the ascending accumulation over `series`, recording diagnostics.
///
/// # Examples
/// ```
/// use u_sumorder::diagnostics::{analyze_coarse, CoarseConfig};
/// use u_sumorder::series::SeriesRange;
/// use u_sumorder::summation::sum_ascending;
///
/// let series = SeriesRange::exact(10_000).unwrap();
/// let report = analyze_coarse(&series, &CoarseConfig::default());
/// assert_eq!(report.sign_flips, 0);
/// assert!(report.first_stagnation.is_some());
/// assert_eq!(report.total, sum_ascending(&series));
/// ```
pub fn analyze_coarse(series: &SeriesRange, config: &CoarseConfig) -> CoarseReport {
    let mut report = CoarseReport {
        n: series.last(),
        arithmetic: series.arithmetic(),
        sign_flips: 0,
        zero_crossings: 0,
        flips: Vec::new(),
        crossings: Vec::new(),
        first_negative: None,
        first_stagnation: None,
        total: 0.0,
    };

    let mut steps = Steps::ascending(series);
    for step in steps.by_ref() {
        if step.sign_flipped() {
            report.sign_flips += 1;
            if report.flips.len() < config.flip_limit {
                report.flips.push(FlipEvent::new(report.sign_flips, &step));
            }
        }

        if step.crossed_zero() {
            report.zero_crossings += 1;
            if report.crossings.len() < config.crossing_limit {
                report
                    .crossings
                    .push(FlipEvent::new(report.zero_crossings, &step));
            }
        }

        if step.after < 0.0 && report.first_negative.is_none() {
            let ulp = float::ulp_estimate(step.after);
            debug!(index = step.index, total = step.after, ulp, "total went negative");
            report.first_negative = Some(NegativeEvent {
                index: step.index,
                total: step.after,
                term: step.term,
                ulp,
            });
        }

        if report.first_stagnation.is_none() && step.stagnated() {
            if let Some(ulp) = float::exact_ulp(step.after) {
                debug!(index = step.index, total = step.after, ulp, "accumulator stagnated");
                report.first_stagnation = Some(StagnationEvent {
                    index: step.index,
                    total: step.after,
                    term: step.term,
                    ulp,
                });
            }
        }

        if config.progress_interval > 0 && step.index % config.progress_interval == 0 {
            info!(index = step.index, n = series.last(), total = step.after, "progress");
        }
    }
    report.total = steps.total();
    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
