//! Fine-grained analysis of an ascending accumulation inside an index window.
//!
//! The analysis watches a narrow index [`Window`] believed to contain the
//! critical transition and records, for each index in it, how the term
//! compares with the accumulator's ULP and whether the `f32` update lands on
//! the side of zero the exact arithmetic would. The first positive-to-negative
//! transition is captured with the raw bit patterns of both totals.
//!
//! # Choosing the Window
//! The default window `65530..=65542` is centred on `2¹⁶`, the first index
//! whose square wraps to zero in 32-bit arithmetic (see
//! [`IndexArithmetic::Wrapping32`](crate::series::IndexArithmetic)). It is
//! specific to this term formula, this first index and this precision; for
//! anything else, derive a window analytically or centre one on the first
//! flip of a coarse scan with [`Window::from_coarse`].
//!
//! # Termination
//! Per-step computation comes from [`Steps`]; when to stop is a separate
//! [`StopPolicy`]. The reported total is the running total at the stop index,
//! which is generally *not* the full partial sum.

use tracing::debug;

use crate::diagnostics::CoarseReport;
use crate::error::SeriesError;
use crate::float::{self, BitPattern};
use crate::series::{exact_term, SeriesRange};
use crate::trace::Steps;

/// First index whose square is a multiple of 2³².
const WRAP_POINT: u64 = 1 << 16;

/// Inclusive index window `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    start: u64,
    end: u64,
}

impl Window {
    /// Creates the window `start..=end`.
    ///
    /// # Errors
    /// Returns [`SeriesError::EmptyWindow`] if `start > end`.
    pub fn new(start: u64, end: u64) -> Result<Self, SeriesError> {
        if start > end {
            return Err(SeriesError::EmptyWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// `center − radius ..= center + radius`, saturating at the `u64` bounds.
    pub fn around(center: u64, radius: u64) -> Self {
        Self {
            start: center.saturating_sub(radius),
            end: center.saturating_add(radius),
        }
    }

    /// Window around `2¹⁶`, where 32-bit index arithmetic first produces the
    /// term `−1`.
    ///
    /// # Examples
    /// ```
    /// use u_sumorder::window::Window;
    /// let w = Window::wrap_point(6);
    /// assert_eq!((w.start(), w.end()), (65_530, 65_542));
    /// ```
    pub fn wrap_point(radius: u64) -> Self {
        Self::around(WRAP_POINT, radius)
    }

    /// Window around the first sign flip a coarse scan recorded.
    ///
    /// Returns `None` if the scan recorded no flip.
    pub fn from_coarse(report: &CoarseReport, radius: u64) -> Option<Self> {
        report
            .first_flip_index()
            .map(|index| Self::around(index, radius))
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn contains(&self, index: u64) -> bool {
        (self.start..=self.end).contains(&index)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::wrap_point(6)
    }
}

/// When the windowed analysis stops iterating.
///
/// Both policies also stop at the last index of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StopPolicy {
    /// Stop after the first index past the window, transition or not.
    #[default]
    PastWindow,
    /// Stop after the first index past the window once a transition has been
    /// seen. Without a transition the accumulation runs to the last index.
    PastWindowAfterFlip,
}

impl StopPolicy {
    fn should_stop(self, index: u64, window: &Window, flip_seen: bool) -> bool {
        if index <= window.end {
            return false;
        }
        match self {
            StopPolicy::PastWindow => true,
            StopPolicy::PastWindowAfterFlip => flip_seen,
        }
    }
}

/// Parameters of [`analyze_window`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowConfig {
    pub window: Window,
    pub stop: StopPolicy,
}

/// Per-index detail inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRecord {
    pub index: u64,
    /// Total before this index's update.
    pub before: f32,
    pub term: f32,
    /// `log2(term)`; NaN for negative terms.
    pub term_log2: f32,
    /// `|before| × 2⁻²³`
    pub ulp: f32,
    pub term_over_ulp: f32,
    /// `before` plus the exact term `1/(i² − 1)`, in `f64`.
    pub expected: f64,
    /// `before + term` in `f32`.
    pub actual: f32,
}

impl WindowRecord {
    /// `true` if the exact and the `f32` update land on opposite sides of
    /// zero.
    pub fn predicts_flip(&self) -> bool {
        (self.expected > 0.0 && self.actual < 0.0) || (self.expected < 0.0 && self.actual > 0.0)
    }
}

/// The first positive-to-negative change of the running total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub index: u64,
    pub before: f32,
    pub after: f32,
    pub term: f32,
    /// `|before| × 2⁻²³`
    pub ulp: f32,
    pub term_over_ulp: f32,
    pub before_bits: BitPattern,
    pub after_bits: BitPattern,
}

/// Result of [`analyze_window`].
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedReport {
    pub n: u64,
    pub window: Window,
    /// One record per index of the window that was reached.
    pub records: Vec<WindowRecord>,
    pub transition: Option<Transition>,
    /// Last index whose term was added.
    pub stopped_at: u64,
    /// Running total at `stopped_at`.
    pub total: f32,
}

impl WindowedReport {
    /// `true` if the analysis stopped before the last index of the series.
    pub fn truncated(&self) -> bool {
        self.stopped_at < self.n
    }

    /// Indices whose record predicted a flip.
    pub fn predicted_flips(&self) -> impl Iterator<Item = u64> + '_ {
        self.records
            .iter()
            .filter(|r| r.predicts_flip())
            .map(|r| r.index)
    }
}

/// Runs the ascending accumulation over `series` with fine analysis inside
/// `config.window`.
///
/// The transition search covers every index reached, not only the window.
///
/// # Examples
/// ```
/// use u_sumorder::series::{IndexArithmetic, SeriesRange};
/// use u_sumorder::window::{analyze_window, WindowConfig};
///
/// let series = SeriesRange::new(1_000_000, IndexArithmetic::Wrapping32).unwrap();
/// let report = analyze_window(&series, &WindowConfig::default());
/// assert_eq!(report.transition.unwrap().index, 65_536);
/// assert_eq!(report.stopped_at, 65_543);
/// ```
pub fn analyze_window(series: &SeriesRange, config: &WindowConfig) -> WindowedReport {
    let window = config.window;
    let mut records = Vec::new();
    let mut transition = None;
    let mut stopped_at = series.last();

    let mut steps = Steps::ascending(series);
    for step in steps.by_ref() {
        if window.contains(step.index) {
            let ulp = float::ulp_estimate(step.before);
            records.push(WindowRecord {
                index: step.index,
                before: step.before,
                term: step.term,
                term_log2: step.term.log2(),
                ulp,
                term_over_ulp: step.term / ulp,
                expected: f64::from(step.before) + exact_term(step.index),
                actual: step.after,
            });
        }

        if transition.is_none() && step.went_negative() {
            let ulp = float::ulp_estimate(step.before);
            debug!(index = step.index, before = step.before, after = step.after, "transition");
            transition = Some(Transition {
                index: step.index,
                before: step.before,
                after: step.after,
                term: step.term,
                ulp,
                term_over_ulp: step.term / ulp,
                before_bits: BitPattern::from(step.before),
                after_bits: BitPattern::from(step.after),
            });
        }

        if config
            .stop
            .should_stop(step.index, &window, transition.is_some())
        {
            stopped_at = step.index;
            break;
        }
    }

    WindowedReport {
        n: series.last(),
        window,
        records,
        transition,
        stopped_at,
        total: steps.total(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{analyze_coarse, CoarseConfig};
    use crate::series::IndexArithmetic;
    use crate::summation::sum_ascending;

    fn wrapping(n: u64) -> SeriesRange {
        SeriesRange::new(n, IndexArithmetic::Wrapping32).unwrap()
    }

    // --- Window ---

    #[test]
    fn test_window_new_rejects_empty() {
        assert_eq!(
            Window::new(10, 9),
            Err(SeriesError::EmptyWindow { start: 10, end: 9 })
        );
        let w = Window::new(5, 5).unwrap();
        assert!(w.contains(5));
        assert!(!w.contains(4) && !w.contains(6));
    }

    #[test]
    fn test_window_default_is_wrap_point() {
        let w = Window::default();
        assert_eq!(w.start(), 65_530);
        assert_eq!(w.end(), 65_542);
    }

    #[test]
    fn test_window_around_saturates() {
        let w = Window::around(3, 10);
        assert_eq!(w.start(), 0);
        assert_eq!(w.end(), 13);
        assert_eq!(Window::around(u64::MAX, 1).end(), u64::MAX);
    }

    #[test]
    fn test_window_from_coarse_scan() {
        let series = wrapping(100_000);
        let coarse = analyze_coarse(&series, &CoarseConfig::default());
        assert_eq!(Window::from_coarse(&coarse, 6), Some(Window::default()));

        let exact = analyze_coarse(&SeriesRange::exact(1000).unwrap(), &CoarseConfig::default());
        assert_eq!(Window::from_coarse(&exact, 6), None);
    }

    // --- analyze_window ---

    #[test]
    fn test_wrapping_transition_inside_window() {
        let report = analyze_window(&wrapping(1_000_000), &WindowConfig::default());
        let t = report.transition.unwrap();
        assert!(report.window.contains(t.index));
        assert_eq!(t.index, 65_536);
        assert_eq!(t.term, -1.0);
        assert_eq!(t.before_bits, BitPattern::from(t.before));
        assert_eq!(t.after_bits, BitPattern::from(t.after));
        assert!(!t.before_bits.sign() && t.after_bits.sign());
        assert_eq!(t.ulp, float::ulp_estimate(t.before));
        assert!(t.term_over_ulp < 0.0);
    }

    #[test]
    fn test_wrapping_records_cover_window() {
        let report = analyze_window(&wrapping(1_000_000), &WindowConfig::default());
        let indices: Vec<u64> = report.records.iter().map(|r| r.index).collect();
        assert_eq!(indices, (65_530..=65_542).collect::<Vec<_>>());
        assert_eq!(report.stopped_at, 65_543);
        assert!(report.truncated());
        assert!(report.total < 0.0);
    }

    #[test]
    fn test_wrapping_predicted_flip() {
        let report = analyze_window(&wrapping(1_000_000), &WindowConfig::default());
        let predicted: Vec<u64> = report.predicted_flips().collect();
        assert_eq!(predicted, vec![65_536]);
        let r = report.records.iter().find(|r| r.index == 65_536).unwrap();
        assert!(r.expected > 0.0);
        assert!(r.actual < 0.0);
        assert!(r.term_log2.is_nan());
    }

    #[test]
    fn test_records_consistent() {
        let report = analyze_window(&wrapping(1_000_000), &WindowConfig::default());
        for r in &report.records {
            assert_eq!(r.actual, r.before + r.term);
            assert_eq!(r.ulp, float::ulp_estimate(r.before));
        }
        let r = report.records.iter().find(|r| r.index == 65_537).unwrap();
        assert!((r.term_log2 + 17.0).abs() < 1e-6, "log2 {}", r.term_log2);
    }

    #[test]
    fn test_exact_mode_no_transition() {
        let series = SeriesRange::exact(1_000_000).unwrap();
        let report = analyze_window(&series, &WindowConfig::default());
        assert!(report.transition.is_none());
        assert_eq!(report.predicted_flips().count(), 0);
        assert_eq!(report.records.len(), 13);
        assert_eq!(report.stopped_at, 65_543);
        let prefix = SeriesRange::exact(65_543).unwrap();
        assert_eq!(report.total, sum_ascending(&prefix));
    }

    #[test]
    fn test_after_flip_policy_runs_to_end_without_flip() {
        let series = SeriesRange::exact(100_000).unwrap();
        let config = WindowConfig {
            stop: StopPolicy::PastWindowAfterFlip,
            ..WindowConfig::default()
        };
        let report = analyze_window(&series, &config);
        assert_eq!(report.stopped_at, 100_000);
        assert!(!report.truncated());
        assert_eq!(report.total, sum_ascending(&series));
    }

    #[test]
    fn test_after_flip_policy_stops_past_window_with_flip() {
        let config = WindowConfig {
            stop: StopPolicy::PastWindowAfterFlip,
            ..WindowConfig::default()
        };
        let report = analyze_window(&wrapping(1_000_000), &config);
        assert_eq!(report.stopped_at, 65_543);
    }

    #[test]
    fn test_series_shorter_than_window() {
        let series = SeriesRange::exact(10_000).unwrap();
        let report = analyze_window(&series, &WindowConfig::default());
        assert!(report.records.is_empty());
        assert!(report.transition.is_none());
        assert_eq!(report.stopped_at, 10_000);
        assert_eq!(report.total, sum_ascending(&series));
    }

    #[test]
    fn test_series_ending_inside_window() {
        let report = analyze_window(&wrapping(65_536), &WindowConfig::default());
        assert_eq!(report.records.len(), 7);
        assert_eq!(report.transition.map(|t| t.index), Some(65_536));
        assert!(!report.truncated());
    }

    #[test]
    fn test_custom_window() {
        let config = WindowConfig {
            window: Window::new(2, 4).unwrap(),
            stop: StopPolicy::PastWindow,
        };
        let report = analyze_window(&SeriesRange::exact(100).unwrap(), &config);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.stopped_at, 5);
        let first = report.records[0];
        assert_eq!(first.before, 0.0);
        assert!(first.term_over_ulp.is_infinite());
        assert!((first.expected - 1.0 / 3.0).abs() < 1e-15);
    }
}
