//! The summation-order experiment.
//!
//! For each problem size the experiment evaluates the closed-form reference,
//! both plain summation orders, compensated ascending summation and the two
//! instrumented analyses. An overflow replay then repeats the instrumented
//! analyses with 32-bit wrapping index arithmetic, where the default window
//! actually catches a sign flip, and a harmonic comparison closes the run.

use std::iter;

use tracing::info;

use crate::diagnostics::{analyze_coarse, CoarseConfig, CoarseReport};
use crate::error::SeriesError;
use crate::series::{reference_sum, IndexArithmetic, SeriesRange};
use crate::summation::{
    compensated_parts, harmonic_comparison, signed_error, sum_ordered, HarmonicComparison,
    SumOrder,
};
use crate::window::{analyze_window, WindowConfig, WindowedReport};

/// Experiment parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    /// Problem sizes, in run order.
    pub sizes: Vec<u64>,
    /// Index arithmetic of the per-size runs.
    pub arithmetic: IndexArithmetic,
    pub coarse: CoarseConfig,
    pub window: WindowConfig,
    /// Size of the 32-bit wrapping replay; `None` skips it.
    pub overflow_replay: Option<u64>,
    /// Terms of the harmonic comparison; `None` skips it.
    pub harmonic_terms: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            sizes: scaled_sizes(100, 3),
            arithmetic: IndexArithmetic::Exact,
            coarse: CoarseConfig::default(),
            window: WindowConfig::default(),
            overflow_replay: Some(1_000_000),
            harmonic_terms: Some(1_000_000),
        }
    }
}

/// `count` sizes, each `factor` times the previous, starting from `factor`.
///
/// Stops early rather than overflow `u64`.
///
/// # Examples
/// ```
/// use u_sumorder::experiment::scaled_sizes;
/// assert_eq!(scaled_sizes(100, 3), vec![100, 10_000, 1_000_000]);
/// ```
pub fn scaled_sizes(factor: u64, count: usize) -> Vec<u64> {
    iter::successors(Some(factor), |n| n.checked_mul(factor))
        .take(count)
        .collect()
}

/// An `f32` result and its signed error against the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodResult {
    pub value: f32,
    /// `reference − value`, in `f64`.
    pub error: f64,
}

impl MethodResult {
    pub fn new(reference: f64, value: f32) -> Self {
        Self {
            value,
            error: signed_error(reference, value),
        }
    }
}

/// Everything computed for one problem size.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeOutcome {
    pub n: u64,
    pub reference: f64,
    pub ascending: MethodResult,
    pub descending: MethodResult,
    /// Neumaier summation in ascending order.
    pub compensated: MethodResult,
    /// Rounding error the compensated sum carried beside its plain total.
    pub compensation: f32,
    pub coarse: CoarseReport,
    /// Stops early; its total is not comparable with the other methods.
    pub windowed: WindowedReport,
}

impl SizeOutcome {
    /// Runs every method for size `n`.
    ///
    /// # Errors
    /// Returns [`SeriesError`] if `n` is not a valid last index for
    /// `config.arithmetic`.
    pub fn run(n: u64, config: &ExperimentConfig) -> Result<Self, SeriesError> {
        let series = SeriesRange::new(n, config.arithmetic)?;
        let reference = reference_sum(n)?;
        info!(n, terms = series.term_count(), arithmetic = %config.arithmetic, "running size");

        let plain = |order| MethodResult::new(reference, sum_ordered(&series, order));
        let parts = compensated_parts(&series, SumOrder::Ascending);
        Ok(Self {
            n,
            reference,
            ascending: plain(SumOrder::Ascending),
            descending: plain(SumOrder::Descending),
            compensated: MethodResult::new(reference, parts.value()),
            compensation: parts.compensation,
            coarse: analyze_coarse(&series, &config.coarse),
            windowed: analyze_window(&series, &config.window),
        })
    }
}

/// The instrumented analyses repeated with 32-bit wrapping index arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct OverflowReplay {
    pub n: u64,
    pub reference: f64,
    pub ascending: MethodResult,
    pub coarse: CoarseReport,
    pub windowed: WindowedReport,
}

impl OverflowReplay {
    /// # Errors
    /// Returns [`SeriesError::IndexOverflow`] if `n > i32::MAX`.
    pub fn run(n: u64, config: &ExperimentConfig) -> Result<Self, SeriesError> {
        let series = SeriesRange::new(n, IndexArithmetic::Wrapping32)?;
        let reference = reference_sum(n)?;
        info!(n, terms = series.term_count(), "running overflow replay");

        Ok(Self {
            n,
            reference,
            ascending: MethodResult::new(reference, sum_ordered(&series, SumOrder::Ascending)),
            coarse: analyze_coarse(&series, &config.coarse),
            windowed: analyze_window(&series, &config.window),
        })
    }
}

/// Result of [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub outcomes: Vec<SizeOutcome>,
    pub replay: Option<OverflowReplay>,
    pub harmonic: Option<HarmonicComparison>,
}

/// Runs the whole experiment.
///
/// # Errors
/// Returns the first [`SeriesError`] raised by an invalid size.
pub fn run(config: &ExperimentConfig) -> Result<Experiment, SeriesError> {
    let outcomes = config
        .sizes
        .iter()
        .map(|&n| SizeOutcome::run(n, config))
        .collect::<Result<Vec<_>, _>>()?;

    let replay = config
        .overflow_replay
        .map(|n| OverflowReplay::run(n, config))
        .transpose()?;

    let harmonic = config.harmonic_terms.map(harmonic_comparison).transpose()?;

    Ok(Experiment {
        outcomes,
        replay,
        harmonic,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config(sizes: Vec<u64>) -> ExperimentConfig {
        ExperimentConfig {
            sizes,
            overflow_replay: None,
            harmonic_terms: None,
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn test_scaled_sizes() {
        assert_eq!(scaled_sizes(100, 0), Vec::<u64>::new());
        assert_eq!(scaled_sizes(10, 4), vec![10, 100, 1000, 10_000]);
        // 100¹⁰ overflows u64
        assert_eq!(scaled_sizes(100, 20).len(), 9);
    }

    #[test]
    fn test_default_sizes() {
        assert_eq!(
            ExperimentConfig::default().sizes,
            vec![100, 10_000, 1_000_000]
        );
    }

    #[test]
    fn test_method_result_error() {
        let m = MethodResult::new(0.75, 0.5);
        assert_eq!(m.value, 0.5);
        assert_eq!(m.error, 0.25);
    }

    #[test]
    fn test_default_experiment_end_to_end() {
        let exp = run(&ExperimentConfig::default()).unwrap();
        assert_eq!(exp.outcomes.len(), 3);

        let first = &exp.outcomes[0];
        assert_eq!(first.n, 100);
        assert!((first.reference - 0.740049504950495).abs() < 1e-15);

        let last = &exp.outcomes[2];
        assert_eq!(last.n, 1_000_000);
        assert!((last.reference - 0.749999000001).abs() < 1e-12);
        assert!(last.ascending.error.abs() > last.descending.error.abs());
        assert!(last.compensated.error.abs() < last.ascending.error.abs());
        assert!(last.compensation > 0.0);

        for o in &exp.outcomes {
            assert_eq!(o.coarse.total, o.ascending.value);
            assert_eq!(o.compensated.value, o.ascending.value + o.compensation);
            assert!(o.descending.value > 0.0);
            assert!(o.windowed.transition.is_none());
        }

        let replay = exp.replay.unwrap();
        assert_eq!(replay.coarse.first_flip_index(), Some(65_536));
        assert_eq!(replay.windowed.transition.map(|t| t.index), Some(65_536));
        assert_eq!(replay.coarse.total, replay.ascending.value);

        assert_eq!(exp.harmonic.unwrap().n, 1_000_000);
    }

    #[test]
    fn test_invalid_size_is_reported() {
        let err = run(&quick_config(vec![100, 1])).unwrap_err();
        assert_eq!(err, SeriesError::TooFewTerms { n: 1, min: 2 });
    }

    #[test]
    fn test_replay_rejects_oversized_n() {
        let config = ExperimentConfig {
            overflow_replay: Some(u64::from(u32::MAX)),
            ..quick_config(vec![])
        };
        assert!(matches!(
            run(&config),
            Err(SeriesError::IndexOverflow { .. })
        ));
    }

    #[test]
    fn test_wrapping_sizes() {
        let config = ExperimentConfig {
            arithmetic: IndexArithmetic::Wrapping32,
            ..quick_config(vec![100_000])
        };
        let exp = run(&config).unwrap();
        let o = &exp.outcomes[0];
        assert!(o.ascending.value < 0.0);
        assert!(o.windowed.transition.is_some());
        assert!(exp.replay.is_none());
        assert!(exp.harmonic.is_none());
    }
}
