//! # u-sumorder
//!
//! Summation-order accuracy experiments for single-precision accumulation.
//!
//! The crate accumulates the telescoping series `Σ_{i=2}^{n} 1/(i² − 1)` in
//! `f32` in several orders, compares each result with the closed form
//! evaluated in `f64`, and instruments the accumulation to show where and
//! why single precision loses information.
//!
//! ## Modules
//!
//! - [`series`] — Term definition, index arithmetic, closed-form reference
//! - [`float`] — ULP estimates, sign predicates, bit patterns
//! - [`summation`] — Ascending, descending and compensated summation
//! - [`trace`] — Lazy per-step view of an ascending accumulation
//! - [`diagnostics`] — Coarse whole-run diagnostics
//! - [`window`] — Fine analysis inside an index window
//! - [`experiment`] — The multi-size experiment driver
//! - [`report`] — Text report
//!
//! ## Design Philosophy
//!
//! - **Computation separate from reporting**: analyses return structured
//!   records; only [`report`] formats text
//! - **Preconditions checked once**: a [`series::SeriesRange`] is valid by
//!   construction, so summation itself cannot fail
//! - **Property-based testing**: numerical invariants verified via proptest

pub mod diagnostics;
pub mod error;
pub mod experiment;
pub mod float;
pub mod report;
pub mod series;
pub mod summation;
pub mod trace;
pub mod window;

pub use error::SeriesError;
