//! Plain-text rendering of an [`Experiment`].
//!
//! Totals, references and errors are printed with 15 fixed decimals so that
//! single-precision rounding differences stay visible. Terms, ULPs and ratios
//! use scientific notation.

use std::io::{self, Write};

use crate::diagnostics::CoarseReport;
use crate::experiment::{Experiment, MethodResult, OverflowReplay, SizeOutcome};
use crate::float::BitPattern;
use crate::summation::HarmonicComparison;
use crate::window::WindowedReport;

/// Writes the full report.
pub fn write_experiment<W: Write>(out: &mut W, experiment: &Experiment) -> io::Result<()> {
    for outcome in &experiment.outcomes {
        write_outcome(out, outcome)?;
    }
    if let Some(replay) = &experiment.replay {
        write_replay(out, replay)?;
    }
    if let Some(harmonic) = &experiment.harmonic {
        write_harmonic(out, harmonic)?;
    }
    Ok(())
}

/// Writes the block for one problem size.
pub fn write_outcome<W: Write>(out: &mut W, outcome: &SizeOutcome) -> io::Result<()> {
    writeln!(out, "n={}  reference={:.15}", outcome.n, outcome.reference)?;
    write_method(out, "ascending", &outcome.ascending)?;
    write_method(out, "descending", &outcome.descending)?;
    write_method(out, "compensated", &outcome.compensated)?;
    writeln!(out, "{:<12} {:.6e}", "carried:", outcome.compensation)?;
    writeln!(out, "{:<12} {:.15}", "coarse:", outcome.coarse.total)?;
    writeln!(
        out,
        "{:<12} {:.15} (stopped at i={})",
        "windowed:", outcome.windowed.total, outcome.windowed.stopped_at
    )?;
    writeln!(out)?;
    write_coarse(out, &outcome.coarse)?;
    write_windowed(out, &outcome.windowed)?;
    Ok(())
}

fn write_method<W: Write>(out: &mut W, name: &str, result: &MethodResult) -> io::Result<()> {
    writeln!(
        out,
        "{:<12} {:.15}, e: {:.15}",
        format!("{name}:"),
        result.value,
        result.error
    )
}

/// Writes the trace of a coarse analysis.
pub fn write_coarse<W: Write>(out: &mut W, report: &CoarseReport) -> io::Result<()> {
    writeln!(
        out,
        "=== coarse diagnostics: n={} ({} indices) ===",
        report.n, report.arithmetic
    )?;
    for e in &report.flips {
        writeln!(
            out,
            "sign flip #{} at i={}, total {:.15} -> {:.15}, term={:.6e}",
            e.ordinal, e.index, e.before, e.after, e.term
        )?;
    }
    for e in &report.crossings {
        writeln!(
            out,
            "zero crossing #{} at i={}, total {:.15} -> {:.15}",
            e.ordinal, e.index, e.before, e.after
        )?;
    }
    if let Some(neg) = &report.first_negative {
        writeln!(
            out,
            "first negative: i={}, total={:.15}, term={:.6e}, ulp≈{:.6e}",
            neg.index, neg.total, neg.term, neg.ulp
        )?;
    }
    if let Some(stag) = &report.first_stagnation {
        writeln!(
            out,
            "first stagnation: i={}, total={:.15}, term={:.6e}, ulp={:.6e}, term/ulp={:.6}",
            stag.index,
            stag.total,
            stag.term,
            stag.ulp,
            stag.term_over_ulp()
        )?;
    }
    writeln!(
        out,
        "sign flips: {}, zero crossings: {}",
        report.sign_flips, report.zero_crossings
    )?;
    writeln!(out, "final total: {:.15}", report.total)?;
    writeln!(out)
}

/// Writes the trace of a windowed analysis.
pub fn write_windowed<W: Write>(out: &mut W, report: &WindowedReport) -> io::Result<()> {
    writeln!(
        out,
        "=== windowed analysis: n={}, window {}..={} ===",
        report.n,
        report.window.start(),
        report.window.end()
    )?;
    for r in &report.records {
        writeln!(
            out,
            "i={}, before={:.15}, term={:.6e} (2^{:.4}), term/ulp={:.6e}, expected={:.15}, actual={:.15}",
            r.index, r.before, r.term, r.term_log2, r.term_over_ulp, r.expected, r.actual
        )?;
        if r.predicts_flip() {
            writeln!(out, "!!! predicted sign flip at i={}", r.index)?;
        }
    }
    match &report.transition {
        Some(t) => {
            writeln!(
                out,
                "!!! transition at i={}, {:.15} -> {:.15}, term={:.6e}",
                t.index, t.before, t.after, t.term
            )?;
            writeln!(
                out,
                "    before={:.15}, ulp≈{:.6e}, term/ulp={:.6e}",
                t.before, t.ulp, t.term_over_ulp
            )?;
            writeln!(out, "    bits: before={}, after={}", t.before_bits, t.after_bits)?;
            write_fields(out, "before", t.before_bits)?;
            write_fields(out, "after", t.after_bits)?;
        }
        None => writeln!(out, "no transition observed")?,
    }
    let how = if report.truncated() { "truncated" } else { "complete" };
    writeln!(
        out,
        "stopped at i={} ({how}), total={:.15}",
        report.stopped_at, report.total
    )?;
    writeln!(out)
}

fn write_fields<W: Write>(out: &mut W, label: &str, bits: BitPattern) -> io::Result<()> {
    writeln!(
        out,
        "    {:<7} sign={} exponent={} significand={:#08x}",
        format!("{label}:"),
        u8::from(bits.sign()),
        bits.exponent(),
        bits.significand()
    )
}

/// Writes the 32-bit wrapping replay.
pub fn write_replay<W: Write>(out: &mut W, replay: &OverflowReplay) -> io::Result<()> {
    writeln!(
        out,
        "##### 32-bit index overflow replay: n={}  reference={:.15}",
        replay.n, replay.reference
    )?;
    write_method(out, "ascending", &replay.ascending)?;
    writeln!(out)?;
    write_coarse(out, &replay.coarse)?;
    write_windowed(out, &replay.windowed)
}

/// Writes the harmonic comparison.
pub fn write_harmonic<W: Write>(out: &mut W, h: &HarmonicComparison) -> io::Result<()> {
    writeln!(out, "##### harmonic series: n={}", h.n)?;
    writeln!(out, "f32 forward:  {:.15}", h.forward)?;
    writeln!(out, "f32 backward: {:.15}", h.backward)?;
    writeln!(out, "f64 forward:  {:.15}", h.double)?;
    writeln!(out, "order gap (f32):     {:.15}", h.order_gap())?;
    writeln!(out, "precision gap (f64): {:.15}", h.precision_gap())?;
    writeln!(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
