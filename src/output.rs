//! Terminal rendering for the CLI: progress bar, diagnostics, summaries.

use crate::alphabet::{AlphabetSet, AllowedAlphabet};
use crate::pipeline::{ErrorReporter, ProgressReporter, RecordFailure, format_failure};
use crate::report::PhonemizationSummary;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::atomic::{AtomicUsize, Ordering};

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} records ({per_sec}, {eta})";

/// Progress bar that also carries per-record diagnostics.
///
/// Diagnostics are printed above the bar so they never tear it. When the bar
/// is hidden (quiet mode, or stderr is not a terminal) they go straight to
/// stderr.
pub struct ProgressOutput {
    bar: ProgressBar,
    failures: AtomicUsize,
}

impl ProgressOutput {
    /// Visible bar over `total` records.
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            Ok(style) => bar.set_style(style.progress_chars("#>-")),
            Err(e) => eprintln!("phonoshard: progress bar disabled: {e}"),
        }
        Self {
            bar,
            failures: AtomicUsize::new(0),
        }
    }

    /// No bar; diagnostics still reach stderr.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden()),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Number of failed records reported so far.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for ProgressOutput {
    fn record_done(&self) {
        self.bar.inc(1);
    }
}

impl ErrorReporter for ProgressOutput {
    fn report(&self, stage: &str, failure: &RecordFailure) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        let line = format_failure(stage, failure);
        if self.bar.is_hidden() {
            eprintln!("{line}");
        } else {
            self.bar.println(line);
        }
    }
}

/// Colored one-block summary of a run.
pub fn render_summary(summary: &PhonemizationSummary) -> String {
    let missing = if summary.missing == 0 {
        format!("{}", "0 missing".green())
    } else {
        format!("{}", format!("{} missing", summary.missing).yellow())
    };
    format!(
        "{} {} records in {} ({:.1} records/s)\n  {}  {}",
        "Phonemized".bold(),
        summary.total,
        humantime::format_duration(std::time::Duration::from_millis(
            summary.elapsed.as_millis() as u64
        )),
        summary.throughput(),
        format!("{} produced", summary.produced).green(),
        missing
    )
}

/// One catalogue line: `> There are: 123 total phonemes (including punctuation)`.
pub fn render_alphabet(set: AlphabetSet, list: bool) -> String {
    let alphabet = AllowedAlphabet::from_set(set);
    let mut line = format!(
        "> There are: {} {} [{}]",
        alphabet.len(),
        set.description(),
        set.name().dimmed()
    );
    if list {
        let symbols: String = alphabet
            .iter()
            .map(|c| if c == ' ' { '␣' } else { c })
            .collect();
        line.push_str(&format!("\n  {symbols}"));
    }
    line
}
