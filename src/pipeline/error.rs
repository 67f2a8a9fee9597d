//! Per-record failure reporting.
//!
//! A failed transcription never aborts a run; it is handed to an
//! [`ErrorReporter`] so the failure stays visible.

use crate::error::TranscriptionError;
use std::sync::Mutex;

/// A record whose transcription failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub position: usize,
    pub error: TranscriptionError,
}

/// Trait for reporting per-record failures.
///
/// Called concurrently from worker threads.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, stage: &str, failure: &RecordFailure);
}

/// Logs failures to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, stage: &str, failure: &RecordFailure) {
        eprintln!("{}", format_failure(stage, failure));
    }
}

/// Drops every report (quiet mode).
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ErrorReporter for SilentReporter {
    fn report(&self, _stage: &str, _failure: &RecordFailure) {}
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    failures: Mutex<Vec<RecordFailure>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported failures sorted by position.
    pub fn failures(&self) -> Vec<RecordFailure> {
        let mut failures = match self.failures.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        failures.sort_by_key(|f| f.position);
        failures
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&self, _stage: &str, failure: &RecordFailure) {
        match self.failures.lock() {
            Ok(mut guard) => guard.push(failure.clone()),
            Err(poisoned) => poisoned.into_inner().push(failure.clone()),
        }
    }
}

/// One-line diagnostic naming the stage, the record and its text.
pub fn format_failure(stage: &str, failure: &RecordFailure) -> String {
    format!(
        "[{}] record {}: {} ({:?})",
        stage, failure.position, failure.error.message, failure.error.text
    )
}
