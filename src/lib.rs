//! phonoshard - Parallel text-to-phoneme transcription for speech datasets
//!
//! Splits a text column into contiguous shards, phonemizes each shard on a
//! bounded worker pool and reassembles the results in input order.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod alphabet;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod defaults;
pub mod error;
#[cfg(feature = "cli")]
pub mod output;
pub mod phonemize;
pub mod pipeline;
pub mod report;

// Composition root for the binary
#[cfg(feature = "cli")]
pub mod app;

// Core traits
pub use phonemize::{CommandExecutor, Phonemizer, SystemCommandExecutor};
pub use pipeline::{ErrorReporter, ProgressReporter};

// Pipeline
pub use pipeline::{Pipeline, PipelineConfig, TransformResult, process};

// Alphabet
pub use alphabet::{AllowedAlphabet, AlphabetSet};

// Error handling
pub use error::{PhonoshardError, Result, TranscriptionError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
