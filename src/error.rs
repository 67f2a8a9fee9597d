//! Error types for phonoshard.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhonoshardError {
    // Pipeline errors
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Reassembly failed: {message}")]
    Reassembly { message: String },

    #[error("Pipeline timed out after {}", humantime::format_duration(*elapsed))]
    PipelineTimeout { elapsed: Duration },

    #[error("Worker {worker} crashed: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("Worker pool unavailable: {message}")]
    PoolUnavailable { message: String },

    // Dataset errors
    #[error("Failed to parse {path} at line {line}: {message}")]
    DatasetParse {
        path: String,
        line: usize,
        message: String,
    },

    #[error("Dataset column not found: {column}")]
    DatasetColumnNotFound { column: String },

    // Phonemizer backend errors
    #[error("Phonemizer backend not found: {command}")]
    PhonemizerNotFound { command: String },

    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PhonoshardError>;

/// Failure of a single transcription call.
///
/// Kept apart from [`PhonoshardError`]: a transcription failure is recovered
/// per record and never aborts a pipeline run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transcription failed for {text:?}: {message}")]
pub struct TranscriptionError {
    pub text: String,
    pub message: String,
}

impl TranscriptionError {
    pub fn new(text: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            message: message.into(),
        }
    }
}
