//! Data types for the shard pipeline.

use serde::Serialize;

/// One input text with its position in the original sequence.
///
/// The position is assigned once when the input is split and is the only key
/// used to restore order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    position: usize,
    pub text: String,
}

impl Record {
    pub fn new(position: usize, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// A contiguous slice of the input owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Shard index, `0..shard_count`.
    pub index: usize,
    /// Records in original order.
    pub records: Vec<Record>,
}

impl Shard {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of transforming one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransformResult {
    /// Filtered phonemes.
    Produced { position: usize, phonemes: String },
    /// Transcription failed for this record.
    Missing { position: usize },
}

impl TransformResult {
    pub fn position(&self) -> usize {
        match self {
            TransformResult::Produced { position, .. } | TransformResult::Missing { position } => {
                *position
            }
        }
    }

    pub fn phonemes(&self) -> Option<&str> {
        match self {
            TransformResult::Produced { phonemes, .. } => Some(phonemes),
            TransformResult::Missing { .. } => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, TransformResult::Missing { .. })
    }

    pub fn into_phonemes(self) -> Option<String> {
        match self {
            TransformResult::Produced { phonemes, .. } => Some(phonemes),
            TransformResult::Missing { .. } => None,
        }
    }
}

/// Results of one shard, in intra-shard order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardBatch {
    pub shard_index: usize,
    pub results: Vec<TransformResult>,
}
