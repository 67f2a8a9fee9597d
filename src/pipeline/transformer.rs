//! Failure-isolated per-record transformation.

use crate::alphabet::AllowedAlphabet;
use crate::phonemize::Phonemizer;
use crate::pipeline::error::{ErrorReporter, LogReporter, RecordFailure};
use crate::pipeline::types::{Record, TransformResult};
use std::sync::Arc;

/// Stage name used in diagnostics.
pub const STAGE: &str = "transformer";

/// Transcribes one record and filters it to the allowed alphabet.
///
/// A transcription failure is reported and turned into
/// [`TransformResult::Missing`]; it never propagates to the caller.
#[derive(Clone)]
pub struct RecordTransformer {
    phonemizer: Arc<dyn Phonemizer>,
    alphabet: Arc<AllowedAlphabet>,
    reporter: Arc<dyn ErrorReporter>,
}

impl RecordTransformer {
    pub fn new(phonemizer: Arc<dyn Phonemizer>, alphabet: Arc<AllowedAlphabet>) -> Self {
        Self {
            phonemizer,
            alphabet,
            reporter: Arc::new(LogReporter),
        }
    }

    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn transform(&self, record: &Record) -> TransformResult {
        match self.phonemizer.phonemize(&record.text) {
            Ok(raw) => TransformResult::Produced {
                position: record.position(),
                phonemes: self.alphabet.filter(&raw),
            },
            Err(error) => {
                self.reporter.report(
                    STAGE,
                    &RecordFailure {
                        position: record.position(),
                        error,
                    },
                );
                TransformResult::Missing {
                    position: record.position(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranscriptionError;
    use crate::phonemize::{FnPhonemizer, MockPhonemizer};
    use crate::pipeline::error::CollectingReporter;

    fn ace() -> Arc<AllowedAlphabet> {
        Arc::new(AllowedAlphabet::new("ace".chars()))
    }

    #[test]
    fn test_success_is_filtered() {
        let transformer = RecordTransformer::new(Arc::new(MockPhonemizer::new("echo")), ace());
        let result = transformer.transform(&Record::new(0, "abcdef"));
        assert_eq!(
            result,
            TransformResult::Produced {
                position: 0,
                phonemes: "ace".to_string()
            }
        );
    }

    #[test]
    fn test_failure_becomes_missing_and_is_reported() {
        let reporter = Arc::new(CollectingReporter::new());
        let transformer = RecordTransformer::new(
            Arc::new(MockPhonemizer::new("picky").with_failure_on("cd")),
            ace(),
        )
        .with_error_reporter(reporter.clone());

        let result = transformer.transform(&Record::new(1, "cd"));
        assert_eq!(result, TransformResult::Missing { position: 1 });

        let failures = reporter.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].position, 1);
        assert_eq!(failures[0].error.text, "cd");
    }

    #[test]
    fn test_success_is_not_reported() {
        let reporter = Arc::new(CollectingReporter::new());
        let transformer = RecordTransformer::new(Arc::new(MockPhonemizer::new("echo")), ace())
            .with_error_reporter(reporter.clone());
        transformer.transform(&Record::new(0, "ab"));
        assert!(reporter.failures().is_empty());
    }

    #[test]
    fn test_empty_transcription_is_produced_not_missing() {
        let transformer = RecordTransformer::new(
            Arc::new(FnPhonemizer::new("blank", |_: &str| Ok(String::new()))),
            ace(),
        );
        let result = transformer.transform(&Record::new(2, "zzz"));
        assert_eq!(result.phonemes(), Some(""));
    }

    #[test]
    fn test_error_message_reaches_reporter() {
        let reporter = Arc::new(CollectingReporter::new());
        let transformer = RecordTransformer::new(
            Arc::new(FnPhonemizer::new("strict", |text: &str| {
                Err(TranscriptionError::new(text, "unsupported language"))
            })),
            ace(),
        )
        .with_error_reporter(reporter.clone());

        transformer.transform(&Record::new(9, "bonjour"));
        assert_eq!(reporter.failures()[0].error.message, "unsupported language");
    }
}
