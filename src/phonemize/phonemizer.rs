//! Phonemizer trait and in-process implementations.

use crate::error::TranscriptionError;

/// Converts text into a sequence of phonetic symbols.
///
/// Object-safe, Send + Sync so one instance can be shared by every worker.
/// Implementations may be slow and may fail; failures are reported per call
/// and never poison the instance.
pub trait Phonemizer: Send + Sync {
    /// Transcribe one piece of text.
    fn phonemize(&self, text: &str) -> Result<String, TranscriptionError>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}

/// Adapts a closure into a [`Phonemizer`].
pub struct FnPhonemizer<F> {
    func: F,
    name: String,
}

impl<F> FnPhonemizer<F>
where
    F: Fn(&str) -> Result<String, TranscriptionError> + Send + Sync,
{
    pub fn new(name: &str, func: F) -> Self {
        Self {
            func,
            name: name.to_string(),
        }
    }
}

impl<F> Phonemizer for FnPhonemizer<F>
where
    F: Fn(&str) -> Result<String, TranscriptionError> + Send + Sync,
{
    fn phonemize(&self, text: &str) -> Result<String, TranscriptionError> {
        (self.func)(text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Mock phonemizer for testing.
///
/// Echoes its input unless a fixed response is configured, and fails for
/// configured inputs (or for everything).
#[derive(Debug, Clone)]
pub struct MockPhonemizer {
    name: String,
    response: Option<String>,
    fail_on: Vec<String>,
    fail_all: bool,
}

impl MockPhonemizer {
    /// Create a new echoing mock.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: None,
            fail_on: Vec::new(),
            fail_all: false,
        }
    }

    /// Return a fixed response instead of echoing.
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = Some(response.to_string());
        self
    }

    /// Fail whenever the input equals `text`.
    pub fn with_failure_on(mut self, text: &str) -> Self {
        self.fail_on.push(text.to_string());
        self
    }

    /// Fail on every input.
    pub fn with_failure(mut self) -> Self {
        self.fail_all = true;
        self
    }
}

impl Phonemizer for MockPhonemizer {
    fn phonemize(&self, text: &str) -> Result<String, TranscriptionError> {
        if self.fail_all || self.fail_on.iter().any(|t| t == text) {
            return Err(TranscriptionError::new(text, "mock transcription failure"));
        }
        Ok(self.response.clone().unwrap_or_else(|| text.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_echoes_input() {
        let mock = MockPhonemizer::new("echo");
        assert_eq!(mock.phonemize("hello").unwrap(), "hello");
    }

    #[test]
    fn test_mock_fixed_response() {
        let mock = MockPhonemizer::new("fixed").with_response("həloʊ");
        assert_eq!(mock.phonemize("anything").unwrap(), "həloʊ");
    }

    #[test]
    fn test_mock_fails_on_configured_input() {
        let mock = MockPhonemizer::new("picky").with_failure_on("cd");
        assert!(mock.phonemize("ab").is_ok());
        let err = mock.phonemize("cd").unwrap_err();
        assert_eq!(err.text, "cd");
        assert_eq!(err.message, "mock transcription failure");
    }

    #[test]
    fn test_mock_fails_everything() {
        let mock = MockPhonemizer::new("broken").with_failure();
        assert!(mock.phonemize("").is_err());
        assert!(mock.phonemize("ab").is_err());
    }

    #[test]
    fn test_fn_phonemizer_wraps_closure() {
        let upper = FnPhonemizer::new("upper", |text: &str| Ok(text.to_uppercase()));
        assert_eq!(upper.phonemize("abc").unwrap(), "ABC");
        assert_eq!(upper.name(), "upper");
    }

    #[test]
    fn test_phonemizer_trait_is_object_safe() {
        let phonemizer: Box<dyn Phonemizer> = Box::new(MockPhonemizer::new("boxed"));
        assert_eq!(phonemizer.name(), "boxed");
        assert_eq!(phonemizer.phonemize("x").unwrap(), "x");
    }
}
