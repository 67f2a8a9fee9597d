//! espeak-ng backend.
//!
//! Runs `espeak-ng -q --ipa -v <voice> -- <text>` and normalizes its output
//! into a single line of IPA symbols.

use crate::defaults::{DEFAULT_ESPEAK_COMMAND, DEFAULT_LANGUAGE};
use crate::error::{PhonoshardError, Result, TranscriptionError};
use crate::phonemize::command::{CommandExecutor, SystemCommandExecutor};
use crate::phonemize::phonemizer::Phonemizer;

/// Primary and secondary stress marks.
const STRESS_MARKS: [char; 2] = ['ˈ', 'ˌ'];

/// Longest language flag espeak emits on a language switch, e.g. `(en-us)`.
const MAX_LANGUAGE_FLAG_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EspeakConfig {
    /// espeak binary name or path.
    pub command: String,
    /// espeak voice, e.g. `en-us`.
    pub language: String,
    /// Keep stress marks in the output.
    pub stress: bool,
}

impl Default for EspeakConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_ESPEAK_COMMAND.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            stress: true,
        }
    }
}

pub struct EspeakPhonemizer<E: CommandExecutor = SystemCommandExecutor> {
    config: EspeakConfig,
    executor: E,
}

impl EspeakPhonemizer<SystemCommandExecutor> {
    pub fn new(config: EspeakConfig) -> Self {
        Self::with_executor(config, SystemCommandExecutor::new())
    }
}

impl<E: CommandExecutor> EspeakPhonemizer<E> {
    pub fn with_executor(config: EspeakConfig, executor: E) -> Self {
        Self { config, executor }
    }

    pub fn config(&self) -> &EspeakConfig {
        &self.config
    }

    /// Verify the backend binary runs. Returns its version line.
    pub fn check(&self) -> Result<String> {
        let output = self
            .executor
            .execute(&self.config.command, &["--version"])
            .map_err(|e| match e {
                PhonoshardError::PhonemizerNotFound { .. } => e,
                other => PhonoshardError::PhonemizerNotFound {
                    command: format!("{} ({})", self.config.command, other),
                },
            })?;
        Ok(output.lines().next().unwrap_or_default().trim().to_string())
    }

    fn normalize(&self, raw: &str) -> String {
        let joined = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let unflagged = remove_language_flags(&joined);
        if self.config.stress {
            unflagged
        } else {
            unflagged
                .chars()
                .filter(|c| !STRESS_MARKS.contains(c))
                .collect()
        }
    }
}

impl<E: CommandExecutor> Phonemizer for EspeakPhonemizer<E> {
    fn phonemize(&self, text: &str) -> std::result::Result<String, TranscriptionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(String::new());
        }
        let raw = self
            .executor
            .execute(
                &self.config.command,
                // `--` keeps texts starting with '-' from being read as options
                &["-q", "--ipa", "-v", &self.config.language, "--", text],
            )
            .map_err(|e| TranscriptionError::new(text, e.to_string()))?;
        Ok(self.normalize(&raw))
    }

    fn name(&self) -> &str {
        &self.config.command
    }
}

/// Strips language-switch flags such as `(fr)` or `(en-us)`.
///
/// Only short parenthesized groups of ASCII letters and hyphens are treated
/// as flags; anything else is kept verbatim.
fn remove_language_flags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('(') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(')') {
            Some(close)
                if close > 0
                    && close <= MAX_LANGUAGE_FLAG_LEN
                    && after[..close]
                        .chars()
                        .all(|c| c.is_ascii_alphabetic() || c == '-') =>
            {
                rest = &after[close + 1..];
            }
            _ => {
                result.push('(');
                rest = after;
            }
        }
    }
    result.push_str(rest);

    let mut collapsed = String::with_capacity(result.len());
    let mut prev_space = false;
    for c in result.chars() {
        if c == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        collapsed.push(c);
    }
    collapsed.trim().to_string()
}
