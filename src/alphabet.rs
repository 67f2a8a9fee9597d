//! Phonetic alphabet catalogue and allowed-symbol filtering.
//!
//! The catalogue groups IPA symbols the way phonetic charts do (pulmonic and
//! non-pulmonic consonants, vowels, suprasegmentals, diacritics). Named
//! [`AlphabetSet`]s combine those groups into the symbol sets a transcription
//! is filtered against.

use crate::error::{PhonoshardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Clicks, implosives and ejectives.
pub const NON_PULMONIC_CONSONANTS: &str = "ʘɓǀɗǃʄǂɠǁʛ";

/// Consonants produced with an egressive airstream from the lungs.
pub const PULMONIC_CONSONANTS: &str =
    "pbtdʈɖcɟkɡqɢʔɴŋɲɳnɱmʙrʀⱱɾɽɸβfvθðszʃʒʂʐçʝxɣχʁħʕhɦɬɮʋɹɻjɰlɭʎʟ";

pub const VOWELS: &str = "iyɨʉɯuɪʏʊeøɘəɵɤoɛœɜɞʌɔæɐaɶɑɒᵻ";

/// Stress and length marks.
pub const SUPRASEGMENTALS: &str = "ˈˌːˑ";

pub const DIACRITICS: &str = "ɚ˞ɫ";

pub const OTHER_SYMBOLS: &str = "ʍwɥʜʢʡɕʑɺɧ";

/// Terminal and word-separating punctuation, including the space.
pub const PUNCTUATION: &str = "!,-.:;? ";

/// English phoneme inventory (gruut/larynx conventions), without punctuation.
pub const ENGLISH_PHONEMES: &str = "_|‖#aɪaʊbdd͡ʒeɪfhiiːjklmnoʊpstt͡ʃuːvwzæðŋɑɑːɔɔɪəɛɝɡɪɹʃʊʌʒθ";

/// Named symbol sets from the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlphabetSet {
    /// Sound phonemes plus punctuation.
    #[default]
    All,
    /// Sound phonemes only.
    Sound,
    /// English inventory only.
    English,
    /// English inventory plus punctuation.
    AllEnglish,
}

impl AlphabetSet {
    pub const ALL: [AlphabetSet; 4] = [
        AlphabetSet::All,
        AlphabetSet::Sound,
        AlphabetSet::English,
        AlphabetSet::AllEnglish,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlphabetSet::All => "all",
            AlphabetSet::Sound => "sound",
            AlphabetSet::English => "english",
            AlphabetSet::AllEnglish => "all-english",
        }
    }

    /// Human-readable description used by the `alphabet` command.
    pub fn description(self) -> &'static str {
        match self {
            AlphabetSet::All => "total phonemes (including punctuation)",
            AlphabetSet::Sound => "sound phonemes (excluding punctuation)",
            AlphabetSet::English => "english phonemes (excluding punctuation)",
            AlphabetSet::AllEnglish => "total english phonemes (including punctuation)",
        }
    }

    /// Returns the sorted, deduplicated symbols of this set.
    pub fn symbols(self) -> BTreeSet<char> {
        let groups: &[&str] = match self {
            AlphabetSet::All => &[
                VOWELS,
                NON_PULMONIC_CONSONANTS,
                PULMONIC_CONSONANTS,
                SUPRASEGMENTALS,
                OTHER_SYMBOLS,
                DIACRITICS,
                PUNCTUATION,
            ],
            AlphabetSet::Sound => &[
                VOWELS,
                NON_PULMONIC_CONSONANTS,
                PULMONIC_CONSONANTS,
                SUPRASEGMENTALS,
                OTHER_SYMBOLS,
                DIACRITICS,
            ],
            AlphabetSet::English => &[ENGLISH_PHONEMES],
            AlphabetSet::AllEnglish => &[ENGLISH_PHONEMES, PUNCTUATION],
        };
        groups.iter().flat_map(|g| g.chars()).collect()
    }
}

impl fmt::Display for AlphabetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlphabetSet {
    type Err = PhonoshardError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        AlphabetSet::ALL
            .into_iter()
            .find(|set| set.name() == normalized)
            .ok_or_else(|| PhonoshardError::ConfigInvalidValue {
                key: "alphabet.set".to_string(),
                message: format!(
                    "unknown alphabet set '{}' (expected one of: all, sound, english, all-english)",
                    s
                ),
            })
    }
}

/// Immutable set of symbols a transcription may contain.
///
/// Built once and shared read-only (behind an `Arc`) by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedAlphabet {
    symbols: BTreeSet<char>,
}

impl AllowedAlphabet {
    pub fn new(symbols: impl IntoIterator<Item = char>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    pub fn from_set(set: AlphabetSet) -> Self {
        Self {
            symbols: set.symbols(),
        }
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    /// Keeps only allowed symbols, preserving their order.
    pub fn filter(&self, symbols: &str) -> String {
        symbols.chars().filter(|c| self.contains(*c)).collect()
    }

    /// Applies [`filter`](Self::filter) to every element of a batch.
    ///
    /// The output has the same length and order as the input.
    pub fn filter_batch<S: AsRef<str>>(&self, batch: &[S]) -> Vec<String> {
        batch.iter().map(|s| self.filter(s.as_ref())).collect()
    }
}

impl From<AlphabetSet> for AllowedAlphabet {
    fn from(set: AlphabetSet) -> Self {
        Self::from_set(set)
    }
}
