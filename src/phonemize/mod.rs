//! Text-to-phoneme backends.
//!
//! The pipeline only sees the [`Phonemizer`] trait; concrete backends live
//! behind it so tests can inject deterministic or failing implementations.

pub mod command;
pub mod espeak;
pub mod phonemizer;

pub use command::{CommandExecutor, SystemCommandExecutor};
pub use espeak::{EspeakConfig, EspeakPhonemizer};
pub use phonemizer::{FnPhonemizer, MockPhonemizer, Phonemizer};
