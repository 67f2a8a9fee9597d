//! Default configuration constants for phonoshard.
//!
//! Shared by the config file layer, the CLI and the library so every entry
//! point agrees on the same defaults.

/// Hardware threads kept free for the orchestrating thread and the OS.
pub const WORKER_RESERVE: usize = 1;

/// Default espeak binary.
pub const DEFAULT_ESPEAK_COMMAND: &str = "espeak-ng";

/// Default espeak voice.
pub const DEFAULT_LANGUAGE: &str = "en-us";

/// Field separator of LJSpeech-style metadata files.
pub const DEFAULT_SEPARATOR: char = '|';

/// Column names of a headerless LJSpeech metadata file.
pub const DEFAULT_COLUMNS: [&str; 3] = ["id", "text1", "text2"];

/// Column holding the normalized text (numbers spelled out).
pub const DEFAULT_TEXT_COLUMN: &str = "text2";

/// Column appended to the output file.
pub const DEFAULT_OUTPUT_COLUMN: &str = "phonemes";

/// Output file name written next to the input when no path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "raw_phonemes.csv";

/// Report file name for dataset statistics.
pub const DEFAULT_REPORT_FILE: &str = "report.csv";

/// Number of workers used when the caller does not choose one.
///
/// Available hardware parallelism minus [`WORKER_RESERVE`], never below one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(WORKER_RESERVE)
        .max(1)
}
