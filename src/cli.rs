//! Command-line interface for phonoshard
//!
//! Provides argument parsing using clap derive macros.

use crate::alphabet::AlphabetSet;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Parallel text-to-phoneme transcription for speech datasets
#[derive(Parser, Debug)]
#[command(
    name = "phonoshard",
    version,
    about = "Parallel text-to-phoneme transcription for speech datasets"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress progress and per-record diagnostics
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: show run settings)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Phonemize the text column of a metadata file
    Process(ProcessArgs),

    /// Write dataset statistics to a report file
    Stats {
        /// Metadata file (pipe-separated, no header)
        metadata: PathBuf,

        /// Report file (default: stats/report.csv next to the metadata file)
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,

        /// Print statistics as JSON instead of writing a report
        #[arg(long)]
        json: bool,
    },

    /// Show the phonetic alphabet catalogue
    Alphabet {
        /// Only show this set
        #[arg(long, value_name = "SET", value_parser = parse_alphabet_set)]
        set: Option<AlphabetSet>,

        /// Print the symbols of each set
        #[arg(long)]
        list: bool,
    },

    /// Check that the phonemizer backend is installed
    Check,

    /// Inspect configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Arguments of the `process` command
#[derive(clap::Args, Debug)]
pub struct ProcessArgs {
    /// Metadata file (pipe-separated, no header)
    pub metadata: PathBuf,

    /// Output file (default: raw_phonemes.csv next to the metadata file)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Worker threads (default: available parallelism minus one)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Run on a single worker
    #[arg(long)]
    pub no_accelerate: bool,

    /// Abort if the whole run takes longer than this. Examples: 90s, 30m, 1h30m
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Allowed symbol set (all, sound, english, all-english)
    #[arg(long, value_name = "SET", value_parser = parse_alphabet_set)]
    pub alphabet: Option<AlphabetSet>,

    /// espeak voice (default: en-us)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Drop stress marks from the transcription
    #[arg(long)]
    pub no_stress: bool,

    /// Column holding the text to phonemize (default: text2)
    #[arg(long, value_name = "COLUMN")]
    pub text_column: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value by key (e.g., phonemizer.language)
    Get {
        /// Dotted key path (e.g., pipeline.accelerate, dataset.text_column)
        key: String,
    },
    /// Print the configuration file path
    Path,
    /// Dump a commented configuration template
    Dump,
}

/// Parse a duration string.
///
/// Supports any format accepted by `humantime`; bare numbers are seconds.
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

fn parse_alphabet_set(s: &str) -> Result<AlphabetSet, String> {
    s.parse::<AlphabetSet>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process_args(args: &[&str]) -> ProcessArgs {
        let mut argv = vec!["phonoshard", "process"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Process(args) => args,
            other => panic!("Expected Process command, got {other:?}"),
        }
    }

    #[test]
    fn test_process_defaults() {
        let args = process_args(&["metadata.csv"]);
        assert_eq!(args.metadata, PathBuf::from("metadata.csv"));
        assert_eq!(args.output, None);
        assert_eq!(args.workers, None);
        assert!(!args.no_accelerate);
        assert_eq!(args.timeout, None);
        assert_eq!(args.alphabet, None);
        assert!(!args.no_stress);
        assert!(!args.json);
    }

    #[test]
    fn test_process_all_options() {
        let args = process_args(&[
            "metadata.csv",
            "-o",
            "out.csv",
            "-w",
            "8",
            "--no-accelerate",
            "--timeout",
            "1h30m",
            "--alphabet",
            "english",
            "--language",
            "en-gb",
            "--no-stress",
            "--text-column",
            "text1",
            "--json",
        ]);
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.workers, Some(8));
        assert!(args.no_accelerate);
        assert_eq!(args.timeout, Some(Duration::from_secs(5400)));
        assert_eq!(args.alphabet, Some(AlphabetSet::English));
        assert_eq!(args.language.as_deref(), Some("en-gb"));
        assert!(args.no_stress);
        assert_eq!(args.text_column.as_deref(), Some("text1"));
        assert!(args.json);
    }

    #[test]
    fn test_process_rejects_zero_workers() {
        assert!(Cli::try_parse_from(["phonoshard", "process", "m.csv", "-w", "0"]).is_err());
    }

    #[test]
    fn test_process_rejects_unknown_alphabet() {
        assert!(
            Cli::try_parse_from(["phonoshard", "process", "m.csv", "--alphabet", "runes"]).is_err()
        );
    }

    #[test]
    fn test_parse_timeout_formats() {
        assert_eq!(parse_timeout("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_timeout("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_timeout(" 2h ").unwrap(), Duration::from_secs(7200));
        assert!(parse_timeout("soon").is_err());
        assert!(parse_timeout("").is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["phonoshard", "check", "-q", "-vv", "--config", "c.toml"])
            .unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn test_stats_command() {
        let cli =
            Cli::try_parse_from(["phonoshard", "stats", "m.csv", "--report", "r.csv"]).unwrap();
        match cli.command {
            Commands::Stats {
                metadata,
                report,
                json,
            } => {
                assert_eq!(metadata, PathBuf::from("m.csv"));
                assert_eq!(report, Some(PathBuf::from("r.csv")));
                assert!(!json);
            }
            other => panic!("Expected Stats command, got {other:?}"),
        }
    }

    #[test]
    fn test_alphabet_command() {
        let cli = Cli::try_parse_from(["phonoshard", "alphabet", "--set", "sound", "--list"])
            .unwrap();
        match cli.command {
            Commands::Alphabet { set, list } => {
                assert_eq!(set, Some(AlphabetSet::Sound));
                assert!(list);
            }
            other => panic!("Expected Alphabet command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_get() {
        let cli = Cli::try_parse_from(["phonoshard", "config", "get", "phonemizer.language"])
            .unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Get { key },
            } => assert_eq!(key, "phonemizer.language"),
            other => panic!("Expected Config get, got {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["phonoshard"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
