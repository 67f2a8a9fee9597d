//! Command handlers: wires config, dataset I/O and the pipeline together.

use crate::alphabet::{AlphabetSet, AllowedAlphabet};
use crate::cli::ProcessArgs;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::defaults::{DEFAULT_OUTPUT_FILE, DEFAULT_REPORT_FILE};
use crate::error::PhonoshardError;
use crate::output::{ProgressOutput, render_alphabet, render_summary};
use crate::phonemize::{EspeakPhonemizer, Phonemizer};
use crate::pipeline::{ErrorReporter, Pipeline, ProgressReporter};
use crate::report::{DatasetStats, PhonemizationSummary, write_report};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Apply `process` flags on top of the loaded configuration.
pub fn apply_process_overrides(mut config: Config, args: &ProcessArgs) -> Config {
    if let Some(workers) = args.workers {
        config.pipeline.workers = Some(usize::from(workers));
    }
    if args.no_accelerate {
        config.pipeline.accelerate = false;
    }
    if let Some(set) = args.alphabet {
        config.alphabet.set = set;
    }
    if let Some(language) = &args.language {
        config.phonemizer.language = language.clone();
    }
    if args.no_stress {
        config.phonemizer.stress = false;
    }
    if let Some(column) = &args.text_column {
        config.dataset.text_column = column.clone();
    }
    config
}

/// Output path used when `-o` is not given.
pub fn default_output_path(metadata: &Path) -> PathBuf {
    sibling(metadata, DEFAULT_OUTPUT_FILE)
}

/// Report path used when `--report` is not given.
pub fn default_report_path(metadata: &Path) -> PathBuf {
    sibling(metadata, "stats").join(DEFAULT_REPORT_FILE)
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent()
        .map(|p| p.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Phonemize the text column of a metadata file and write the result.
pub fn run_process_command(config: Config, args: ProcessArgs, quiet: bool, verbose: u8) -> Result<()> {
    let config = apply_process_overrides(config, &args);
    config.validate()?;

    let mut pipeline_config = config.pipeline_config()?;
    if let Some(timeout) = args.timeout {
        pipeline_config = pipeline_config.with_timeout(timeout);
    }

    let dataset = Dataset::read(&args.metadata, config.dataset_format())
        .with_context(|| format!("Failed to read {}", args.metadata.display()))?;
    let texts = dataset.column(&config.dataset.text_column)?;

    let phonemizer = EspeakPhonemizer::new(config.espeak_config());
    if let Err(e) = phonemizer.check() {
        return Err(e).context("Run 'phonoshard check' for installation hints");
    }

    if verbose >= 1 {
        eprintln!(
            "{} {} records, {} workers, {} backend, alphabet '{}' ({} symbols)",
            "phonoshard:".dimmed(),
            texts.len(),
            pipeline_config.worker_count,
            phonemizer.name(),
            config.alphabet.set,
            AllowedAlphabet::from_set(config.alphabet.set).len()
        );
    }

    let output = Arc::new(if quiet {
        ProgressOutput::hidden()
    } else {
        ProgressOutput::new(texts.len())
    });

    let pipeline = Pipeline::new(
        pipeline_config,
        Arc::new(phonemizer),
        Arc::new(AllowedAlphabet::from_set(config.alphabet.set)),
    )
    .with_error_reporter(output.clone() as Arc<dyn ErrorReporter>)
    .with_progress(output.clone() as Arc<dyn ProgressReporter>);

    let started = Instant::now();
    let results = pipeline.process(texts);
    output.finish();
    let results = results?;
    let summary = PhonemizationSummary::from_results(&results, started.elapsed());

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.metadata));
    dataset
        .write_with_column(&output_path, &config.dataset.output_column, &results)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if quiet && output.failures() > 0 {
        eprintln!(
            "{} {} of {} records failed to phonemize",
            "phonoshard:".yellow(),
            output.failures(),
            summary.total
        );
    }

    if args.json {
        println!("{}", summary.to_json()?);
    } else if !quiet {
        println!("{}", render_summary(&summary));
        println!("  {} {}", "Output:".dimmed(), output_path.display());
    }
    Ok(())
}

/// Write (or print) dataset statistics.
pub fn run_stats_command(
    config: &Config,
    metadata: &Path,
    report: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let dataset = Dataset::read(metadata, config.dataset_format())
        .with_context(|| format!("Failed to read {}", metadata.display()))?;
    let stats = DatasetStats::from_dataset(&dataset);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let report_path = report.unwrap_or_else(|| default_report_path(metadata));
    write_report(&report_path, &stats)?;
    println!(
        "{} {} lines, {} columns",
        "Dataset:".dimmed(),
        stats.rows,
        stats.columns
    );
    println!("{} {}", "Report:".dimmed(), report_path.display());
    Ok(())
}

/// Print catalogue sizes, optionally with symbols.
pub fn run_alphabet_command(set: Option<AlphabetSet>, list: bool) {
    let sets: Vec<AlphabetSet> = match set {
        Some(set) => vec![set],
        None => AlphabetSet::ALL.to_vec(),
    };
    for set in sets {
        println!("{}", render_alphabet(set, list));
    }
}

/// Verify the phonemizer backend and print installation hints.
pub fn run_check_command(config: &Config) -> Result<()> {
    println!("Checking phonemizer backend...\n");
    print!("{} (phonemizer): ", config.phonemizer.command);

    let phonemizer = EspeakPhonemizer::new(config.espeak_config());
    match phonemizer.check() {
        Ok(version) => {
            println!("{} {}", "✓ OK".green(), version.dimmed());
            Ok(())
        }
        Err(PhonoshardError::PhonemizerNotFound { command }) => {
            println!("{}", "✗ NOT FOUND".red());
            println!("  Install: sudo apt install espeak-ng  (Debian/Ubuntu)");
            println!("           sudo pacman -S espeak-ng    (Arch)");
            println!("           brew install espeak-ng      (macOS)");
            Err(PhonoshardError::PhonemizerNotFound { command }.into())
        }
        Err(e) => Err(e.into()),
    }
}
