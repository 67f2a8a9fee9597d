//! Pipeline orchestrator: split, dispatch, reassemble.

use crate::alphabet::AllowedAlphabet;
use crate::defaults::default_worker_count;
use crate::error::{PhonoshardError, Result};
use crate::phonemize::Phonemizer;
use crate::pipeline::dispatcher::{NoProgress, ProgressReporter, TransformFn, WorkerPool};
use crate::pipeline::error::{ErrorReporter, LogReporter};
use crate::pipeline::reassembler::reassemble;
use crate::pipeline::splitter::split;
use crate::pipeline::transformer::RecordTransformer;
use crate::pipeline::types::{Record, TransformResult};
use std::sync::Arc;
use std::time::Duration;

/// Runtime parameters of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of worker threads. Default: available parallelism minus one.
    pub worker_count: usize,
    /// Number of shards. `None` means one shard per worker.
    pub shard_count: Option<usize>,
    /// Deadline for the whole run. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            shard_count: None,
            timeout: None,
        }
    }
}

impl PipelineConfig {
    /// One worker, one shard.
    pub fn sequential() -> Self {
        Self {
            worker_count: 1,
            ..Self::default()
        }
    }

    /// Resolve user settings. `accelerate = false` forces a single worker.
    pub fn from_settings(
        accelerate: bool,
        workers: Option<usize>,
        timeout: Option<Duration>,
    ) -> Self {
        let worker_count = if accelerate {
            workers.unwrap_or_else(default_worker_count)
        } else {
            1
        };
        Self {
            worker_count,
            shard_count: None,
            timeout,
        }
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_shards(mut self, shard_count: usize) -> Self {
        self.shard_count = Some(shard_count);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn effective_shards(&self) -> usize {
        self.shard_count.unwrap_or(self.worker_count)
    }
}

/// Phonemizes a text column in parallel.
///
/// The phonemizer and alphabet are shared by every run; the worker pool is
/// created and torn down inside each [`process`](Self::process) call.
pub struct Pipeline {
    config: PipelineConfig,
    phonemizer: Arc<dyn Phonemizer>,
    alphabet: Arc<AllowedAlphabet>,
    error_reporter: Arc<dyn ErrorReporter>,
    progress: Arc<dyn ProgressReporter>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        phonemizer: Arc<dyn Phonemizer>,
        alphabet: Arc<AllowedAlphabet>,
    ) -> Self {
        Self {
            config,
            phonemizer,
            alphabet,
            error_reporter: Arc::new(LogReporter),
            progress: Arc::new(NoProgress),
        }
    }

    /// Sets a custom error reporter for failed records.
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.error_reporter = reporter;
        self
    }

    /// Sets a progress reporter ticked after every record.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Phonemize `texts`, returning one result per text in input order.
    pub fn process(&self, texts: Vec<String>) -> Result<Vec<TransformResult>> {
        let transformer = RecordTransformer::new(self.phonemizer.clone(), self.alphabet.clone())
            .with_error_reporter(self.error_reporter.clone());
        let transform: TransformFn = Arc::new(move |record: &Record| transformer.transform(record));
        run(texts, transform, self.config, self.progress.clone())
    }
}

/// Run an arbitrary per-record `transform` over `texts`.
///
/// Splits into shards, runs them on a fresh pool, and reassembles the results
/// in input order. Fails without partial output on any structural error.
pub fn run(
    texts: Vec<String>,
    transform: TransformFn,
    config: PipelineConfig,
    progress: Arc<dyn ProgressReporter>,
) -> Result<Vec<TransformResult>> {
    if config.worker_count == 0 {
        return Err(PhonoshardError::InvalidArgument {
            message: "worker count must be positive".to_string(),
        });
    }

    let total = texts.len();
    let shards = split(texts, config.effective_shards())?;
    if shards.is_empty() {
        return Ok(Vec::new());
    }

    let pool_size = config.worker_count.min(shards.len());
    let batches = WorkerPool::spawn(pool_size, transform, progress)?.run(shards, config.timeout)?;
    reassemble(batches, total)
}

/// Phonemize `texts` on `worker_count` workers with default reporting.
pub fn process(
    texts: Vec<String>,
    phonemizer: Arc<dyn Phonemizer>,
    alphabet: Arc<AllowedAlphabet>,
    worker_count: usize,
) -> Result<Vec<TransformResult>> {
    let config = PipelineConfig::default().with_workers(worker_count);
    Pipeline::new(config, phonemizer, alphabet).process(texts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phonemize::MockPhonemizer;
    use crate::pipeline::error::CollectingReporter;

    fn ace() -> Arc<AllowedAlphabet> {
        Arc::new(AllowedAlphabet::new("ace".chars()))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert!(config.worker_count >= 1);
        assert_eq!(config.shard_count, None);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_config_from_settings_without_acceleration_is_sequential() {
        let config = PipelineConfig::from_settings(false, Some(8), None);
        assert_eq!(config.worker_count, 1);
    }

    #[test]
    fn test_config_from_settings_with_acceleration() {
        let config =
            PipelineConfig::from_settings(true, Some(6), Some(Duration::from_secs(30)));
        assert_eq!(config.worker_count, 6);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let auto = PipelineConfig::from_settings(true, None, None);
        assert_eq!(auto.worker_count, default_worker_count());
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = PipelineConfig::sequential()
            .with_workers(4)
            .with_shards(16)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.worker_count, 4);
        assert_eq!(config.effective_shards(), 16);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_concrete_scenario() {
        let reporter = Arc::new(CollectingReporter::new());
        let pipeline = Pipeline::new(
            PipelineConfig::default().with_workers(2),
            Arc::new(MockPhonemizer::new("echo").with_failure_on("cd")),
            ace(),
        )
        .with_error_reporter(reporter.clone());

        let results = pipeline.process(strings(&["ab", "cd", "ef"])).unwrap();
        assert_eq!(
            results,
            vec![
                TransformResult::Produced {
                    position: 0,
                    phonemes: "a".to_string()
                },
                TransformResult::Missing { position: 1 },
                TransformResult::Produced {
                    position: 2,
                    phonemes: "e".to_string()
                },
            ]
        );
        assert_eq!(reporter.failures().len(), 1);
    }

    #[test]
    fn test_zero_workers_is_invalid() {
        let err = process(
            strings(&["a"]),
            Arc::new(MockPhonemizer::new("echo")),
            ace(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, PhonoshardError::InvalidArgument { .. }));
    }

    #[test]
    fn test_zero_shards_is_invalid() {
        let pipeline = Pipeline::new(
            PipelineConfig::default().with_workers(2).with_shards(0),
            Arc::new(MockPhonemizer::new("echo")),
            ace(),
        );
        assert!(matches!(
            pipeline.process(strings(&["a"])),
            Err(PhonoshardError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_empty_input_returns_empty_output() {
        let results = process(Vec::new(), Arc::new(MockPhonemizer::new("echo")), ace(), 4).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_more_shards_than_workers() {
        let texts: Vec<String> = (0..50).map(|i| format!("a{i}c")).collect();
        let pipeline = Pipeline::new(
            PipelineConfig::default().with_workers(3).with_shards(11),
            Arc::new(MockPhonemizer::new("echo")),
            ace(),
        )
        .with_error_reporter(Arc::new(CollectingReporter::new()));
        let results = pipeline.process(texts).unwrap();
        assert_eq!(results.len(), 50);
        assert!(results.iter().all(|r| r.phonemes() == Some("ac")));
    }

    #[test]
    fn test_run_accepts_arbitrary_transform() {
        let transform: TransformFn = Arc::new(|record: &Record| TransformResult::Produced {
            position: record.position(),
            phonemes: record.text.len().to_string(),
        });
        let results = run(
            strings(&["a", "bb", "ccc"]),
            transform,
            PipelineConfig::default().with_workers(2),
            Arc::new(NoProgress),
        )
        .unwrap();
        let lengths: Vec<_> = results.iter().filter_map(|r| r.phonemes()).collect();
        assert_eq!(lengths, vec!["1", "2", "3"]);
    }
}
