//! Bounded worker pool that runs shards through a transform.
//!
//! Each worker is a named OS thread pulling whole shards from a shared
//! crossbeam queue. A worker processes its shard record by record and sends
//! the shard's results back as one [`ShardBatch`]. Batches arrive in
//! completion order; restoring input order is the reassembler's job.
//!
//! A panic inside a shard is caught in the worker and sent back in place of
//! the batch, so the collector fails the run as soon as it happens.

use crate::error::{PhonoshardError, Result};
use crate::pipeline::types::{Record, Shard, ShardBatch, TransformResult};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Per-record transform run by the workers.
pub type TransformFn = Arc<dyn Fn(&Record) -> TransformResult + Send + Sync>;

/// Receives a tick after every processed record.
pub trait ProgressReporter: Send + Sync {
    fn record_done(&self);
}

/// Ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn record_done(&self) {}
}

/// A worker that panicked while processing a shard.
#[derive(Debug)]
struct WorkerFailure {
    worker: usize,
    message: String,
}

/// What a worker sends back for each shard.
type WorkerMessage = std::result::Result<ShardBatch, WorkerFailure>;

/// A fixed set of worker threads, alive for one pipeline run.
///
/// Dropping the pool cancels outstanding work: workers stop before their next
/// record. Workers stuck in a long transcription call are detached rather
/// than waited for.
pub struct WorkerPool {
    job_tx: Option<Sender<Shard>>,
    result_rx: Receiver<WorkerMessage>,
    handles: Vec<JoinHandle<()>>,
    cancelled: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Spawn `size` workers sharing `transform`.
    pub fn spawn(
        size: usize,
        transform: TransformFn,
        progress: Arc<dyn ProgressReporter>,
    ) -> Result<Self> {
        if size == 0 {
            return Err(PhonoshardError::PoolUnavailable {
                message: "worker count must be positive".to_string(),
            });
        }

        let (job_tx, job_rx) = unbounded::<Shard>();
        let (result_tx, result_rx) = unbounded::<WorkerMessage>();
        let cancelled = Arc::new(AtomicBool::new(false));

        let mut pool = Self {
            job_tx: Some(job_tx),
            result_rx,
            handles: Vec::with_capacity(size),
            cancelled: cancelled.clone(),
        };

        for worker in 0..size {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let transform = transform.clone();
            let progress = progress.clone();
            let cancelled = cancelled.clone();

            let handle = thread::Builder::new()
                .name(format!("phonoshard-worker-{worker}"))
                .spawn(move || {
                    worker_loop(
                        worker,
                        &job_rx,
                        &result_tx,
                        &transform,
                        progress.as_ref(),
                        &cancelled,
                    )
                })
                .map_err(|e| PhonoshardError::PoolUnavailable {
                    message: format!("failed to spawn worker {worker}: {e}"),
                })?;
            pool.handles.push(handle);
        }

        Ok(pool)
    }

    /// Run every shard and block until all batches are back.
    ///
    /// Returns one batch per shard, in completion order. A worker panic
    /// cancels the remaining work and fails with
    /// [`PhonoshardError::WorkerPanicked`] as soon as it is reported. With a
    /// `timeout`, fails with [`PhonoshardError::PipelineTimeout`] once it
    /// expires. Either way, whatever was already collected is discarded.
    pub fn run(mut self, shards: Vec<Shard>, timeout: Option<Duration>) -> Result<Vec<ShardBatch>> {
        let started = Instant::now();
        let deadline = timeout.map(|t| started + t);
        let expected = shards.len();

        if let Some(job_tx) = self.job_tx.take() {
            for shard in shards {
                // Fails only if every worker is gone; the collect loop reports why.
                if job_tx.send(shard).is_err() {
                    break;
                }
            }
        }

        let mut batches = Vec::with_capacity(expected);
        while batches.len() < expected {
            let received = match deadline {
                Some(deadline) => self.result_rx.recv_deadline(deadline),
                None => self
                    .result_rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(Ok(batch)) => batches.push(batch),
                Ok(Err(failure)) => {
                    self.cancel();
                    return Err(PhonoshardError::WorkerPanicked {
                        worker: failure.worker,
                        message: failure.message,
                    });
                }
                Err(RecvTimeoutError::Timeout) => {
                    self.cancel();
                    return Err(PhonoshardError::PipelineTimeout {
                        elapsed: started.elapsed(),
                    });
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.join_all()?;

        if batches.len() != expected {
            return Err(PhonoshardError::Reassembly {
                message: format!(
                    "workers delivered {} of {} shard batches",
                    batches.len(),
                    expected
                ),
            });
        }
        Ok(batches)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Join every worker, reporting the first one that panicked.
    fn join_all(&mut self) -> Result<()> {
        let mut first_panic = None;
        for (worker, handle) in std::mem::take(&mut self.handles).into_iter().enumerate() {
            if let Err(payload) = handle.join()
                && first_panic.is_none()
            {
                first_panic = Some(PhonoshardError::WorkerPanicked {
                    worker,
                    message: panic_message(payload.as_ref()),
                });
            }
        }
        match first_panic {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn worker_loop(
    worker: usize,
    jobs: &Receiver<Shard>,
    results: &Sender<WorkerMessage>,
    transform: &TransformFn,
    progress: &dyn ProgressReporter,
    cancelled: &AtomicBool,
) {
    while let Ok(shard) = jobs.recv() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            run_shard(&shard, transform, progress, cancelled)
        }));
        let message = match outcome {
            Ok(Some(batch)) => Ok(batch),
            // Cancelled mid-shard
            Ok(None) => return,
            Err(payload) => Err(WorkerFailure {
                worker,
                message: panic_message(payload.as_ref()),
            }),
        };
        let failed = message.is_err();
        if results.send(message).is_err() || failed {
            return;
        }
    }
}

/// Transform every record of `shard`, or `None` once the run is cancelled.
fn run_shard(
    shard: &Shard,
    transform: &TransformFn,
    progress: &dyn ProgressReporter,
    cancelled: &AtomicBool,
) -> Option<ShardBatch> {
    let mut results = Vec::with_capacity(shard.len());
    for record in &shard.records {
        if cancelled.load(Ordering::Relaxed) {
            return None;
        }
        results.push(transform(record));
        progress.record_done();
    }
    Some(ShardBatch {
        shard_index: shard.index,
        results,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `shards` through `transform` on a pool of `worker_count` threads.
///
/// Constructs the pool, runs it to completion and tears it down.
pub fn dispatch(
    shards: Vec<Shard>,
    transform: TransformFn,
    worker_count: usize,
) -> Result<Vec<ShardBatch>> {
    WorkerPool::spawn(worker_count, transform, Arc::new(NoProgress))?.run(shards, None)
}
