//! Parallel shard pipeline for phonemizing a text column.
//!
//! The input is split into contiguous shards, each shard runs on one worker
//! thread of a bounded pool, and per-shard results are stitched back together
//! in input order. A failed record becomes a missing marker and never affects
//! its neighbours.

pub mod dispatcher;
pub mod error;
pub mod orchestrator;
pub mod reassembler;
pub mod splitter;
pub mod transformer;
pub mod types;

pub use dispatcher::{NoProgress, ProgressReporter, TransformFn, WorkerPool, dispatch};
pub use error::{
    CollectingReporter, ErrorReporter, LogReporter, RecordFailure, SilentReporter, format_failure,
};
pub use orchestrator::{Pipeline, PipelineConfig, process, run};
pub use reassembler::reassemble;
pub use splitter::split;
pub use transformer::RecordTransformer;
pub use types::{Record, Shard, ShardBatch, TransformResult};
