//! Dataset statistics and run summaries.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::pipeline::TransformResult;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Shape of a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub rows: usize,
    pub columns: usize,
}

impl DatasetStats {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            rows: dataset.len(),
            columns: dataset.column_count(),
        }
    }

    /// Report line, e.g. `2026-01-01T12:00:00Z,the raw dataset has 13100 lines and 3 columns`.
    pub fn report_line(&self, at: SystemTime) -> String {
        format!(
            "{},the raw dataset has {} lines and {} columns",
            humantime::format_rfc3339_seconds(at),
            self.rows,
            self.columns
        )
    }
}

/// Overwrite `path` with a one-line report, creating parent directories.
pub fn write_report(path: &Path, stats: &DatasetStats) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{}\n", stats.report_line(SystemTime::now())))?;
    Ok(())
}

/// Outcome counts of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhonemizationSummary {
    pub total: usize,
    pub produced: usize,
    pub missing: usize,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl PhonemizationSummary {
    pub fn from_results(results: &[TransformResult], elapsed: Duration) -> Self {
        let missing = results.iter().filter(|r| r.is_missing()).count();
        Self {
            total: results.len(),
            produced: results.len() - missing,
            missing,
            elapsed,
        }
    }

    /// Records per second, or 0 for an instant run.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total as f64 / secs
        } else {
            0.0
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::error::PhonoshardError::Other(e.to_string()))
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u128(duration.as_millis())
    }
}
