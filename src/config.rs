use crate::alphabet::AlphabetSet;
use crate::dataset::DatasetFormat;
use crate::defaults::{
    DEFAULT_COLUMNS, DEFAULT_ESPEAK_COMMAND, DEFAULT_LANGUAGE, DEFAULT_OUTPUT_COLUMN,
    DEFAULT_SEPARATOR, DEFAULT_TEXT_COLUMN,
};
use crate::error::{PhonoshardError, Result};
use crate::phonemize::EspeakConfig;
use crate::pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub pipeline: PipelineSettings,
    pub phonemizer: PhonemizerSettings,
    pub dataset: DatasetSettings,
    pub alphabet: AlphabetSettings,
}

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    /// Worker threads; unset means available parallelism minus one.
    pub workers: Option<usize>,
    /// Run on a pool; `false` forces a single worker.
    pub accelerate: bool,
    /// Deadline for a whole run, e.g. "30m".
    pub timeout: Option<String>,
}

/// Phonemizer backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhonemizerSettings {
    pub command: String,
    pub language: String,
    pub stress: bool,
}

/// Metadata file layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetSettings {
    pub separator: char,
    pub columns: Vec<String>,
    pub text_column: String,
    pub output_column: String,
}

/// Allowed symbol set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AlphabetSettings {
    pub set: AlphabetSet,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            workers: None,
            accelerate: true,
            timeout: None,
        }
    }
}

impl Default for PhonemizerSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_ESPEAK_COMMAND.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            stress: true,
        }
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
            output_column: DEFAULT_OUTPUT_COLUMN.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e)
                if e.downcast_ref::<std::io::Error>()
                    .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound) =>
            {
                Ok(Self::default())
            }
            Err(e) => Err(e.context(format!("Failed to load config from {}", path.display()))),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - PHONOSHARD_WORKERS → pipeline.workers
    /// - PHONOSHARD_LANGUAGE → phonemizer.language
    /// - PHONOSHARD_ESPEAK → phonemizer.command
    ///
    /// Empty or unparsable worker counts are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(workers) = std::env::var("PHONOSHARD_WORKERS")
            && let Ok(workers) = workers.trim().parse::<usize>()
        {
            self.pipeline.workers = Some(workers);
        }

        if let Ok(language) = std::env::var("PHONOSHARD_LANGUAGE")
            && !language.is_empty()
        {
            self.phonemizer.language = language;
        }

        if let Ok(command) = std::env::var("PHONOSHARD_ESPEAK")
            && !command.is_empty()
        {
            self.phonemizer.command = command;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/phonoshard/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("phonoshard")
            .join("config.toml")
    }

    /// Check values that TOML types alone cannot rule out.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.workers == Some(0) {
            return Err(PhonoshardError::ConfigInvalidValue {
                key: "pipeline.workers".to_string(),
                message: "must be positive".to_string(),
            });
        }
        self.timeout()?;
        if self.dataset.columns.is_empty() {
            return Err(PhonoshardError::ConfigInvalidValue {
                key: "dataset.columns".to_string(),
                message: "must list at least one column".to_string(),
            });
        }
        if !self.dataset.columns.contains(&self.dataset.text_column) {
            return Err(PhonoshardError::ConfigInvalidValue {
                key: "dataset.text_column".to_string(),
                message: format!(
                    "'{}' is not one of the dataset columns {:?}",
                    self.dataset.text_column, self.dataset.columns
                ),
            });
        }
        if self.phonemizer.command.trim().is_empty() {
            return Err(PhonoshardError::ConfigInvalidValue {
                key: "phonemizer.command".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Parsed `pipeline.timeout`.
    pub fn timeout(&self) -> Result<Option<Duration>> {
        self.pipeline
            .timeout
            .as_deref()
            .map(|t| {
                humantime::parse_duration(t.trim()).map_err(|e| {
                    PhonoshardError::ConfigInvalidValue {
                        key: "pipeline.timeout".to_string(),
                        message: e.to_string(),
                    }
                })
            })
            .transpose()
    }

    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig::from_settings(
            self.pipeline.accelerate,
            self.pipeline.workers,
            self.timeout()?,
        ))
    }

    pub fn espeak_config(&self) -> EspeakConfig {
        EspeakConfig {
            command: self.phonemizer.command.clone(),
            language: self.phonemizer.language.clone(),
            stress: self.phonemizer.stress,
        }
    }

    pub fn dataset_format(&self) -> DatasetFormat {
        DatasetFormat {
            separator: self.dataset.separator,
            columns: self.dataset.columns.clone(),
        }
    }

    /// Look up a value by dotted key, e.g. `phonemizer.language`.
    pub fn get_value_by_path(&self, key: &str) -> Result<String> {
        let serialized = toml::to_string(self).map_err(|e| PhonoshardError::ConfigParse {
            message: e.to_string(),
        })?;
        let root = toml::Value::Table(toml::from_str::<toml::Table>(&serialized)?);

        let mut current = &root;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| PhonoshardError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: "unknown configuration key".to_string(),
                })?;
        }

        Ok(match current {
            toml::Value::String(s) => s.clone(),
            toml::Value::Table(_) => toml::to_string(current).map_err(|e| {
                PhonoshardError::ConfigParse {
                    message: e.to_string(),
                }
            })?,
            other => other.to_string(),
        })
    }

    /// Commented template with every default spelled out.
    pub fn dump_template() -> String {
        format!(
            r#"# phonoshard configuration

[pipeline]
# Worker threads (default: available parallelism minus one)
# workers = 4
# Set to false to run on a single worker
accelerate = true
# Abort a run that takes longer than this (e.g. "30m", "2h")
# timeout = "1h"

[phonemizer]
command = "{command}"
language = "{language}"
stress = true

[dataset]
separator = "{separator}"
columns = [{columns}]
text_column = "{text_column}"
output_column = "{output_column}"

[alphabet]
# all | sound | english | all-english
set = "all"
"#,
            command = DEFAULT_ESPEAK_COMMAND,
            language = DEFAULT_LANGUAGE,
            separator = DEFAULT_SEPARATOR,
            columns = DEFAULT_COLUMNS
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(", "),
            text_column = DEFAULT_TEXT_COLUMN,
            output_column = DEFAULT_OUTPUT_COLUMN,
        )
    }
}
