//! Run configuration.
//!
//! A run is described by a small TOML file. Every section is optional;
//! command-line flags override whatever the file sets.

use crate::extraction::ExtractionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// No input path was given.
    #[error("no input file configured")]
    MissingInput,
    /// No output path was given.
    #[error("no output file configured")]
    MissingOutput,
    /// Input and output name the same file.
    #[error("input and output refer to the same file: {0}")]
    SameInputOutput(PathBuf),
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file is not valid TOML for this layout.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[extraction]` table.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// `[input]` table.
    #[serde(default)]
    pub input: InputConfig,
    /// `[output]` table.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractionConfig {
    /// Policy used to derive bits.
    #[serde(default)]
    pub policy: ExtractionPolicy,
}

/// Sample source settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputConfig {
    /// Text file with one delay per line.
    pub path: Option<PathBuf>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File receiving the packed bytes.
    pub path: Option<PathBuf>,
    /// Compute input statistics before extracting.
    #[serde(default = "default_true")]
    pub statistics: bool,
    /// Include the histogram when reporting statistics.
    #[serde(default)]
    pub histogram: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            statistics: true,
            histogram: false,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Resolves the file into a complete run configuration.
    pub fn into_run_config(self) -> Result<RunConfig, ConfigError> {
        let config = RunConfig {
            input: self.input.path.ok_or(ConfigError::MissingInput)?,
            output: self.output.path.ok_or(ConfigError::MissingOutput)?,
            policy: self.extraction.policy,
            statistics: self.output.statistics,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Settings for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Sample file.
    pub input: PathBuf,
    /// Byte sink.
    pub output: PathBuf,
    /// Extraction policy.
    pub policy: ExtractionPolicy,
    /// Compute statistics over the samples.
    pub statistics: bool,
}

impl RunConfig {
    /// Creates a configuration with the default policy and statistics on.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            policy: ExtractionPolicy::default(),
            statistics: true,
        }
    }

    /// Sets the extraction policy.
    pub fn with_policy(mut self, policy: ExtractionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enables or disables the statistics pass.
    pub fn with_statistics(mut self, statistics: bool) -> Self {
        self.statistics = statistics;
        self
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input == self.output {
            return Err(ConfigError::SameInputOutput(self.input.clone()));
        }
        Ok(())
    }
}
