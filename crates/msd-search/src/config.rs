use std::fs;
use std::path::Path;
use std::time::Duration;

use msd_core::errors::{DesignError, ErrorInfo};
use msd_fold::EngineKind;
use serde::{Deserialize, Serialize};

use crate::sampler::SampleMode;

/// YAML-configurable parameters governing a design session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of independent optimization runs.
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Upper end of the measurement schedule.
    #[serde(default = "default_stop")]
    pub stop: u64,
    /// Mutation mode.
    #[serde(default)]
    pub mode: SampleMode,
    /// Weight of the pairwise difference term of the objective.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Graph construction deadline in seconds; `0` disables it.
    #[serde(default)]
    pub timeout_secs: u64,
    /// Folding engine used by the objective.
    #[serde(default)]
    pub engine: EngineKind,
    /// Format of the records written to stdout.
    #[serde(default)]
    pub output: OutputFormat,
    /// Show a progress line on stderr.
    #[serde(default)]
    pub progress: bool,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_runs() -> usize {
    100
}

fn default_stop() -> u64 {
    100_000
}

fn default_weight() -> f64 {
    0.5
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            stop: default_stop(),
            mode: SampleMode::default(),
            weight: default_weight(),
            timeout_secs: 0,
            engine: EngineKind::default(),
            output: OutputFormat::default(),
            progress: false,
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Parses a YAML document. Missing fields take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, DesignError> {
        serde_yaml::from_str(text).map_err(|err| {
            DesignError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })
    }

    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, DesignError> {
        let text = fs::read_to_string(path).map_err(|err| {
            DesignError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml(&text).map_err(|err| match err {
            DesignError::Serde(info) => {
                DesignError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Renders the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, DesignError> {
        serde_yaml::to_string(self).map_err(|err| {
            DesignError::Serde(ErrorInfo::new("config-serialize", err.to_string()))
        })
    }

    /// Construction deadline, `None` when unlimited.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Record format written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One `sequence score energies` line per checkpoint.
    #[default]
    Human,
    /// Semicolon separated values with a header row.
    Csv,
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed from which every run's substream is derived.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded in run reports.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}
