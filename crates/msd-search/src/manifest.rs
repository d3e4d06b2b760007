use std::fs;
use std::path::Path;

use msd_core::errors::{DesignError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::driver::RunSummary;

/// Structured report describing a finished design session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Configuration used for the session.
    pub config: RunConfig,
    /// Master seed used to derive run substreams.
    pub master_seed: u64,
    /// Optional seed label captured from the configuration.
    pub seed_label: Option<String>,
    /// Per-run summaries in run order.
    pub runs: Vec<RunSummary>,
}

impl RunReport {
    /// Bundles the summaries with the configuration that produced them.
    pub fn new(config: &RunConfig, runs: Vec<RunSummary>) -> Self {
        Self {
            config: config.clone(),
            master_seed: config.seed_policy.master_seed,
            seed_label: config.seed_policy.label.clone(),
            runs,
        }
    }

    /// Writes the report to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), DesignError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                DesignError::Serde(
                    ErrorInfo::new("report-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            DesignError::Serde(
                ErrorInfo::new("report-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            DesignError::Serde(
                ErrorInfo::new("report-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a report from disk.
    pub fn load(path: &Path) -> Result<Self, DesignError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            DesignError::Serde(
                ErrorInfo::new("report-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            DesignError::Serde(
                ErrorInfo::new("report-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
