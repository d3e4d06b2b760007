use std::fmt;
use std::str::FromStr;

use msd_core::errors::{DesignError, ErrorInfo};
use msd_core::{Nucleotide, Structure};
use serde::{Deserialize, Serialize};

use crate::pseudoknot::PseudoknotModel;
use crate::stacking::StackingModel;

/// Capability interface of a folding/energy engine. Energies are free
/// energies in kcal/mol.
pub trait FoldingEngine: Send + Sync {
    /// Short engine identifier used in logs and output preambles.
    fn name(&self) -> &'static str;

    /// Free energy of `sequence` folded into `structure`.
    fn structure_energy(
        &self,
        sequence: &[Nucleotide],
        structure: &Structure,
    ) -> Result<f64, DesignError>;

    /// Ensemble free energy of `sequence` over all structures the engine knows.
    fn ensemble_energy(&self, sequence: &[Nucleotide]) -> Result<f64, DesignError>;
}

/// Built-in engines selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// Nested stacking model.
    #[default]
    Stacking,
    /// Stacking model evaluated per bracket layer, for pseudoknotted targets.
    Pseudoknot,
}

impl EngineKind {
    /// Instantiates the engine with default parameters.
    pub fn build(self) -> Box<dyn FoldingEngine> {
        match self {
            EngineKind::Stacking => Box::new(StackingModel::default()),
            EngineKind::Pseudoknot => Box::new(PseudoknotModel::default()),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Stacking => f.write_str("stacking"),
            EngineKind::Pseudoknot => f.write_str("pseudoknot"),
        }
    }
}

impl FromStr for EngineKind {
    type Err = DesignError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stacking" => Ok(EngineKind::Stacking),
            "pseudoknot" => Ok(EngineKind::Pseudoknot),
            other => Err(DesignError::Fold(
                ErrorInfo::new("unknown-engine", "no folding engine with this name")
                    .with_context("engine", other)
                    .with_hint("use `stacking` or `pseudoknot`"),
            )),
        }
    }
}
