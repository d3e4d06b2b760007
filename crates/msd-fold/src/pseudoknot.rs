use msd_core::errors::DesignError;
use msd_core::{Nucleotide, Structure};
use serde::{Deserialize, Serialize};

use crate::engine::FoldingEngine;
use crate::stacking::StackingModel;

/// Stacking model that scores each bracket family of a pseudoknotted target
/// as its own nested layer and charges a fixed penalty per extra layer.
///
/// The ensemble is still the nested one, so a knotted target may score below
/// the ensemble free energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PseudoknotModel {
    /// Model used for every nested layer and for the ensemble.
    pub nested: StackingModel,
    /// Penalty charged for each layer beyond the first.
    pub layer_penalty: f64,
}

impl Default for PseudoknotModel {
    fn default() -> Self {
        Self {
            nested: StackingModel::default(),
            layer_penalty: 7.0,
        }
    }
}

impl FoldingEngine for PseudoknotModel {
    fn name(&self) -> &'static str {
        "pseudoknot"
    }

    fn structure_energy(
        &self,
        sequence: &[Nucleotide],
        structure: &Structure,
    ) -> Result<f64, DesignError> {
        let layers = structure.layers();
        if layers.len() <= 1 {
            return self.nested.evaluate(sequence, structure);
        }
        let mut energy = self.layer_penalty * (layers.len() - 1) as f64;
        for kind in layers {
            energy += self.nested.evaluate(sequence, &structure.layer(kind))?;
        }
        Ok(energy)
    }

    fn ensemble_energy(&self, sequence: &[Nucleotide]) -> Result<f64, DesignError> {
        self.nested.ensemble_energy(sequence)
    }
}
