use msd_core::errors::{DesignError, ErrorInfo};
use msd_core::parse_sequence;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::design::{Design, Evaluation};
use crate::engine::FoldingEngine;

/// Scalar objective over a design. Lower is better.
pub trait Objective {
    /// Scores the design's current sequence.
    fn score(&self, design: &mut Design) -> Result<f64, DesignError>;
}

/// Breakdown of the multi-state objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveBreakdown {
    /// Mean gap between each target energy and the ensemble free energy.
    pub ensemble_gap: f64,
    /// Mean absolute energy difference over all pairs of targets.
    pub pairwise_difference: f64,
    /// `ensemble_gap + weight * pairwise_difference`.
    pub total: f64,
}

/// Multi-state design objective backed by a folding engine.
///
/// The first term pulls every target towards being the dominant fold; the
/// second term, scaled by `weight`, pulls the target energies together so no
/// single structure wins.
pub struct MultiStateObjective<'a> {
    engine: &'a dyn FoldingEngine,
    weight: f64,
}

impl<'a> MultiStateObjective<'a> {
    /// Creates the objective; `weight` is clamped to `[0, 1]`.
    pub fn new(engine: &'a dyn FoldingEngine, weight: f64) -> Self {
        Self {
            engine,
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Weight applied to the pairwise difference term.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Computes the breakdown, folding only when the cached results are stale.
    pub fn breakdown(&self, design: &mut Design) -> Result<ObjectiveBreakdown, DesignError> {
        if design.evaluation().is_none() {
            let evaluation = fold_design(design, self.engine)?;
            design.store_evaluation(evaluation);
        }
        let Some(evaluation) = design.evaluation() else {
            return Err(DesignError::Fold(ErrorInfo::new(
                "missing-evaluation",
                "evaluation was not stored for the current sequence",
            )));
        };
        Ok(combine(evaluation, self.weight))
    }
}

impl Objective for MultiStateObjective<'_> {
    fn score(&self, design: &mut Design) -> Result<f64, DesignError> {
        Ok(self.breakdown(design)?.total)
    }
}

/// Scores `design` against all of its targets with `engine`.
pub fn calculate_objective(
    design: &mut Design,
    engine: &dyn FoldingEngine,
    weight: f64,
) -> Result<f64, DesignError> {
    MultiStateObjective::new(engine, weight).score(design)
}

fn fold_design(design: &Design, engine: &dyn FoldingEngine) -> Result<Evaluation, DesignError> {
    let Some(sequence) = design.sequence() else {
        return Err(DesignError::Fold(
            ErrorInfo::new("missing-sequence", "design has no sequence to evaluate")
                .with_hint("sample or set a sequence before scoring"),
        ));
    };
    let bases = parse_sequence(sequence)?;
    let structure_energies = design
        .structures()
        .iter()
        .map(|structure| engine.structure_energy(&bases, structure))
        .collect::<Result<Vec<_>, _>>()?;
    let ensemble_energy = engine.ensemble_energy(&bases)?;
    trace!(engine = engine.name(), sequence, "folded design");
    Ok(Evaluation {
        sequence: sequence.to_string(),
        structure_energies,
        ensemble_energy,
    })
}

fn combine(evaluation: &Evaluation, weight: f64) -> ObjectiveBreakdown {
    let energies = &evaluation.structure_energies;
    let count = energies.len().max(1) as f64;
    let ensemble_gap = energies
        .iter()
        .map(|energy| energy - evaluation.ensemble_energy)
        .sum::<f64>()
        / count;

    let mut difference = 0.0;
    let mut pairs = 0usize;
    for (index, first) in energies.iter().enumerate() {
        for second in &energies[index + 1..] {
            difference += (first - second).abs();
            pairs += 1;
        }
    }
    let pairwise_difference = if pairs == 0 {
        0.0
    } else {
        difference / pairs as f64
    };

    ObjectiveBreakdown {
        ensemble_gap,
        pairwise_difference,
        total: ensemble_gap + weight * pairwise_difference,
    }
}
