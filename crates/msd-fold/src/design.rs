use msd_core::Structure;
use serde::{Deserialize, Serialize};

/// Folding results cached for one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Sequence the energies were computed for.
    pub sequence: String,
    /// Energy of the sequence in each target structure, in target order.
    pub structure_energies: Vec<f64>,
    /// Ensemble free energy of the sequence.
    pub ensemble_energy: f64,
}

/// Mutable per-run design state: one candidate sequence and its targets.
#[derive(Debug, Clone)]
pub struct Design {
    structures: Vec<Structure>,
    sequence: Option<String>,
    evaluation: Option<Evaluation>,
}

impl Design {
    /// Creates a design, optionally seeded with a start sequence.
    pub fn new(structures: Vec<Structure>, sequence: Option<String>) -> Self {
        Self {
            structures,
            sequence: sequence.filter(|s| !s.is_empty()),
            evaluation: None,
        }
    }

    /// Ordered target structures.
    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    /// Current sequence, if one has been assigned.
    pub fn sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    /// Replaces the current sequence.
    pub fn set_sequence(&mut self, sequence: String) {
        self.sequence = Some(sequence);
    }

    /// Cached folding results, if they belong to the current sequence.
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match (&self.evaluation, &self.sequence) {
            (Some(evaluation), Some(sequence)) if &evaluation.sequence == sequence => {
                Some(evaluation)
            }
            _ => None,
        }
    }

    pub(crate) fn store_evaluation(&mut self, evaluation: Evaluation) {
        self.evaluation = Some(evaluation);
    }

    /// One human readable line: sequence, score and per-structure energies.
    pub fn write_out(&self, score: f64) -> String {
        let sequence = self.sequence().unwrap_or("-");
        match self.evaluation() {
            Some(evaluation) => {
                let energies: Vec<String> = evaluation
                    .structure_energies
                    .iter()
                    .map(|energy| format!("{energy:.2}"))
                    .collect();
                format!(
                    "{sequence}\t{score:.4}\t[{}]\t{:.2}",
                    energies.join(", "),
                    evaluation.ensemble_energy
                )
            }
            None => format!("{sequence}\t{score:.4}"),
        }
    }

    /// Design-specific CSV column names.
    pub fn csv_header(&self) -> Vec<String> {
        let mut header = vec!["sequence".to_string()];
        header.extend((0..self.structures.len()).map(|index| format!("energy_{index}")));
        header.push("ensemble_energy".to_string());
        header
    }

    /// Design-specific CSV values matching [`Design::csv_header`].
    pub fn csv_fields(&self) -> Vec<String> {
        let mut fields = vec![self.sequence().unwrap_or_default().to_string()];
        match self.evaluation() {
            Some(evaluation) => {
                fields.extend(
                    evaluation
                        .structure_energies
                        .iter()
                        .map(|energy| format!("{energy:.4}")),
                );
                fields.push(format!("{:.4}", evaluation.ensemble_energy));
            }
            None => {
                fields.extend((0..=self.structures.len()).map(|_| "NA".to_string()));
            }
        }
        fields
    }
}

/// Produces a fresh, independently owned [`Design`] for every run.
#[derive(Debug, Clone)]
pub struct DesignFactory {
    structures: Vec<Structure>,
    start_sequence: Option<String>,
}

impl DesignFactory {
    /// Creates a factory for the given targets and optional start sequence.
    pub fn new(structures: Vec<Structure>, start_sequence: Option<String>) -> Self {
        Self {
            structures,
            start_sequence,
        }
    }

    /// Builds a new unoptimized design.
    pub fn create(&self) -> Design {
        Design::new(self.structures.clone(), self.start_sequence.clone())
    }
}
