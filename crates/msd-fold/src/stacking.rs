//! Nested stacking energy model with a matching partition function.
//!
//! Every base pair contributes exactly one loop term: a stacking energy when
//! the next inner pair closes directly on it, a hairpin penalty when it
//! encloses no pair, and a flat penalty for every other loop it closes. The
//! partition function sums the same terms over all nested structures, so the
//! energy of any nested target with hairpins of at least `min_hairpin`
//! unpaired bases is never below the ensemble free energy.

use msd_core::errors::{DesignError, ErrorInfo};
use msd_core::{Nucleotide, Structure};
use serde::{Deserialize, Serialize};

use crate::engine::FoldingEngine;

/// Stacking free energies (kcal/mol) indexed by outer pair type and reversed
/// inner pair type, both in the order CG, GC, GU, UG, AU, UA.
const STACK: [[f64; 6]; 6] = [
    [-2.40, -3.30, -2.10, -1.40, -2.10, -2.10],
    [-3.30, -3.40, -2.50, -1.50, -2.20, -2.40],
    [-2.10, -2.50, 1.30, -0.50, -1.40, -1.30],
    [-1.40, -1.50, -0.50, 0.30, -0.60, -1.00],
    [-2.10, -2.20, -1.40, -0.60, -1.10, -0.90],
    [-2.10, -2.40, -1.30, -1.00, -0.90, -1.30],
];

/// Gas constant times 37 °C in kcal/mol.
const KT_37: f64 = 0.001_987_2 * 310.15;

fn pair_type(five: Nucleotide, three: Nucleotide) -> Option<usize> {
    use Nucleotide::*;
    match (five, three) {
        (C, G) => Some(0),
        (G, C) => Some(1),
        (G, U) => Some(2),
        (U, G) => Some(3),
        (A, U) => Some(4),
        (U, A) => Some(5),
        _ => None,
    }
}

/// Parameters of the stacking model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackingModel {
    /// Penalty for a pair closing a loop without inner pairs.
    pub hairpin: f64,
    /// Penalty for a pair closing an interior, bulge or multi-loop.
    pub loop_closure: f64,
    /// Minimum number of unpaired bases in a hairpin.
    pub min_hairpin: usize,
    /// Thermal energy in kcal/mol.
    pub kt: f64,
}

impl Default for StackingModel {
    fn default() -> Self {
        Self {
            hairpin: 5.4,
            loop_closure: 3.4,
            min_hairpin: 3,
            kt: KT_37,
        }
    }
}

impl StackingModel {
    fn stack(&self, sequence: &[Nucleotide], i: usize, j: usize) -> Option<f64> {
        let outer = pair_type(sequence[i], sequence[j])?;
        let inner = pair_type(sequence[j - 1], sequence[i + 1])?;
        Some(STACK[outer][inner])
    }

    fn can_pair(&self, sequence: &[Nucleotide], i: usize, j: usize) -> bool {
        j > i + self.min_hairpin && sequence[i].pairs_with(sequence[j])
    }

    /// Energy of `structure`, whose pairs must all be canonical.
    pub(crate) fn evaluate(
        &self,
        sequence: &[Nucleotide],
        structure: &Structure,
    ) -> Result<f64, DesignError> {
        if sequence.len() != structure.len() {
            return Err(DesignError::Fold(
                ErrorInfo::new("length-mismatch", "sequence and structure differ in length")
                    .with_context("sequence", sequence.len().to_string())
                    .with_context("structure", structure.len().to_string()),
            ));
        }
        let mut energy = 0.0;
        for pair in structure.pairs() {
            let (i, j) = (pair.i, pair.j);
            if !sequence[i].pairs_with(sequence[j]) {
                return Err(DesignError::Fold(
                    ErrorInfo::new("non-canonical-pair", "target pair cannot form on this sequence")
                        .with_context("i", i.to_string())
                        .with_context("j", j.to_string())
                        .with_context("structure", structure.as_str()),
                ));
            }
            let stacked = i + 1 < j - 1 && structure.partner(i + 1) == Some(j - 1);
            let enclosing = (i + 1..j).any(|k| structure.partner(k).is_some());
            energy += if stacked {
                self.stack(sequence, i, j).unwrap_or(self.loop_closure)
            } else if enclosing {
                self.loop_closure
            } else {
                self.hairpin
            };
        }
        Ok(energy)
    }

    /// Partition function `Z(0, n-1)` over nested structures.
    fn partition_function(&self, sequence: &[Nucleotide]) -> f64 {
        let n = sequence.len();
        if n == 0 {
            return 1.0;
        }
        let boltzmann = |energy: f64| (-energy / self.kt).exp();
        let hairpin = boltzmann(self.hairpin);
        let closure = boltzmann(self.loop_closure);

        // q[i][j] for j >= i; an empty interval (j < i) has weight 1.
        let mut q = vec![vec![1.0f64; n + 1]; n + 1];
        let mut qb = vec![vec![0.0f64; n]; n];
        let outer = |q: &Vec<Vec<f64>>, i: usize, j: isize| -> f64 {
            if j < i as isize {
                1.0
            } else {
                q[i][j as usize]
            }
        };

        for span in 1..=n {
            for i in 0..=n - span {
                let j = i + span - 1;
                if self.can_pair(sequence, i, j) {
                    let mut weight = hairpin;
                    let inner_q = outer(&q, i + 1, j as isize - 1);
                    let inner_qb = if i + 1 < j - 1 { qb[i + 1][j - 1] } else { 0.0 };
                    if inner_qb > 0.0 {
                        if let Some(stack) = self.stack(sequence, i, j) {
                            weight += boltzmann(stack) * inner_qb;
                        }
                    }
                    weight += closure * (inner_q - 1.0 - inner_qb).max(0.0);
                    qb[i][j] = weight;
                }
                let mut total = outer(&q, i, j as isize - 1);
                for k in i..j {
                    if qb[k][j] > 0.0 {
                        total += outer(&q, i, k as isize - 1) * qb[k][j];
                    }
                }
                q[i][j] = total;
            }
        }
        q[0][n - 1]
    }
}

impl FoldingEngine for StackingModel {
    fn name(&self) -> &'static str {
        "stacking"
    }

    fn structure_energy(
        &self,
        sequence: &[Nucleotide],
        structure: &Structure,
    ) -> Result<f64, DesignError> {
        self.evaluate(sequence, structure)
    }

    fn ensemble_energy(&self, sequence: &[Nucleotide]) -> Result<f64, DesignError> {
        let z = self.partition_function(sequence);
        if !(z.is_finite() && z > 0.0) {
            return Err(DesignError::Fold(
                ErrorInfo::new("partition-overflow", "partition function is not a positive finite number")
                    .with_context("length", sequence.len().to_string()),
            ));
        }
        Ok(-self.kt * z.ln())
    }
}
