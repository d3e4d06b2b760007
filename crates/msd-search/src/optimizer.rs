use msd_core::errors::DesignError;
use msd_core::RngHandle;
use msd_fold::{Design, FoldingEngine, MultiStateObjective, Objective};
use msd_graph::DependencyGraph;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::sampler::{sample_sequence, SampleMode};

/// Parameters of one optimizer call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationParams {
    /// Weight of the pairwise difference term of the objective.
    pub weight: f64,
    /// Number of candidate mutations to evaluate.
    pub number: u64,
    /// Mutation mode.
    pub mode: SampleMode,
}

impl Default for OptimizationParams {
    fn default() -> Self {
        Self {
            weight: 0.5,
            number: 100,
            mode: SampleMode::Sample,
        }
    }
}

/// Result of one optimizer call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// Score of the sequence held by the design afterwards.
    pub score: f64,
    /// Candidates evaluated; always the requested number.
    pub samples: u64,
    /// Candidates that strictly improved the score.
    pub accepted: u64,
}

/// Snapshot handed to a [`ProgressSink`] after every candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProgress {
    /// Candidates evaluated so far in this call.
    pub step: u64,
    /// Candidates requested for this call.
    pub total: u64,
    /// Current best score.
    pub score: f64,
    /// Solution estimate of the last resample.
    pub solutions: u128,
}

/// Observer of optimizer progress. It cannot influence the search.
pub trait ProgressSink {
    /// Called after every candidate.
    fn step(&mut self, progress: &StepProgress);

    /// Called once when the call completes.
    fn finish(&mut self) {}
}

/// Progress sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn step(&mut self, _progress: &StepProgress) {}
}

/// Puts the graph and the design on the same sequence: samples the graph when
/// the design is still empty, otherwise loads the design's sequence into it.
pub fn initialise_design<G>(
    graph: &mut G,
    design: &mut Design,
    rng: &mut RngHandle,
) -> Result<(), DesignError>
where
    G: DependencyGraph + ?Sized,
{
    match design.sequence() {
        Some(sequence) => graph.set_sequence(sequence)?,
        None => {
            graph.sample(rng)?;
        }
    }
    design.set_sequence(graph.get_sequence());
    Ok(())
}

/// Greedy stochastic local search: evaluates exactly `params.number` single
/// mutations and keeps each only if it strictly lowers the score.
pub fn fixed_optimization<G, P>(
    graph: &mut G,
    design: &mut Design,
    engine: &dyn FoldingEngine,
    params: &OptimizationParams,
    rng: &mut RngHandle,
    progress: &mut P,
) -> Result<OptimizationOutcome, DesignError>
where
    G: DependencyGraph + ?Sized,
    P: ProgressSink + ?Sized,
{
    initialise_design(graph, design, rng)?;
    let objective = MultiStateObjective::new(engine, params.weight);
    let mut score = objective.score(design)?;
    let mut accepted = 0u64;

    for step in 0..params.number {
        let report = sample_sequence(graph, design, params.mode, 1, rng)?;
        let candidate = objective.score(design)?;
        if candidate < score {
            score = candidate;
            accepted += 1;
        } else {
            graph.revert(report.changed)?;
            design.set_sequence(graph.get_sequence());
        }
        trace!(step, candidate, score, mode = %report.mode, "candidate evaluated");
        progress.step(&StepProgress {
            step: step + 1,
            total: params.number,
            score,
            solutions: report.solutions,
        });
    }
    progress.finish();

    Ok(OptimizationOutcome {
        score,
        samples: params.number,
        accepted,
    })
}
