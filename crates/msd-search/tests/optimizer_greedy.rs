mod fixtures;

use fixtures::{open_structure, GuanineEngine, RecordingGraph};
use msd_core::RngHandle;
use msd_fold::Design;
use msd_graph::{DependencyGraph, ResampleStrategy};
use msd_search::{
    fixed_optimization, NoProgress, OptimizationParams, ProgressSink, SampleMode, StepProgress,
};

#[derive(Default)]
struct RecordingProgress {
    steps: Vec<StepProgress>,
    finished: usize,
}

impl ProgressSink for RecordingProgress {
    fn step(&mut self, progress: &StepProgress) {
        self.steps.push(*progress);
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}

fn params(number: u64, mode: SampleMode) -> OptimizationParams {
    OptimizationParams {
        weight: 0.5,
        number,
        mode,
    }
}

#[test]
fn greedy_accepts_only_strict_improvements() {
    let mut graph = RecordingGraph::new(8, 1);
    let mut design = Design::new(vec![open_structure(8)], None);
    let mut rng = RngHandle::from_seed(1);
    let outcome = fixed_optimization(
        &mut graph,
        &mut design,
        &GuanineEngine,
        &params(10, SampleMode::Sample),
        &mut rng,
        &mut NoProgress,
    )
    .expect("optimization");

    assert_eq!(graph.samples, 1);
    assert_eq!(outcome.samples, 10);
    assert_eq!(outcome.accepted, 8);
    assert_eq!(outcome.score, 0.0);
    assert_eq!(graph.reverts, vec![1, 1]);
    assert_eq!(design.sequence(), Some("UUUUUUUU"));
    assert_eq!(graph.get_sequence(), "UUUUUUUU");
}

#[test]
fn rejected_candidates_are_reverted_exactly() {
    let mut graph = RecordingGraph::new(6, 3);
    let mut design = Design::new(vec![open_structure(6)], Some("UUUUUU".to_string()));
    let mut rng = RngHandle::from_seed(2);
    let outcome = fixed_optimization(
        &mut graph,
        &mut design,
        &GuanineEngine,
        &params(5, SampleMode::SampleLocal),
        &mut rng,
        &mut NoProgress,
    )
    .expect("optimization");

    assert_eq!(graph.loads, 1);
    assert_eq!(graph.samples, 0);
    assert_eq!(outcome.samples, 5);
    assert_eq!(outcome.accepted, 0);
    assert_eq!(graph.reverts, vec![3; 5]);
    assert_eq!(graph.history_len(), 0);
    assert_eq!(design.sequence(), Some("UUUUUU"));
    assert!(graph
        .strategies
        .iter()
        .all(|strategy| *strategy == ResampleStrategy::Local));
}

#[test]
fn progress_sees_every_step_and_one_finish() {
    let mut graph = RecordingGraph::new(4, 1);
    let mut design = Design::new(vec![open_structure(4)], None);
    let mut rng = RngHandle::from_seed(3);
    let mut progress = RecordingProgress::default();
    let outcome = fixed_optimization(
        &mut graph,
        &mut design,
        &GuanineEngine,
        &params(7, SampleMode::SampleGlobal),
        &mut rng,
        &mut progress,
    )
    .expect("optimization");

    assert_eq!(progress.finished, 1);
    let steps: Vec<u64> = progress.steps.iter().map(|p| p.step).collect();
    assert_eq!(steps, (1..=7).collect::<Vec<_>>());
    assert!(progress.steps.iter().all(|p| p.total == 7 && p.solutions == 4));
    assert!(progress
        .steps
        .windows(2)
        .all(|pair| pair[1].score <= pair[0].score));
    assert_eq!(progress.steps.last().map(|p| p.score), Some(outcome.score));
}

#[test]
fn zero_candidates_only_score_the_start() {
    let mut graph = RecordingGraph::new(4, 1);
    let mut design = Design::new(vec![open_structure(4)], None);
    let mut rng = RngHandle::from_seed(4);
    let outcome = fixed_optimization(
        &mut graph,
        &mut design,
        &GuanineEngine,
        &params(0, SampleMode::Sample),
        &mut rng,
        &mut NoProgress,
    )
    .expect("optimization");
    assert_eq!(outcome.samples, 0);
    assert_eq!(outcome.score, 4.0);
    assert!(graph.strategies.is_empty());
}

#[test]
fn graph_errors_propagate() {
    let mut graph = RecordingGraph::new(4, 1).failing_after(2);
    let mut design = Design::new(vec![open_structure(4)], None);
    let mut rng = RngHandle::from_seed(5);
    let err = fixed_optimization(
        &mut graph,
        &mut design,
        &GuanineEngine,
        &params(5, SampleMode::Sample),
        &mut rng,
        &mut NoProgress,
    )
    .expect_err("third resample fails");
    assert_eq!(err.info().code, "inconsistent-resample");
}

#[test]
fn random_mode_never_uses_structural_elements() {
    let mut graph = RecordingGraph::new(4, 1);
    let mut design = Design::new(vec![open_structure(4)], None);
    let mut rng = RngHandle::from_seed(6);
    fixed_optimization(
        &mut graph,
        &mut design,
        &GuanineEngine,
        &params(300, SampleMode::Random),
        &mut rng,
        &mut NoProgress,
    )
    .expect("optimization");

    assert_eq!(graph.strategies.len(), 300);
    assert!(!graph
        .strategies
        .contains(&ResampleStrategy::StructuralElement));
    for expected in [
        ResampleStrategy::Single,
        ResampleStrategy::Local,
        ResampleStrategy::Global,
    ] {
        assert!(graph.strategies.contains(&expected));
    }
}
