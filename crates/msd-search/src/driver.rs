use std::time::{Duration, Instant};

use indexmap::IndexMap;
use msd_core::errors::DesignError;
use msd_fold::{Design, DesignFactory, FoldingEngine, MultiStateObjective};
use msd_graph::{DependencyGraph, GraphProperties};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::determinism;
use crate::optimizer::{
    fixed_optimization, initialise_design, NoProgress, OptimizationParams, ProgressSink,
};
use crate::records::{CheckpointRecord, RecordSink, RECORD_COLUMNS};
use crate::schedule::measurement_schedule;

/// Summary of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run index.
    pub run: usize,
    /// Score at the last checkpoint.
    pub final_score: f64,
    /// Candidate mutations evaluated.
    pub mutations: u64,
    /// Candidates accepted.
    pub accepted: u64,
    /// Final sequence.
    pub sequence: String,
}

/// Executes `config.runs` independent optimization runs over one graph,
/// reporting a checkpoint at every point of the measurement schedule.
pub struct RunDriver<'a, G: DependencyGraph + ?Sized> {
    graph: &'a mut G,
    engine: &'a dyn FoldingEngine,
    factory: &'a DesignFactory,
    config: &'a RunConfig,
    sink: &'a mut dyn RecordSink,
    progress: Option<&'a mut dyn ProgressSink>,
    construction_time: Duration,
}

impl<'a, G: DependencyGraph + ?Sized> RunDriver<'a, G> {
    /// Creates a driver writing records to `sink`.
    pub fn new(
        graph: &'a mut G,
        engine: &'a dyn FoldingEngine,
        factory: &'a DesignFactory,
        config: &'a RunConfig,
        sink: &'a mut dyn RecordSink,
    ) -> Self {
        Self {
            graph,
            engine,
            factory,
            config,
            sink,
            progress: None,
            construction_time: Duration::ZERO,
        }
    }

    /// Construction time reported in every record.
    pub fn with_construction_time(mut self, elapsed: Duration) -> Self {
        self.construction_time = elapsed;
        self
    }

    /// Observer attached to every optimizer call.
    pub fn with_progress(mut self, progress: &'a mut dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Runs every configured run. The first optimizer error aborts the session.
    pub fn run(&mut self) -> Result<Vec<RunSummary>, DesignError> {
        let schedule = measurement_schedule(self.config.stop);
        let properties = GraphProperties::collect(&*self.graph)?.fields();
        let mut columns: Vec<String> = RECORD_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.extend(self.factory.create().csv_header());
        columns.extend(properties.keys().cloned());
        self.sink.header(&columns)?;

        info!(
            runs = self.config.runs,
            checkpoints = schedule.len() + 1,
            mode = %self.config.mode,
            engine = self.engine.name(),
            "starting design runs"
        );
        let mut summaries = Vec::with_capacity(self.config.runs);
        for run in 0..self.config.runs {
            summaries.push(self.run_once(run, &schedule, &properties)?);
        }
        Ok(summaries)
    }

    fn run_once(
        &mut self,
        run: usize,
        schedule: &[u64],
        properties: &IndexMap<String, String>,
    ) -> Result<RunSummary, DesignError> {
        let mut rng = determinism::run_rng(self.config.seed_policy.master_seed, run);
        let mut design = self.factory.create();
        let objective = MultiStateObjective::new(self.engine, self.config.weight);

        initialise_design(&mut *self.graph, &mut design, &mut rng)?;
        let mut score = objective.breakdown(&mut design)?.total;
        let mut mutations = 0u64;
        let mut accepted = 0u64;
        let start = Instant::now();
        self.emit(run, score, mutations, Duration::ZERO, &design, properties)?;

        let params = OptimizationParams {
            weight: self.config.weight,
            number: 0,
            mode: self.config.mode,
        };
        for &number in schedule {
            let params = OptimizationParams { number, ..params };
            let outcome = match self.progress.as_deref_mut() {
                Some(progress) => fixed_optimization(
                    &mut *self.graph,
                    &mut design,
                    self.engine,
                    &params,
                    &mut rng,
                    progress,
                )?,
                None => fixed_optimization(
                    &mut *self.graph,
                    &mut design,
                    self.engine,
                    &params,
                    &mut rng,
                    &mut NoProgress,
                )?,
            };
            score = outcome.score;
            mutations += outcome.samples;
            accepted += outcome.accepted;
            // Refolds only when the last candidate was rejected.
            objective.breakdown(&mut design)?;
            self.emit(run, score, mutations, start.elapsed(), &design, properties)?;
        }

        let sequence = design.sequence().unwrap_or_default().to_string();
        debug!(run, score, mutations, accepted, %sequence, "run finished");
        Ok(RunSummary {
            run,
            final_score: score,
            mutations,
            accepted,
            sequence,
        })
    }

    fn emit(
        &mut self,
        run: usize,
        score: f64,
        mutations: u64,
        sample_time: Duration,
        design: &Design,
        properties: &IndexMap<String, String>,
    ) -> Result<(), DesignError> {
        debug!(run, mutations, score, "checkpoint");
        let record = CheckpointRecord {
            run,
            mode: self.config.mode,
            score,
            mutations,
            construction_time: self.construction_time.as_secs_f64(),
            sample_time: sample_time.as_secs_f64(),
            sequence: design.sequence().unwrap_or_default().to_string(),
            design_columns: design.csv_fields(),
            design_line: design.write_out(score),
            properties: properties.clone(),
        };
        self.sink.record(&record)
    }
}
