#![deny(missing_docs)]

//! Measurement-schedule driven hill climbing over a dependency graph.

/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Multi-run driver emitting checkpoint records.
pub mod driver;
/// Session report serialization helpers.
pub mod manifest;
/// Greedy single-mutation optimizer.
pub mod optimizer;
/// Checkpoint records and their writers.
pub mod records;
/// Mutation modes and dispatch to the graph's resampling strategies.
pub mod sampler;
/// Logarithmic measurement schedule.
pub mod schedule;

pub use config::{OutputFormat, RunConfig, SeedPolicy};
pub use driver::{RunDriver, RunSummary};
pub use manifest::RunReport;
pub use optimizer::{
    fixed_optimization, initialise_design, NoProgress, OptimizationOutcome, OptimizationParams,
    ProgressSink, StepProgress,
};
pub use records::{
    CheckpointRecord, CollectingSink, CsvRecordWriter, HumanRecordWriter, RecordSink,
    RECORD_COLUMNS,
};
pub use sampler::{sample_sequence, MutationReport, SampleMode};
pub use schedule::{measurement_points, measurement_schedule};
