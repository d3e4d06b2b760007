use std::fmt;
use std::str::FromStr;

use msd_core::errors::{DesignError, ErrorInfo};
use msd_core::RngHandle;
use msd_fold::Design;
use msd_graph::{DependencyGraph, ResampleStrategy};
use serde::{Deserialize, Serialize};

/// Mutation modes selectable for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMode {
    /// Resample a single position.
    Sample,
    /// Resample a position and its neighbours.
    SampleLocal,
    /// Resample one whole connected component.
    #[default]
    SampleGlobal,
    /// Resample one structural element.
    SampleStrelem,
    /// Pick `Sample`, `SampleGlobal` or `SampleLocal` uniformly on every call.
    Random,
}

/// Modes `Random` chooses from. Structural elements are never drawn.
const RANDOM_POOL: [SampleMode; 3] = [
    SampleMode::Sample,
    SampleMode::SampleGlobal,
    SampleMode::SampleLocal,
];

impl SampleMode {
    /// Every accepted mode, in the order they are listed to users.
    pub const ALL: [SampleMode; 5] = [
        SampleMode::Sample,
        SampleMode::SampleLocal,
        SampleMode::SampleGlobal,
        SampleMode::SampleStrelem,
        SampleMode::Random,
    ];

    /// Name used on the command line and in output records.
    pub fn as_str(self) -> &'static str {
        match self {
            SampleMode::Sample => "sample",
            SampleMode::SampleLocal => "sample_local",
            SampleMode::SampleGlobal => "sample_global",
            SampleMode::SampleStrelem => "sample_strelem",
            SampleMode::Random => "random",
        }
    }

    /// Resolves `Random` to a concrete mode; other modes resolve to themselves.
    pub fn resolve(self, rng: &mut RngHandle) -> SampleMode {
        match self {
            SampleMode::Random => rng
                .index(RANDOM_POOL.len())
                .map_or(SampleMode::Sample, |index| RANDOM_POOL[index]),
            other => other,
        }
    }

    fn strategy(self) -> Option<ResampleStrategy> {
        match self {
            SampleMode::Sample => Some(ResampleStrategy::Single),
            SampleMode::SampleLocal => Some(ResampleStrategy::Local),
            SampleMode::SampleGlobal => Some(ResampleStrategy::Global),
            SampleMode::SampleStrelem => Some(ResampleStrategy::StructuralElement),
            SampleMode::Random => None,
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleMode {
    type Err = DesignError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SampleMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .ok_or_else(|| {
                let names: Vec<&str> = SampleMode::ALL.iter().map(|mode| mode.as_str()).collect();
                DesignError::Sampler(
                    ErrorInfo::new("unknown-mode", "no sampling mode with this name")
                        .with_context("mode", value)
                        .with_hint(format!("use one of {}", names.join(", "))),
                )
            })
    }
}

/// Outcome of one [`sample_sequence`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Concrete mode that was applied.
    pub mode: SampleMode,
    /// Solution estimate of the last resample.
    pub solutions: u128,
    /// Total number of positions changed, i.e. the revert depth.
    pub changed: usize,
}

/// Applies `steps` resamples of `mode` to the graph and copies the new
/// assignment into the design.
pub fn sample_sequence<G>(
    graph: &mut G,
    design: &mut Design,
    mode: SampleMode,
    steps: usize,
    rng: &mut RngHandle,
) -> Result<MutationReport, DesignError>
where
    G: DependencyGraph + ?Sized,
{
    let resolved = mode.resolve(rng);
    let Some(strategy) = resolved.strategy() else {
        return Err(DesignError::Sampler(
            ErrorInfo::new("unresolved-mode", "random mode did not resolve to a strategy")
                .with_context("mode", resolved.as_str()),
        ));
    };
    let mut report = MutationReport {
        mode: resolved,
        solutions: 0,
        changed: 0,
    };
    for _ in 0..steps {
        let resample = graph.resample(strategy, rng)?;
        report.solutions = resample.solutions;
        report.changed += resample.changed;
    }
    design.set_sequence(graph.get_sequence());
    Ok(report)
}
