use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use msd_core::errors::{DesignError, ErrorInfo};
use msd_core::{SequenceConstraint, Structure};
use tracing::{debug, warn};

use crate::graph::ConstraintGraph;

/// Graph together with the wall-clock time its construction took.
#[derive(Debug)]
pub struct Constructed {
    /// The constructed dependency graph.
    pub graph: ConstraintGraph,
    /// Elapsed construction time.
    pub elapsed: Duration,
}

/// Builds a [`ConstraintGraph`], giving up once `timeout` has passed.
///
/// Construction runs on a worker thread. When the deadline passes the worker
/// is left to finish in the background and its result is dropped. `None`
/// means no deadline.
pub fn build_with_timeout(
    structures: &[Structure],
    constraint: &SequenceConstraint,
    timeout: Option<Duration>,
) -> Result<Constructed, DesignError> {
    let start = Instant::now();
    let Some(limit) = timeout else {
        let graph = ConstraintGraph::new(structures, constraint)?;
        return Ok(Constructed {
            graph,
            elapsed: start.elapsed(),
        });
    };

    let (sender, receiver) = mpsc::channel();
    let structures = structures.to_vec();
    let constraint = constraint.clone();
    thread::Builder::new()
        .name("graph-construction".into())
        .spawn(move || {
            let result = ConstraintGraph::new(&structures, &constraint);
            // The receiver is gone when the deadline already passed.
            let _ = sender.send(result);
        })
        .map_err(|err| {
            DesignError::Graph(ErrorInfo::new("construction-spawn", err.to_string()))
        })?;

    match receiver.recv_timeout(limit) {
        Ok(result) => {
            let graph = result?;
            let elapsed = start.elapsed();
            debug!(elapsed_ms = elapsed.as_millis() as u64, "construction finished within deadline");
            Ok(Constructed { graph, elapsed })
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(limit_secs = limit.as_secs_f64(), "graph construction timed out");
            Err(DesignError::Timeout(
                ErrorInfo::new("construction-timeout", "graph construction exceeded its deadline")
                    .with_context("limit_secs", limit.as_secs_f64().to_string()),
            ))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(DesignError::Graph(ErrorInfo::new(
            "construction-aborted",
            "construction worker exited without a result",
        ))),
    }
}
