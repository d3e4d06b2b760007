#![deny(missing_docs)]

//! Dependency graph over sequence positions: construction from target
//! structures, exact solution counting, uniform sampling, incremental
//! resampling with a revert history, and GraphML export.

mod construct;
mod counting;
mod graph;
mod graphml;
mod properties;

pub use construct::{build_with_timeout, Constructed};
pub use graph::{ConstraintGraph, DependencyGraph, Resample, ResampleStrategy};
pub use graphml::{to_graphml, write_graphml};
pub use properties::GraphProperties;
