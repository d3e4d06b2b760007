#![deny(missing_docs)]

//! Folding engines, the per-run design state and the multi-state objective.

/// Per-run design state and its factory.
pub mod design;
/// Folding engine capability and engine selection.
pub mod engine;
/// Multi-state objective evaluator.
pub mod objective;
/// Layered evaluation for pseudoknotted targets.
pub mod pseudoknot;
/// Nested stacking energy model.
pub mod stacking;

pub use design::{Design, DesignFactory, Evaluation};
pub use engine::{EngineKind, FoldingEngine};
pub use objective::{calculate_objective, MultiStateObjective, Objective, ObjectiveBreakdown};
pub use pseudoknot::PseudoknotModel;
pub use stacking::StackingModel;
