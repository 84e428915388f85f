//! AHP Module - the pairwise-comparison matrix engine.
//!
//! Turns subjective pairwise judgments into reciprocal comparison matrices,
//! priority vectors, consistency diagnostics and a global ranking of
//! alternatives.
//!
//! # Components
//!
//! - `ComparisonMatrix` - Reciprocal judgment matrix for one level
//! - `SymmetryEnforcer` - Restores reciprocity; upper triangle is authoritative
//! - `WeightCalculator` - Column-normalization priority vectors
//! - `ConsistencyAnalyzer` - lambda_max, CI, RI and CR
//! - `HierarchyAggregator` - Additive composition into global priorities
//! - `Hierarchy` - Goal, criteria, alternatives and their matrices
//!
//! # Design Philosophy
//!
//! The analyzers are pure and stateless: matrices go in, results come out.
//! The host owns storage and lifecycle; nothing here blocks or does I/O.

mod comparison_matrix;
mod consistency_analyzer;
mod errors;
mod hierarchy;
mod hierarchy_aggregator;
mod snapshot;
mod symmetry_enforcer;
mod weight_calculator;

pub use comparison_matrix::{
    is_on_saaty_scale, ComparisonMatrix, ScaleViolation, SAATY_SCALE_MAX, SAATY_SCALE_MIN,
};
pub use consistency_analyzer::{
    random_index, ConsistencyAnalyzer, ConsistencyReport, ConsistencyVerdict,
    CONSISTENCY_THRESHOLD, RANDOM_INDEX,
};
pub use errors::{AhpError, AhpErrorKind, JudgmentWarning, MatrixRef};
pub use hierarchy::{
    default_alternative_name, default_criterion_name, Alternative, Criterion, Hierarchy,
    HierarchyEvaluation, HierarchyOutline, MatrixAssessment, OutlineNode, DEFAULT_GOAL_NAME,
};
pub use hierarchy_aggregator::{GlobalPriorities, GlobalPriorityRow, HierarchyAggregator};
pub use snapshot::{HierarchySnapshot, NamedMatrix};
pub use symmetry_enforcer::{Precision, SymmetryEnforcer};
pub use weight_calculator::{PriorityVector, WeightCalculator, WEIGHT_SUM_TOLERANCE};
