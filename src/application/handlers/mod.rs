//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod hierarchy;

pub use hierarchy::{
    // Commands and queries
    CreateHierarchyCommand, EvaluateHierarchyQuery, ReshapeHierarchyCommand,
    UpdateJudgmentsCommand,
    // Handlers
    CreateHierarchyHandler, EvaluateHierarchyHandler, ReshapeHierarchyHandler,
    UpdateJudgmentsHandler,
    // Results
    CreateHierarchyResult, EvaluateHierarchyResult, ReshapeHierarchyResult,
    UpdateJudgmentsResult,
    // Types
    EngineSettings, MatrixTarget, ReshapeOperation,
};
