//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands (create, update, reshape) persist the hierarchy after every
//! change; the evaluation query never writes.

pub mod handlers;

pub use handlers::{
    CreateHierarchyCommand, CreateHierarchyHandler, CreateHierarchyResult, EngineSettings,
    EvaluateHierarchyHandler, EvaluateHierarchyQuery, EvaluateHierarchyResult, MatrixTarget,
    ReshapeHierarchyCommand, ReshapeHierarchyHandler, ReshapeHierarchyResult, ReshapeOperation,
    UpdateJudgmentsCommand, UpdateJudgmentsHandler, UpdateJudgmentsResult,
};
