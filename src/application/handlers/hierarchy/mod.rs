//! Hierarchy command and query handlers.

mod create_hierarchy;
mod evaluate_hierarchy;
mod reshape_hierarchy;
mod update_judgments;

pub use create_hierarchy::{CreateHierarchyCommand, CreateHierarchyHandler, CreateHierarchyResult};
pub use evaluate_hierarchy::{
    EvaluateHierarchyHandler, EvaluateHierarchyQuery, EvaluateHierarchyResult,
};
pub use reshape_hierarchy::{
    ReshapeHierarchyCommand, ReshapeHierarchyHandler, ReshapeHierarchyResult, ReshapeOperation,
};
pub use update_judgments::{
    MatrixTarget, UpdateJudgmentsCommand, UpdateJudgmentsHandler, UpdateJudgmentsResult,
};

use crate::domain::ahp::{Hierarchy, Precision, CONSISTENCY_THRESHOLD};
use crate::domain::foundation::{DomainError, HierarchyId};
use crate::ports::SnapshotStore;

/// Engine parameters shared by every hierarchy handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Decimal places kept by the symmetry enforcer.
    pub precision: Precision,
    /// CR above this value produces an inconsistency warning.
    pub consistency_threshold: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            consistency_threshold: CONSISTENCY_THRESHOLD,
        }
    }
}

/// Loads a stored hierarchy and rebuilds it at the configured precision.
pub(crate) async fn load_hierarchy(
    store: &dyn SnapshotStore,
    id: HierarchyId,
    precision: Precision,
) -> Result<Hierarchy, DomainError> {
    let stored = store.load(id).await?;
    Ok(Hierarchy::from_snapshot(&stored.snapshot, precision)?)
}
