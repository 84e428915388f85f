//! CreateHierarchyHandler - Command handler for starting a new decision hierarchy.

use std::sync::Arc;
use tracing::info;

use super::EngineSettings;
use crate::domain::ahp::Hierarchy;
use crate::domain::foundation::{DomainError, HierarchyId, ValidationError};
use crate::ports::{SnapshotStore, StoredSnapshotInfo};

/// Command to create a hierarchy with neutral judgments.
///
/// Names are applied positionally; levels without enough names keep the
/// default "Criterion i" / "Alternative j" names.
#[derive(Debug, Clone)]
pub struct CreateHierarchyCommand {
    pub goal: String,
    pub criteria_count: usize,
    pub alternative_count: usize,
    pub criterion_names: Vec<String>,
    pub alternative_names: Vec<String>,
}

impl CreateHierarchyCommand {
    /// A hierarchy with default names for every criterion and alternative.
    pub fn with_counts(
        goal: impl Into<String>,
        criteria_count: usize,
        alternative_count: usize,
    ) -> Self {
        Self {
            goal: goal.into(),
            criteria_count,
            alternative_count,
            criterion_names: Vec::new(),
            alternative_names: Vec::new(),
        }
    }
}

/// Result of successful hierarchy creation.
#[derive(Debug, Clone)]
pub struct CreateHierarchyResult {
    pub id: HierarchyId,
    pub hierarchy: Hierarchy,
    pub info: StoredSnapshotInfo,
}

/// Handler for creating hierarchies.
pub struct CreateHierarchyHandler {
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
}

impl CreateHierarchyHandler {
    pub fn new(store: Arc<dyn SnapshotStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub async fn handle(
        &self,
        cmd: CreateHierarchyCommand,
    ) -> Result<CreateHierarchyResult, DomainError> {
        // 1. Build with default names
        let mut hierarchy = Hierarchy::new(cmd.goal, cmd.criteria_count, cmd.alternative_count)?
            .with_precision(self.settings.precision);

        // 2. Apply the given names
        check_name_count("criterion_names", cmd.criterion_names.len(), cmd.criteria_count)?;
        check_name_count("alternative_names", cmd.alternative_names.len(), cmd.alternative_count)?;
        for (index, name) in cmd.criterion_names.into_iter().enumerate() {
            hierarchy.rename_criterion(index, name)?;
        }
        for (index, name) in cmd.alternative_names.into_iter().enumerate() {
            hierarchy.rename_alternative(index, name)?;
        }

        // 3. Persist
        let id = HierarchyId::new();
        let info = self.store.save(id, &hierarchy.to_snapshot()).await?;

        info!(
            hierarchy_id = %id,
            criteria = hierarchy.criteria().len(),
            alternatives = hierarchy.alternatives().len(),
            "Hierarchy created"
        );

        Ok(CreateHierarchyResult { id, hierarchy, info })
    }
}

fn check_name_count(field: &str, given: usize, count: usize) -> Result<(), ValidationError> {
    if given > count {
        return Err(ValidationError::out_of_range(field, 0, count as i64, given as i64));
    }
    Ok(())
}
