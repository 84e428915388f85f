//! ReshapeHierarchyHandler - Command handler for renaming and resizing levels.

use std::sync::Arc;
use tracing::info;

use super::{load_hierarchy, EngineSettings};
use crate::domain::ahp::{Hierarchy, HierarchyOutline};
use crate::domain::foundation::{DomainError, HierarchyId};
use crate::ports::SnapshotStore;

/// A structural edit of the hierarchy.
///
/// Renames keep every judgment. Resizing a level resets the judgments whose
/// dimension changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReshapeOperation {
    RenameGoal { name: String },
    RenameCriterion { index: usize, name: String },
    RenameAlternative { index: usize, name: String },
    ResizeCriteria { count: usize },
    ResizeAlternatives { count: usize },
}

/// Command to apply one structural edit.
#[derive(Debug, Clone)]
pub struct ReshapeHierarchyCommand {
    pub hierarchy_id: HierarchyId,
    pub operation: ReshapeOperation,
}

/// Result of a successful reshape.
#[derive(Debug, Clone)]
pub struct ReshapeHierarchyResult {
    pub hierarchy: Hierarchy,
    /// Updated structure for the diagram.
    pub outline: HierarchyOutline,
}

/// Handler for structural edits.
pub struct ReshapeHierarchyHandler {
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
}

impl ReshapeHierarchyHandler {
    pub fn new(store: Arc<dyn SnapshotStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub async fn handle(
        &self,
        cmd: ReshapeHierarchyCommand,
    ) -> Result<ReshapeHierarchyResult, DomainError> {
        let mut hierarchy =
            load_hierarchy(self.store.as_ref(), cmd.hierarchy_id, self.settings.precision).await?;

        match cmd.operation {
            ReshapeOperation::RenameGoal { name } => hierarchy.rename_goal(name)?,
            ReshapeOperation::RenameCriterion { index, name } => {
                hierarchy.rename_criterion(index, name)?
            }
            ReshapeOperation::RenameAlternative { index, name } => {
                hierarchy.rename_alternative(index, name)?
            }
            ReshapeOperation::ResizeCriteria { count } => hierarchy.resize_criteria(count)?,
            ReshapeOperation::ResizeAlternatives { count } => hierarchy.resize_alternatives(count)?,
        }

        self.store.save(cmd.hierarchy_id, &hierarchy.to_snapshot()).await?;

        info!(
            hierarchy_id = %cmd.hierarchy_id,
            criteria = hierarchy.criteria().len(),
            alternatives = hierarchy.alternatives().len(),
            "Hierarchy reshaped"
        );

        let outline = hierarchy.outline();
        Ok(ReshapeHierarchyResult { hierarchy, outline })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySnapshotStore;
    use crate::domain::foundation::ErrorCode;

    async fn seeded() -> (ReshapeHierarchyHandler, Arc<InMemorySnapshotStore>, HierarchyId) {
        let store = Arc::new(InMemorySnapshotStore::new());
        let id = HierarchyId::new();
        let mut hierarchy = Hierarchy::new("Goal", 2, 2).unwrap();
        hierarchy
            .set_criteria_judgments(&[vec![None, Some(3.0)], vec![None, None]])
            .unwrap();
        hierarchy
            .set_alternative_judgments(0, &[vec![None, Some(5.0)], vec![None, None]])
            .unwrap();
        store.save(id, &hierarchy.to_snapshot()).await.unwrap();
        let handler = ReshapeHierarchyHandler::new(store.clone(), EngineSettings::default());
        (handler, store, id)
    }

    fn command(id: HierarchyId, operation: ReshapeOperation) -> ReshapeHierarchyCommand {
        ReshapeHierarchyCommand {
            hierarchy_id: id,
            operation,
        }
    }

    #[tokio::test]
    async fn rename_criterion_keeps_judgments() {
        let (handler, store, id) = seeded().await;

        let result = handler
            .handle(command(
                id,
                ReshapeOperation::RenameCriterion {
                    index: 0,
                    name: "Price".to_string(),
                },
            ))
            .await
            .unwrap();

        assert_eq!(result.hierarchy.criterion_names(), vec!["Price", "Criterion 2"]);
        assert_eq!(result.hierarchy.criteria_matrix().get(0, 1), Some(3.0));
        assert_eq!(result.hierarchy.alternative_matrix(0).unwrap().get(0, 1), Some(5.0));

        let stored = store.load(id).await.unwrap();
        assert_eq!(
            stored.snapshot.alternative_matrices["Price"]["Alternative 1"]["Alternative 2"],
            5.0
        );
    }

    #[tokio::test]
    async fn rename_goal_updates_outline() {
        let (handler, _store, id) = seeded().await;

        let result = handler
            .handle(command(
                id,
                ReshapeOperation::RenameGoal {
                    name: "Pick a laptop".to_string(),
                },
            ))
            .await
            .unwrap();

        assert_eq!(result.outline.goal, "Pick a laptop");
        assert_eq!(result.outline.edges.len(), 2 + 2 * 2);
    }

    #[tokio::test]
    async fn resize_criteria_resets_criteria_matrix_only() {
        let (handler, _store, id) = seeded().await;

        let result = handler
            .handle(command(id, ReshapeOperation::ResizeCriteria { count: 3 }))
            .await
            .unwrap();

        let hierarchy = result.hierarchy;
        assert_eq!(hierarchy.criteria().len(), 3);
        assert_eq!(hierarchy.criteria_matrix().get(0, 1), Some(1.0));
        assert_eq!(hierarchy.alternative_matrix(0).unwrap().get(0, 1), Some(5.0));
        assert_eq!(hierarchy.alternative_matrix(2).unwrap().get(0, 1), Some(1.0));
    }

    #[tokio::test]
    async fn resize_alternatives_resets_alternative_matrices() {
        let (handler, _store, id) = seeded().await;

        let result = handler
            .handle(command(id, ReshapeOperation::ResizeAlternatives { count: 3 }))
            .await
            .unwrap();

        let hierarchy = result.hierarchy;
        assert_eq!(hierarchy.alternatives().len(), 3);
        assert_eq!(hierarchy.criteria_matrix().get(0, 1), Some(3.0));
        assert_eq!(hierarchy.alternative_matrix(0).unwrap().size(), 3);
        assert_eq!(hierarchy.alternative_matrix(0).unwrap().get(0, 1), Some(1.0));
    }

    #[tokio::test]
    async fn rejects_duplicate_alternative_name() {
        let (handler, store, id) = seeded().await;

        let err = handler
            .handle(command(
                id,
                ReshapeOperation::RenameAlternative {
                    index: 1,
                    name: "Alternative 1".to_string(),
                },
            ))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DuplicateValue);
        let stored = store.load(id).await.unwrap();
        assert_eq!(stored.snapshot.alternatives, vec!["Alternative 1", "Alternative 2"]);
    }

    #[tokio::test]
    async fn rejects_resize_to_zero() {
        let (handler, _store, id) = seeded().await;

        let err = handler
            .handle(command(id, ReshapeOperation::ResizeCriteria { count: 0 }))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::OutOfRange);
    }
}
