//! EvaluateHierarchyHandler - Query handler computing weights, consistency and ranking.

use std::sync::Arc;
use tracing::{debug, info};

use super::{load_hierarchy, EngineSettings};
use crate::domain::ahp::{Hierarchy, HierarchyEvaluation, HierarchySnapshot};
use crate::domain::foundation::{DomainError, HierarchyId};
use crate::ports::SnapshotStore;

/// Query to evaluate a stored hierarchy.
#[derive(Debug, Clone)]
pub struct EvaluateHierarchyQuery {
    pub hierarchy_id: HierarchyId,
}

/// Result of an evaluation.
#[derive(Debug, Clone)]
pub struct EvaluateHierarchyResult {
    pub hierarchy: Hierarchy,
    pub evaluation: HierarchyEvaluation,
}

/// Handler for evaluating hierarchies. Never writes to the store.
pub struct EvaluateHierarchyHandler {
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
}

impl EvaluateHierarchyHandler {
    pub fn new(store: Arc<dyn SnapshotStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub async fn handle(
        &self,
        query: EvaluateHierarchyQuery,
    ) -> Result<EvaluateHierarchyResult, DomainError> {
        let hierarchy =
            load_hierarchy(self.store.as_ref(), query.hierarchy_id, self.settings.precision).await?;
        debug!(hierarchy_id = %query.hierarchy_id, "Evaluating stored hierarchy");
        self.evaluate(hierarchy)
    }

    /// Evaluates a snapshot that was never stored, e.g. one read from a file.
    pub fn evaluate_snapshot(
        &self,
        snapshot: &HierarchySnapshot,
    ) -> Result<EvaluateHierarchyResult, DomainError> {
        let hierarchy = Hierarchy::from_snapshot(snapshot, self.settings.precision)?;
        self.evaluate(hierarchy)
    }

    fn evaluate(&self, hierarchy: Hierarchy) -> Result<EvaluateHierarchyResult, DomainError> {
        let evaluation = hierarchy.evaluate(self.settings.consistency_threshold)?;

        info!(
            goal = %evaluation.goal,
            best = evaluation.global.best().map(|row| row.alternative.as_str()).unwrap_or(""),
            warnings = evaluation.warnings.len(),
            "Hierarchy evaluated"
        );

        Ok(EvaluateHierarchyResult {
            hierarchy,
            evaluation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemorySnapshotStore;
    use crate::domain::ahp::{JudgmentWarning, MatrixRef};
    use crate::domain::foundation::ErrorCode;

    fn car_hierarchy() -> Hierarchy {
        let mut hierarchy = Hierarchy::new("Choose a car", 2, 3).unwrap();
        hierarchy.rename_criterion(0, "Price").unwrap();
        hierarchy.rename_criterion(1, "Comfort").unwrap();
        hierarchy
            .set_criteria_judgments(&[vec![None, Some(3.0)], vec![None, None]])
            .unwrap();
        hierarchy
            .set_alternative_judgments(
                0,
                &[
                    vec![None, Some(3.0), Some(5.0)],
                    vec![None, None, Some(3.0)],
                    vec![None, None, None],
                ],
            )
            .unwrap();
        hierarchy
            .set_alternative_judgments(
                1,
                &[
                    vec![None, Some(0.2), Some(0.5)],
                    vec![None, None, Some(3.0)],
                    vec![None, None, None],
                ],
            )
            .unwrap();
        hierarchy
    }

    #[tokio::test]
    async fn evaluates_stored_hierarchy() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let id = HierarchyId::new();
        store.save(id, &car_hierarchy().to_snapshot()).await.unwrap();
        let handler = EvaluateHierarchyHandler::new(store, EngineSettings::default());

        let result = handler
            .handle(EvaluateHierarchyQuery { hierarchy_id: id })
            .await
            .unwrap();

        let evaluation = result.evaluation;
        assert_eq!(evaluation.goal, "Choose a car");
        assert!((evaluation.criteria.weights[0] - 0.75).abs() < 1e-3);
        assert_eq!(evaluation.alternatives.len(), 2);
        assert!((evaluation.global.rows.iter().map(|r| r.total).sum::<f64>() - 1.0).abs() < 1e-6);
        assert_eq!(evaluation.global.best().unwrap().alternative, "Alternative 1");
    }

    #[tokio::test]
    async fn evaluation_does_not_write() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let id = HierarchyId::new();
        let saved = store.save(id, &car_hierarchy().to_snapshot()).await.unwrap();
        let handler = EvaluateHierarchyHandler::new(store.clone(), EngineSettings::default());

        handler
            .handle(EvaluateHierarchyQuery { hierarchy_id: id })
            .await
            .unwrap();

        assert_eq!(store.load(id).await.unwrap().saved_at, saved.saved_at);
    }

    #[tokio::test]
    async fn unknown_hierarchy_is_not_found() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let handler = EvaluateHierarchyHandler::new(store, EngineSettings::default());

        let err = handler
            .handle(EvaluateHierarchyQuery {
                hierarchy_id: HierarchyId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::HierarchyNotFound);
    }

    #[test]
    fn evaluates_unstored_snapshot() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let handler = EvaluateHierarchyHandler::new(store, EngineSettings::default());

        let result = handler.evaluate_snapshot(&car_hierarchy().to_snapshot()).unwrap();

        assert_eq!(result.evaluation.global.rows.len(), 3);
    }

    #[test]
    fn inconsistent_judgments_are_warnings_under_strict_threshold() {
        let store = Arc::new(InMemorySnapshotStore::new());
        let settings = EngineSettings {
            consistency_threshold: 0.0001,
            ..EngineSettings::default()
        };
        let handler = EvaluateHierarchyHandler::new(store, settings);

        let result = handler.evaluate_snapshot(&car_hierarchy().to_snapshot()).unwrap();

        assert!(result.evaluation.warnings.iter().any(|w| matches!(
            w,
            JudgmentWarning::InconsistentJudgments { matrix: MatrixRef::Alternatives { .. }, .. }
        )));
    }
}
