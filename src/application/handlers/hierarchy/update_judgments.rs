//! UpdateJudgmentsHandler - Command handler for replacing a matrix's judgments.

use std::sync::Arc;
use tracing::{debug, warn};

use super::{load_hierarchy, EngineSettings};
use crate::domain::ahp::{ComparisonMatrix, JudgmentWarning, MatrixRef};
use crate::domain::foundation::{DomainError, HierarchyId};
use crate::ports::SnapshotStore;

/// Which matrix of the hierarchy a judgment table is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixTarget {
    Criteria,
    /// The alternatives matrix of the criterion at `criterion_index`.
    Alternatives { criterion_index: usize },
}

/// Command to replace the judgments of one matrix.
///
/// Only the upper triangle of `judgments` is read; missing cells become 1.0.
#[derive(Debug, Clone)]
pub struct UpdateJudgmentsCommand {
    pub hierarchy_id: HierarchyId,
    pub target: MatrixTarget,
    pub judgments: Vec<Vec<Option<f64>>>,
}

/// Result of a successful update: the enforced matrix and its scale warnings.
#[derive(Debug, Clone)]
pub struct UpdateJudgmentsResult {
    pub matrix: ComparisonMatrix,
    pub warnings: Vec<JudgmentWarning>,
}

/// Handler for judgment edits.
pub struct UpdateJudgmentsHandler {
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
}

impl UpdateJudgmentsHandler {
    pub fn new(store: Arc<dyn SnapshotStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    pub async fn handle(
        &self,
        cmd: UpdateJudgmentsCommand,
    ) -> Result<UpdateJudgmentsResult, DomainError> {
        let mut hierarchy =
            load_hierarchy(self.store.as_ref(), cmd.hierarchy_id, self.settings.precision).await?;

        let (matrix_ref, matrix) = match cmd.target {
            MatrixTarget::Criteria => {
                let matrix = hierarchy.set_criteria_judgments(&cmd.judgments)?.clone();
                (MatrixRef::Criteria, matrix)
            }
            MatrixTarget::Alternatives { criterion_index } => {
                let matrix = hierarchy
                    .set_alternative_judgments(criterion_index, &cmd.judgments)?
                    .clone();
                let criterion = hierarchy.criteria()[criterion_index].name.clone();
                (MatrixRef::alternatives(criterion), matrix)
            }
        };

        let warnings: Vec<JudgmentWarning> = matrix
            .scale_violations(hierarchy.precision())
            .into_iter()
            .map(|v| JudgmentWarning::ScaleViolation {
                matrix: matrix_ref.clone(),
                row: v.row,
                column: v.column,
                value: v.value,
            })
            .collect();
        for warning in &warnings {
            warn!(hierarchy_id = %cmd.hierarchy_id, "{}", warning);
        }

        self.store.save(cmd.hierarchy_id, &hierarchy.to_snapshot()).await?;

        debug!(hierarchy_id = %cmd.hierarchy_id, matrix = %matrix_ref, "Judgments updated");
        Ok(UpdateJudgmentsResult { matrix, warnings })
    }
}
