//! Hierarchy - goal, criteria, alternatives and their comparison matrices.
//!
//! The hierarchy owns one criteria matrix and one alternatives matrix per
//! criterion, all sharing the same alternative ordering. Matrices are only
//! replaced through the [`SymmetryEnforcer`]; a level's matrices are reset to
//! neutral whenever that level's size changes, but never on a rename.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{
    AhpError, ComparisonMatrix, ConsistencyAnalyzer, ConsistencyReport, ConsistencyVerdict,
    GlobalPriorities, HierarchyAggregator, JudgmentWarning, MatrixRef, Precision,
    PriorityVector, SymmetryEnforcer, WeightCalculator,
};
use crate::domain::foundation::ValidationError;

/// Goal name used when none is given.
pub const DEFAULT_GOAL_NAME: &str = "Main goal";

/// Default display name of the criterion at zero-based `index`.
pub fn default_criterion_name(index: usize) -> String {
    format!("Criterion {}", index + 1)
}

/// Default display name of the alternative at zero-based `index`.
pub fn default_alternative_name(index: usize) -> String {
    format!("Alternative {}", index + 1)
}

/// A criterion: a named leaf under the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
}

/// An alternative: a named leaf under every criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
}

/// Weights and consistency of one comparison matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixAssessment {
    pub matrix: MatrixRef,
    pub weights: PriorityVector,
    /// None when the consistency computation failed; CR is then unknown.
    pub consistency: Option<ConsistencyReport>,
    pub verdict: Option<ConsistencyVerdict>,
}

/// Everything computed from a hierarchy's judgments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyEvaluation {
    pub goal: String,
    pub criteria: MatrixAssessment,
    /// One assessment per criterion, in criteria order.
    pub alternatives: Vec<MatrixAssessment>,
    pub global: GlobalPriorities,
    pub warnings: Vec<JudgmentWarning>,
}

impl HierarchyEvaluation {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A node of the hierarchy diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum OutlineNode {
    Goal(String),
    Criterion(String),
    Alternative(String),
}

/// Structural view of the hierarchy for diagram rendering.
///
/// Carries no numeric data: every criterion hangs off the goal and every
/// alternative hangs off every criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyOutline {
    pub goal: String,
    pub criteria: Vec<String>,
    pub alternatives: Vec<String>,
    pub edges: Vec<(OutlineNode, OutlineNode)>,
}

/// A three-level AHP decision hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    goal: String,
    criteria: Vec<Criterion>,
    alternatives: Vec<Alternative>,
    criteria_matrix: ComparisonMatrix,
    alternative_matrices: Vec<ComparisonMatrix>,
    enforcer: SymmetryEnforcer,
}

impl Hierarchy {
    /// Creates a hierarchy with default names and neutral judgments.
    ///
    /// # Errors
    /// - `EmptyField` if the goal is blank
    /// - `OutOfRange` if either count is zero
    pub fn new(
        goal: impl Into<String>,
        criteria_count: usize,
        alternative_count: usize,
    ) -> Result<Self, ValidationError> {
        let goal = validate_name("goal", goal.into())?;
        validate_count("criteria_count", criteria_count)?;
        validate_count("alternative_count", alternative_count)?;

        Ok(Self {
            goal,
            criteria: (0..criteria_count)
                .map(|i| Criterion { name: default_criterion_name(i) })
                .collect(),
            alternatives: (0..alternative_count)
                .map(|j| Alternative { name: default_alternative_name(j) })
                .collect(),
            criteria_matrix: ComparisonMatrix::neutral(criteria_count),
            alternative_matrices: vec![
                ComparisonMatrix::neutral(alternative_count);
                criteria_count
            ],
            enforcer: SymmetryEnforcer::default(),
        })
    }

    /// Assembles a hierarchy from named parts, enforcing every matrix.
    ///
    /// `alternative_matrices[c]` belongs to `criteria[c]`.
    pub(crate) fn from_parts(
        goal: String,
        criteria: Vec<String>,
        alternatives: Vec<String>,
        criteria_table: &[Vec<Option<f64>>],
        alternative_tables: &[Vec<Vec<Option<f64>>>],
        precision: Precision,
    ) -> Result<Self, ValidationError> {
        let goal = validate_name("goal", goal)?;
        let criteria = validate_names("criterion_name", criteria)?;
        let alternatives = validate_names("alternative_name", alternatives)?;
        let enforcer = SymmetryEnforcer::new(precision);

        Ok(Self {
            goal,
            criteria_matrix: enforcer.enforce_table(criteria_table),
            alternative_matrices: alternative_tables
                .iter()
                .map(|table| enforcer.enforce_table(table))
                .collect(),
            criteria: criteria.into_iter().map(|name| Criterion { name }).collect(),
            alternatives: alternatives.into_iter().map(|name| Alternative { name }).collect(),
            enforcer,
        })
    }

    /// Switches to another rounding precision, re-enforcing every matrix.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.enforcer = SymmetryEnforcer::new(precision);
        self.criteria_matrix = self.enforcer.enforce(&self.criteria_matrix);
        for matrix in &mut self.alternative_matrices {
            *matrix = self.enforcer.enforce(matrix);
        }
        self
    }

    // Accessors

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn criterion_names(&self) -> Vec<String> {
        self.criteria.iter().map(|c| c.name.clone()).collect()
    }

    pub fn alternative_names(&self) -> Vec<String> {
        self.alternatives.iter().map(|a| a.name.clone()).collect()
    }

    pub fn precision(&self) -> Precision {
        self.enforcer.precision()
    }

    pub fn criteria_matrix(&self) -> &ComparisonMatrix {
        &self.criteria_matrix
    }

    /// The alternatives matrix of the criterion at `index`.
    pub fn alternative_matrix(&self, index: usize) -> Option<&ComparisonMatrix> {
        self.alternative_matrices.get(index)
    }

    /// Index of the criterion called `name`.
    pub fn criterion_index(&self, name: &str) -> Option<usize> {
        self.criteria.iter().position(|c| c.name == name)
    }

    // Renames never touch the matrices.

    pub fn rename_goal(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        self.goal = validate_name("goal", name.into())?;
        Ok(())
    }

    pub fn rename_criterion(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let name = validate_name("criterion_name", name.into())?;
        check_index("criterion_index", index, self.criteria.len())?;
        if self
            .criteria
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && c.name == name)
        {
            return Err(ValidationError::duplicate_value("criterion_name", name));
        }
        self.criteria[index].name = name;
        Ok(())
    }

    pub fn rename_alternative(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let name = validate_name("alternative_name", name.into())?;
        check_index("alternative_index", index, self.alternatives.len())?;
        if self
            .alternatives
            .iter()
            .enumerate()
            .any(|(j, a)| j != index && a.name == name)
        {
            return Err(ValidationError::duplicate_value("alternative_name", name));
        }
        self.alternatives[index].name = name;
        Ok(())
    }

    // Resizing invalidates the judgments of the level whose size changed.

    /// Changes the number of criteria.
    ///
    /// The criteria matrix is reset to neutral. Surviving criteria keep their
    /// names and alternatives matrices, since those did not change size.
    pub fn resize_criteria(&mut self, count: usize) -> Result<(), ValidationError> {
        validate_count("criteria_count", count)?;
        if count == self.criteria.len() {
            return Ok(());
        }

        let alternative_count = self.alternatives.len();
        let mut next_index = self.criteria.len();
        self.criteria.truncate(count);
        while self.criteria.len() < count {
            let name = self.unused_name(&mut next_index, default_criterion_name, |h, n| {
                h.criteria.iter().any(|c| c.name == n)
            });
            self.criteria.push(Criterion { name });
        }
        self.alternative_matrices
            .resize(count, ComparisonMatrix::neutral(alternative_count));
        self.criteria_matrix = ComparisonMatrix::neutral(count);

        debug!(criteria = count, "Criteria level resized, criteria judgments reset");
        Ok(())
    }

    /// Changes the number of alternatives.
    ///
    /// Every alternatives matrix is reset to neutral.
    pub fn resize_alternatives(&mut self, count: usize) -> Result<(), ValidationError> {
        validate_count("alternative_count", count)?;
        if count == self.alternatives.len() {
            return Ok(());
        }

        let mut next_index = self.alternatives.len();
        self.alternatives.truncate(count);
        while self.alternatives.len() < count {
            let name = self.unused_name(&mut next_index, default_alternative_name, |h, n| {
                h.alternatives.iter().any(|a| a.name == n)
            });
            self.alternatives.push(Alternative { name });
        }
        for matrix in &mut self.alternative_matrices {
            *matrix = ComparisonMatrix::neutral(count);
        }

        debug!(alternatives = count, "Alternative level resized, alternative judgments reset");
        Ok(())
    }

    /// Next default name not already taken at the level.
    fn unused_name(
        &self,
        next_index: &mut usize,
        default_name: fn(usize) -> String,
        taken: impl Fn(&Self, &str) -> bool,
    ) -> String {
        loop {
            let name = default_name(*next_index);
            *next_index += 1;
            if !taken(self, &name) {
                return name;
            }
        }
    }

    // Judgment edits go through the enforcer.

    /// Replaces the criteria judgments. Returns the enforced matrix.
    ///
    /// # Errors
    /// `CriteriaDimensionMismatch` when the table's row count differs from
    /// the number of criteria.
    pub fn set_criteria_judgments(
        &mut self,
        table: &[Vec<Option<f64>>],
    ) -> Result<&ComparisonMatrix, AhpError> {
        if table.len() != self.criteria.len() {
            return Err(AhpError::CriteriaDimensionMismatch {
                expected: self.criteria.len(),
                actual: table.len(),
            });
        }
        self.criteria_matrix = self.enforcer.enforce_table(table);
        Ok(&self.criteria_matrix)
    }

    /// Replaces the alternatives judgments under the criterion at `index`.
    ///
    /// # Errors
    /// - `MissingAlternativeMatrix` when `index` names no criterion
    /// - `DimensionMismatch` when the row count differs from the number of
    ///   alternatives
    pub fn set_alternative_judgments(
        &mut self,
        index: usize,
        table: &[Vec<Option<f64>>],
    ) -> Result<&ComparisonMatrix, AhpError> {
        let criterion = self
            .criteria
            .get(index)
            .map(|c| c.name.clone())
            .ok_or_else(|| AhpError::MissingAlternativeMatrix {
                criterion: format!("#{}", index + 1),
            })?;
        if table.len() != self.alternatives.len() {
            return Err(AhpError::DimensionMismatch {
                criterion,
                expected: self.alternatives.len(),
                actual: table.len(),
            });
        }
        self.alternative_matrices[index] = self.enforcer.enforce_table(table);
        Ok(&self.alternative_matrices[index])
    }

    /// Scale warnings for every matrix of the hierarchy.
    pub fn scale_warnings(&self) -> Vec<JudgmentWarning> {
        self.matrices()
            .flat_map(|(matrix_ref, matrix)| {
                matrix
                    .scale_violations(self.precision())
                    .into_iter()
                    .map(move |v| JudgmentWarning::ScaleViolation {
                        matrix: matrix_ref.clone(),
                        row: v.row,
                        column: v.column,
                        value: v.value,
                    })
            })
            .collect()
    }

    /// Computes weights, consistency and the global ranking.
    ///
    /// Inconsistent or off-scale judgments are reported as warnings and never
    /// block the computation. Fatal errors name the matrix they came from.
    pub fn evaluate(&self, consistency_threshold: f64) -> Result<HierarchyEvaluation, AhpError> {
        let mut warnings = self.scale_warnings();

        let criteria = assess(
            MatrixRef::Criteria,
            &self.criteria_matrix,
            consistency_threshold,
            &mut warnings,
        )?;
        let alternatives = self
            .criteria
            .iter()
            .zip(&self.alternative_matrices)
            .map(|(criterion, matrix)| {
                assess(
                    MatrixRef::alternatives(criterion.name.as_str()),
                    matrix,
                    consistency_threshold,
                    &mut warnings,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let local: Vec<PriorityVector> = alternatives.iter().map(|a| a.weights.clone()).collect();
        let global = HierarchyAggregator::compose(
            &self.criterion_names(),
            &self.alternative_names(),
            &criteria.weights,
            &local,
        )?;

        for warning in &warnings {
            warn!(goal = %self.goal, "{}", warning);
        }

        Ok(HierarchyEvaluation {
            goal: self.goal.clone(),
            criteria,
            alternatives,
            global,
            warnings,
        })
    }

    /// Structural view for diagram rendering.
    pub fn outline(&self) -> HierarchyOutline {
        let goal = OutlineNode::Goal(self.goal.clone());
        let mut edges = Vec::with_capacity(self.criteria.len() * (1 + self.alternatives.len()));
        for criterion in &self.criteria {
            edges.push((goal.clone(), OutlineNode::Criterion(criterion.name.clone())));
        }
        for criterion in &self.criteria {
            for alternative in &self.alternatives {
                edges.push((
                    OutlineNode::Criterion(criterion.name.clone()),
                    OutlineNode::Alternative(alternative.name.clone()),
                ));
            }
        }

        HierarchyOutline {
            goal: self.goal.clone(),
            criteria: self.criterion_names(),
            alternatives: self.alternative_names(),
            edges,
        }
    }

    /// Every matrix with its reference, criteria first.
    fn matrices(&self) -> impl Iterator<Item = (MatrixRef, &ComparisonMatrix)> {
        std::iter::once((MatrixRef::Criteria, &self.criteria_matrix)).chain(
            self.criteria
                .iter()
                .zip(&self.alternative_matrices)
                .map(|(c, m)| (MatrixRef::alternatives(c.name.as_str()), m)),
        )
    }
}

/// Weights plus consistency for one matrix. Weight errors are fatal;
/// consistency errors become a `ConsistencyUnknown` warning.
fn assess(
    matrix_ref: MatrixRef,
    matrix: &ComparisonMatrix,
    threshold: f64,
    warnings: &mut Vec<JudgmentWarning>,
) -> Result<MatrixAssessment, AhpError> {
    let weights =
        WeightCalculator::weights(matrix).map_err(|e| e.in_matrix(matrix_ref.clone()))?;

    let consistency = match ConsistencyAnalyzer::analyze(matrix) {
        Ok(report) => Some(report),
        Err(err) => {
            warnings.push(JudgmentWarning::ConsistencyUnknown {
                matrix: matrix_ref.clone(),
                reason: err.to_string(),
            });
            None
        }
    };

    let verdict = consistency.map(|report| report.verdict(threshold));
    if let (Some(report), Some(ConsistencyVerdict::Inconsistent)) = (&consistency, verdict) {
        warnings.push(JudgmentWarning::InconsistentJudgments {
            matrix: matrix_ref.clone(),
            consistency_ratio: report.consistency_ratio,
            threshold,
        });
    }

    Ok(MatrixAssessment {
        matrix: matrix_ref,
        weights,
        consistency,
        verdict,
    })
}

fn validate_name(field: &str, name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

fn validate_names(field: &str, names: Vec<String>) -> Result<Vec<String>, ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::out_of_range(field, 1, i64::MAX, 0));
    }
    let mut validated: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = validate_name(field, name)?;
        if validated.contains(&name) {
            return Err(ValidationError::duplicate_value(field, name));
        }
        validated.push(name);
    }
    Ok(validated)
}

fn validate_count(field: &str, count: usize) -> Result<(), ValidationError> {
    if count == 0 {
        return Err(ValidationError::out_of_range(field, 1, i64::MAX, 0));
    }
    Ok(())
}

fn check_index(field: &str, index: usize, len: usize) -> Result<(), ValidationError> {
    if index >= len {
        return Err(ValidationError::out_of_range(
            field,
            0,
            len as i64 - 1,
            index as i64,
        ));
    }
    Ok(())
}
