//! Hierarchy Aggregator - composes local priorities into global ones.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{AhpError, ComparisonMatrix, MatrixRef, PriorityVector, WeightCalculator};

/// Totals closer than this are ranked as ties (original order wins).
const RANKING_RESOLUTION: f64 = 1e-9;

/// One row of the global priority table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalPriorityRow {
    /// Alternative name.
    pub alternative: String,
    /// Position of the alternative in the hierarchy's ordering.
    pub position: usize,
    /// `w_alt[c][a] * w_crit[c]` for each criterion `c`, in criteria order.
    pub contributions: Vec<f64>,
    /// Sum of contributions.
    pub total: f64,
}

/// Global priority table: alternatives x (criteria + total), best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalPriorities {
    pub criteria: Vec<String>,
    pub rows: Vec<GlobalPriorityRow>,
}

impl GlobalPriorities {
    /// The best ranked alternative.
    pub fn best(&self) -> Option<&GlobalPriorityRow> {
        self.rows.first()
    }

    /// Looks up an alternative's row by name.
    pub fn row(&self, alternative: &str) -> Option<&GlobalPriorityRow> {
        self.rows.iter().find(|r| r.alternative == alternative)
    }

    /// Alternative names in ranked order.
    pub fn ranking(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.alternative.as_str()).collect()
    }
}

/// Additive hierarchical composition.
pub struct HierarchyAggregator;

impl HierarchyAggregator {
    /// Aggregates a criteria matrix and one alternatives matrix per criterion,
    /// looked up by criterion name.
    ///
    /// # Errors
    /// - `CriteriaDimensionMismatch` when the criteria matrix size differs
    ///   from the number of criteria
    /// - `MissingAlternativeMatrix` when a criterion has no matrix
    /// - `DimensionMismatch` when a matrix size differs from the number of
    ///   alternatives
    /// - any weight error, attributed to the matrix that raised it
    pub fn aggregate(
        criteria: &[String],
        alternatives: &[String],
        criteria_matrix: &ComparisonMatrix,
        alternative_matrices: &HashMap<String, ComparisonMatrix>,
    ) -> Result<GlobalPriorities, AhpError> {
        let ordered = criteria
            .iter()
            .map(|criterion| {
                alternative_matrices
                    .get(criterion)
                    .ok_or_else(|| AhpError::MissingAlternativeMatrix {
                        criterion: criterion.clone(),
                    })
            })
            .collect::<Result<Vec<&ComparisonMatrix>, AhpError>>()?;

        Self::aggregate_ordered(criteria, alternatives, criteria_matrix, &ordered)
    }

    /// Aggregates with alternatives matrices given in criteria order.
    pub fn aggregate_ordered(
        criteria: &[String],
        alternatives: &[String],
        criteria_matrix: &ComparisonMatrix,
        alternative_matrices: &[&ComparisonMatrix],
    ) -> Result<GlobalPriorities, AhpError> {
        if criteria_matrix.size() != criteria.len() {
            return Err(AhpError::CriteriaDimensionMismatch {
                expected: criteria.len(),
                actual: criteria_matrix.size(),
            });
        }
        if let Some(criterion) = criteria.get(alternative_matrices.len()) {
            return Err(AhpError::MissingAlternativeMatrix {
                criterion: criterion.clone(),
            });
        }
        for (criterion, matrix) in criteria.iter().zip(alternative_matrices) {
            if matrix.size() != alternatives.len() {
                return Err(AhpError::DimensionMismatch {
                    criterion: criterion.clone(),
                    expected: alternatives.len(),
                    actual: matrix.size(),
                });
            }
        }

        let criteria_weights = WeightCalculator::weights(criteria_matrix)
            .map_err(|e| e.in_matrix(MatrixRef::Criteria))?;
        let alternative_weights = criteria
            .iter()
            .zip(alternative_matrices)
            .map(|(criterion, matrix)| {
                WeightCalculator::weights(matrix)
                    .map_err(|e| e.in_matrix(MatrixRef::alternatives(criterion.as_str())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::compose(criteria, alternatives, &criteria_weights, &alternative_weights)
    }

    /// Composes precomputed local priorities.
    ///
    /// Global priority of alternative `a` = sum over criteria `c` of
    /// `w_alt[c][a] * w_crit[c]`. No renormalization: with normalized inputs
    /// the totals already sum to 1. Rows are sorted by total, descending, with
    /// a stable sort so ties keep the original alternative order.
    pub fn compose(
        criteria: &[String],
        alternatives: &[String],
        criteria_weights: &PriorityVector,
        alternative_weights: &[PriorityVector],
    ) -> Result<GlobalPriorities, AhpError> {
        if criteria_weights.len() != criteria.len() {
            return Err(AhpError::CriteriaDimensionMismatch {
                expected: criteria.len(),
                actual: criteria_weights.len(),
            });
        }
        if let Some(criterion) = criteria.get(alternative_weights.len()) {
            return Err(AhpError::MissingAlternativeMatrix {
                criterion: criterion.clone(),
            });
        }
        for (criterion, weights) in criteria.iter().zip(alternative_weights) {
            if weights.len() != alternatives.len() {
                return Err(AhpError::DimensionMismatch {
                    criterion: criterion.clone(),
                    expected: alternatives.len(),
                    actual: weights.len(),
                });
            }
        }

        let mut rows: Vec<GlobalPriorityRow> = alternatives
            .iter()
            .enumerate()
            .map(|(position, alternative)| {
                let contributions: Vec<f64> = criteria_weights
                    .iter()
                    .zip(alternative_weights)
                    .map(|(criterion_weight, local)| local[position] * criterion_weight)
                    .collect();
                GlobalPriorityRow {
                    alternative: alternative.clone(),
                    position,
                    total: contributions.iter().sum(),
                    contributions,
                }
            })
            .collect();

        rows.sort_by_key(|row| std::cmp::Reverse(ranking_key(row.total)));

        Ok(GlobalPriorities {
            criteria: criteria.to_vec(),
            rows,
        })
    }
}

/// Quantizes a total so float noise cannot reorder tied alternatives.
fn ranking_key(total: f64) -> i64 {
    (total / RANKING_RESOLUTION).round() as i64
}
