//! Weight Calculator - priority vectors from comparison matrices.

use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::{AhpError, ComparisonMatrix};

/// Tolerance on the sum of a priority vector.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Normalized priorities, one per compared entity, summing to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityVector(Vec<f64>);

impl PriorityVector {
    /// Equal priorities for `n` entities.
    pub fn uniform(n: usize) -> Self {
        let n = n.max(1);
        Self(vec![1.0 / n as f64; n])
    }

    /// Wraps already-normalized weights.
    ///
    /// Used when priorities come from outside the engine. No check is made
    /// here; see [`PriorityVector::is_normalized`].
    pub fn from_weights(weights: Vec<f64>) -> Self {
        Self(weights)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.0.iter()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// True when all weights are non-negative and they sum to 1.
    pub fn is_normalized(&self) -> bool {
        self.0.iter().all(|&w| w >= 0.0) && (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl Index<usize> for PriorityVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Derives priority vectors by column normalization.
///
/// This is the standard AHP approximation of the principal eigenvector, not
/// the exact eigenvector: each column is divided by its sum and the weight of
/// row `i` is the mean of normalized row `i`. O(n^2), which is fine for the
/// handful of entities a comparison level holds.
pub struct WeightCalculator;

impl WeightCalculator {
    /// Computes the priority vector of `matrix`.
    ///
    /// # Errors
    /// - `InvalidMatrix` when a cell is NaN, infinite, or negative
    /// - `DegenerateMatrix` when a column sums to zero
    ///
    /// # Edge Cases
    /// - n = 1: returns `[1.0]`
    pub fn weights(matrix: &ComparisonMatrix) -> Result<PriorityVector, AhpError> {
        let n = matrix.size();

        for (row, values) in matrix.rows().enumerate() {
            for (column, &value) in values.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(AhpError::InvalidMatrix { row, column, value });
                }
            }
        }

        if n == 1 {
            return Ok(PriorityVector(vec![1.0]));
        }

        let column_sums = (0..n)
            .map(|column| {
                let sum = matrix.column_sum(column);
                if sum == 0.0 {
                    Err(AhpError::DegenerateMatrix { column })
                } else {
                    Ok(sum)
                }
            })
            .collect::<Result<Vec<f64>, AhpError>>()?;

        let weights = matrix
            .rows()
            .map(|values| {
                let normalized: f64 = values
                    .iter()
                    .zip(&column_sums)
                    .map(|(value, sum)| value / sum)
                    .sum();
                normalized / n as f64
            })
            .collect();

        Ok(PriorityVector(weights))
    }
}
