//! Consistency Analyzer - principal eigenvalue, CI, RI and CR.

use nalgebra::linalg::Schur;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AhpError, ComparisonMatrix};

/// Saaty's random consistency index for n = 1..=10.
pub const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];

/// Judgments with CR at or below this value are acceptable.
pub const CONSISTENCY_THRESHOLD: f64 = 0.20;

const SCHUR_MAX_ITERATIONS: usize = 10_000;

/// Returns the random index for a matrix of size `n`.
///
/// Sizes beyond the table reuse the n = 10 value. That is an approximation:
/// the true random index keeps creeping up slowly with n.
pub fn random_index(n: usize) -> f64 {
    match n {
        0 => 0.0,
        n if n <= RANDOM_INDEX.len() => RANDOM_INDEX[n - 1],
        _ => RANDOM_INDEX[RANDOM_INDEX.len() - 1],
    }
}

/// Whether a set of judgments passes the consistency threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyVerdict {
    Acceptable,
    Inconsistent,
}

impl ConsistencyVerdict {
    pub fn label(&self) -> &'static str {
        match self {
            ConsistencyVerdict::Acceptable => "acceptable",
            ConsistencyVerdict::Inconsistent => "inconsistent",
        }
    }
}

/// Consistency diagnostics for one comparison matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Principal eigenvalue (largest real part).
    pub lambda_max: f64,
    /// CI = (lambda_max - n) / (n - 1), never below 0.
    pub consistency_index: f64,
    /// Random index looked up by n.
    pub random_index: f64,
    /// CR = CI / RI.
    pub consistency_ratio: f64,
}

impl ConsistencyReport {
    /// Report for a matrix that is consistent by construction.
    fn perfect(n: usize) -> Self {
        Self {
            lambda_max: n as f64,
            consistency_index: 0.0,
            random_index: random_index(n),
            consistency_ratio: 0.0,
        }
    }

    /// Classifies the report against `threshold`.
    pub fn verdict(&self, threshold: f64) -> ConsistencyVerdict {
        if self.consistency_ratio <= threshold {
            ConsistencyVerdict::Acceptable
        } else {
            ConsistencyVerdict::Inconsistent
        }
    }

    /// Classifies the report against [`CONSISTENCY_THRESHOLD`].
    pub fn is_acceptable(&self) -> bool {
        self.verdict(CONSISTENCY_THRESHOLD) == ConsistencyVerdict::Acceptable
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "λmax = {:.3}, CI = {:.3}, RI = {:.3}, CR = {:.1}%",
            self.lambda_max,
            self.consistency_index,
            self.random_index,
            self.consistency_ratio * 100.0
        )
    }
}

/// Consistency analysis functions.
pub struct ConsistencyAnalyzer;

impl ConsistencyAnalyzer {
    /// Computes the consistency report of `matrix`.
    ///
    /// # Algorithm
    /// lambda_max is the largest real part among the eigenvalues, computed
    /// from a real Schur decomposition. Reciprocal matrices are not symmetric,
    /// so a symmetric eigensolver would be wrong here.
    ///
    /// # Edge Cases
    /// - n <= 2: consistent by construction, lambda_max = n and CI = CR = 0
    /// - lambda_max < n: possible once reciprocals are rounded; lambda_max is
    ///   reported as computed, CI and CR are clamped to 0
    ///
    /// # Errors
    /// - `InvalidMatrix` when a cell is NaN or infinite
    /// - `ConsistencyComputationFailed` when the decomposition does not
    ///   converge or yields a non-finite eigenvalue
    pub fn analyze(matrix: &ComparisonMatrix) -> Result<ConsistencyReport, AhpError> {
        let n = matrix.size();
        if n <= 2 {
            return Ok(ConsistencyReport::perfect(n));
        }

        if let Some((row, column, value)) = matrix.first_non_finite() {
            return Err(AhpError::InvalidMatrix { row, column, value });
        }

        let lambda_max = Self::principal_eigenvalue(matrix)?;
        let consistency_index = ((lambda_max - n as f64) / (n as f64 - 1.0)).max(0.0);
        let random_index = random_index(n);

        Ok(ConsistencyReport {
            lambda_max,
            consistency_index,
            random_index,
            consistency_ratio: consistency_index / random_index,
        })
    }

    fn principal_eigenvalue(matrix: &ComparisonMatrix) -> Result<f64, AhpError> {
        let schur = Schur::try_new(matrix.to_dmatrix(), f64::EPSILON, SCHUR_MAX_ITERATIONS)
            .ok_or_else(|| AhpError::ConsistencyComputationFailed {
                reason: format!(
                    "eigenvalue iteration did not converge within {} iterations",
                    SCHUR_MAX_ITERATIONS
                ),
            })?;

        let lambda_max = schur
            .complex_eigenvalues()
            .iter()
            .map(|eigenvalue| eigenvalue.re)
            .fold(f64::NEG_INFINITY, f64::max);

        if !lambda_max.is_finite() {
            return Err(AhpError::ConsistencyComputationFailed {
                reason: format!("principal eigenvalue is not finite ({})", lambda_max),
            });
        }

        Ok(lambda_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} ± {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    fn classic() -> ComparisonMatrix {
        ComparisonMatrix::from_rows(vec![
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 2.0],
            vec![1.0 / 5.0, 1.0 / 2.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn random_index_table_values() {
        assert_eq!(random_index(1), 0.0);
        assert_eq!(random_index(2), 0.0);
        assert_eq!(random_index(3), 0.58);
        assert_eq!(random_index(9), 1.45);
        assert_eq!(random_index(10), 1.49);
    }

    #[test]
    fn random_index_falls_back_beyond_table() {
        assert_eq!(random_index(15), 1.49);
        assert_eq!(random_index(0), 0.0);
    }

    #[test]
    fn single_entity_is_trivially_consistent() {
        let report = ConsistencyAnalyzer::analyze(&ComparisonMatrix::neutral(1)).unwrap();
        assert_eq!(report.lambda_max, 1.0);
        assert_eq!(report.consistency_index, 0.0);
        assert_eq!(report.consistency_ratio, 0.0);
    }

    #[test]
    fn two_entities_are_consistent_whatever_the_judgment() {
        let m = ComparisonMatrix::from_rows(vec![vec![1.0, 9.0], vec![1.0 / 9.0, 1.0]]).unwrap();
        let report = ConsistencyAnalyzer::analyze(&m).unwrap();
        assert_eq!(report.lambda_max, 2.0);
        assert_eq!(report.consistency_ratio, 0.0);
        assert!(report.is_acceptable());
    }

    #[test]
    fn neutral_matrix_has_lambda_equal_to_n() {
        for n in 3..=10 {
            let report = ConsistencyAnalyzer::analyze(&ComparisonMatrix::neutral(n)).unwrap();
            assert_close(report.lambda_max, n as f64, 1e-9);
            assert_close(report.consistency_index, 0.0, 1e-9);
            assert_close(report.consistency_ratio, 0.0, 1e-9);
        }
    }

    #[test]
    fn classic_example_is_acceptable() {
        let report = ConsistencyAnalyzer::analyze(&classic()).unwrap();
        assert_close(report.lambda_max, 3.0037, 1e-3);
        assert!(report.consistency_ratio > 0.0);
        assert!(report.consistency_ratio < 0.1);
        assert_eq!(report.random_index, 0.58);
        assert_eq!(report.verdict(CONSISTENCY_THRESHOLD), ConsistencyVerdict::Acceptable);
    }

    #[test]
    fn perfectly_consistent_judgments_have_zero_cr() {
        // w = (4, 2, 1): every a[i][j] = w[i] / w[j]
        let m = ComparisonMatrix::from_rows(vec![
            vec![1.0, 2.0, 4.0],
            vec![0.5, 1.0, 2.0],
            vec![0.25, 0.5, 1.0],
        ])
        .unwrap();
        let report = ConsistencyAnalyzer::analyze(&m).unwrap();
        assert_close(report.lambda_max, 3.0, 1e-9);
        assert_close(report.consistency_ratio, 0.0, 1e-9);
    }

    #[test]
    fn lambda_below_n_does_not_yield_negative_ratio() {
        // Constant row sums of 2, so lambda_max = 2 < n
        let m = ComparisonMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.5],
            vec![0.5, 1.0, 0.5],
            vec![0.5, 0.5, 1.0],
        ])
        .unwrap();
        let report = ConsistencyAnalyzer::analyze(&m).unwrap();
        assert_close(report.lambda_max, 2.0, 1e-9);
        assert_eq!(report.consistency_index, 0.0);
        assert_eq!(report.consistency_ratio, 0.0);
        assert!(!report.to_string().contains('-'));
    }

    #[test]
    fn rounded_consistent_judgments_never_go_negative() {
        // w = (9, 3, 1) rounded to two places, mirrors derived from the rounded cells
        let m = ComparisonMatrix::from_rows(vec![
            vec![1.0, 0.33, 0.11],
            vec![3.03, 1.0, 0.33],
            vec![9.09, 3.03, 1.0],
        ])
        .unwrap();
        let report = ConsistencyAnalyzer::analyze(&m).unwrap();
        assert!(report.consistency_index >= 0.0);
        assert!(report.consistency_ratio >= 0.0);
        assert_close(report.lambda_max, 3.0, 1e-2);
    }

    #[test]
    fn contradictory_judgments_are_inconsistent() {
        // A > B, B > C, but C >> A
        let m = ComparisonMatrix::from_rows(vec![
            vec![1.0, 9.0, 1.0 / 9.0],
            vec![1.0 / 9.0, 1.0, 9.0],
            vec![9.0, 1.0 / 9.0, 1.0],
        ])
        .unwrap();
        let report = ConsistencyAnalyzer::analyze(&m).unwrap();
        assert!(report.consistency_ratio > CONSISTENCY_THRESHOLD);
        assert_eq!(report.verdict(CONSISTENCY_THRESHOLD), ConsistencyVerdict::Inconsistent);
        assert!(!report.is_acceptable());
    }

    #[test]
    fn verdict_threshold_is_inclusive() {
        let report = ConsistencyReport {
            lambda_max: 3.2,
            consistency_index: 0.1,
            random_index: 0.5,
            consistency_ratio: 0.2,
        };
        assert_eq!(report.verdict(0.2), ConsistencyVerdict::Acceptable);
        assert_eq!(report.verdict(0.1), ConsistencyVerdict::Inconsistent);
    }

    #[test]
    fn non_finite_cell_is_invalid() {
        let m = ComparisonMatrix::from_rows(vec![
            vec![1.0, 2.0, f64::INFINITY],
            vec![0.5, 1.0, 2.0],
            vec![0.0, 0.5, 1.0],
        ])
        .unwrap();
        let err = ConsistencyAnalyzer::analyze(&m).unwrap_err();
        assert!(matches!(err, AhpError::InvalidMatrix { row: 0, column: 2, .. }));
    }

    #[test]
    fn report_display_matches_summary_line() {
        let report = ConsistencyReport {
            lambda_max: 3.0037,
            consistency_index: 0.00185,
            random_index: 0.58,
            consistency_ratio: 0.0032,
        };
        assert_eq!(
            report.to_string(),
            "λmax = 3.004, CI = 0.002, RI = 0.580, CR = 0.3%"
        );
    }
}
