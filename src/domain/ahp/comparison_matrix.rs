//! Comparison Matrix - reciprocal pairwise-judgment matrix for one level.
//!
//! Entry `(i, j)` answers "how many times more important is entity `i` than
//! entity `j`". Row/column order follows the order of the compared entities.
//!
//! A matrix built with [`ComparisonMatrix::from_rows`] is taken as-is and may
//! violate the reciprocal invariants; only the
//! [`SymmetryEnforcer`](super::SymmetryEnforcer) produces matrices that are
//! guaranteed to satisfy them.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::{AhpError, Precision};

/// Smallest judgment on the conventional Saaty scale.
pub const SAATY_SCALE_MIN: f64 = 1.0 / 9.0;

/// Largest judgment on the conventional Saaty scale.
pub const SAATY_SCALE_MAX: f64 = 9.0;

/// Float slack on top of the rounded scale bounds.
const SCALE_EPSILON: f64 = 1e-9;

/// A judgment cell lying outside the conventional 1/9..9 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleViolation {
    pub row: usize,
    pub column: usize,
    pub value: f64,
}

/// Square matrix of pairwise judgments, stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct ComparisonMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl ComparisonMatrix {
    /// Creates an `n x n` matrix with every judgment neutral (1.0).
    ///
    /// `n = 0` is lifted to 1; a level always holds at least one entity.
    pub fn neutral(n: usize) -> Self {
        let size = n.max(1);
        Self {
            size,
            cells: vec![1.0; size * size],
        }
    }

    /// Builds a matrix from rows without normalizing anything.
    ///
    /// # Errors
    /// - `EmptyMatrix` when `rows` is empty
    /// - `NotSquare` when any row length differs from the row count
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, AhpError> {
        let size = rows.len();
        if size == 0 {
            return Err(AhpError::EmptyMatrix);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(AhpError::NotSquare {
                    rows: size,
                    row,
                    len: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self { size, cells })
    }

    /// Crate-internal constructor for already-validated cell data.
    pub(crate) fn from_cells(size: usize, cells: Vec<f64>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// Number of compared entities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the judgment at `(row, column)`, or None when out of bounds.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row < self.size && column < self.size {
            Some(self.cells[row * self.size + column])
        } else {
            None
        }
    }

    /// Returns one row of the matrix.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Iterates over the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.size)
    }

    /// Copies the matrix out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Sum of column `column`.
    pub fn column_sum(&self, column: usize) -> f64 {
        (0..self.size).map(|row| self.cells[row * self.size + column]).sum()
    }

    /// Returns the first non-finite cell, scanning row by row.
    pub fn first_non_finite(&self) -> Option<(usize, usize, f64)> {
        self.cells
            .iter()
            .position(|v| !v.is_finite())
            .map(|idx| (idx / self.size, idx % self.size, self.cells[idx]))
    }

    /// Checks the three reciprocal invariants: unit diagonal, positive cells,
    /// and `a[i][j] * a[j][i] = 1` within `tolerance`.
    pub fn is_reciprocal(&self, tolerance: f64) -> bool {
        for i in 0..self.size {
            if self.cells[i * self.size + i] != 1.0 {
                return false;
            }
            for j in (i + 1)..self.size {
                let upper = self.cells[i * self.size + j];
                let lower = self.cells[j * self.size + i];
                if !(upper > 0.0 && lower > 0.0) {
                    return false;
                }
                if (upper * lower - 1.0).abs() > tolerance {
                    return false;
                }
            }
        }
        true
    }

    /// Lists upper-triangle judgments outside the 1/9..9 scale as it looks
    /// after rounding to `precision`.
    ///
    /// The upper triangle is authoritative, so a violation is reported once
    /// rather than once per mirror cell.
    pub fn scale_violations(&self, precision: Precision) -> Vec<ScaleViolation> {
        let mut violations = Vec::new();
        for row in 0..self.size {
            for column in (row + 1)..self.size {
                let value = self.cells[row * self.size + column];
                if !is_on_saaty_scale(value, precision) {
                    violations.push(ScaleViolation { row, column, value });
                }
            }
        }
        violations
    }

    /// Converts to a dense nalgebra matrix.
    pub(crate) fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.size, self.size, &self.cells)
    }
}

impl TryFrom<Vec<Vec<f64>>> for ComparisonMatrix {
    type Error = AhpError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<ComparisonMatrix> for Vec<Vec<f64>> {
    fn from(matrix: ComparisonMatrix) -> Self {
        matrix.to_rows()
    }
}

/// True when `value` lies within the 1/9..9 judgment scale, with both bounds
/// rounded to `precision` (1/9 is 0.11 at two places, 0.1111 at four).
pub fn is_on_saaty_scale(value: f64, precision: Precision) -> bool {
    let min = precision.round(SAATY_SCALE_MIN) - SCALE_EPSILON;
    let max = precision.round(SAATY_SCALE_MAX) + SCALE_EPSILON;
    value >= min && value <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> ComparisonMatrix {
        ComparisonMatrix::from_rows(vec![
            vec![1.0, 3.0, 5.0],
            vec![1.0 / 3.0, 1.0, 2.0],
            vec![1.0 / 5.0, 1.0 / 2.0, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn neutral_matrix_is_all_ones() {
        let m = ComparisonMatrix::neutral(4);
        assert_eq!(m.size(), 4);
        assert!(m.rows().all(|row| row.iter().all(|&v| v == 1.0)));
        assert!(m.is_reciprocal(0.0));
    }

    #[test]
    fn neutral_zero_is_lifted_to_one() {
        assert_eq!(ComparisonMatrix::neutral(0).size(), 1);
    }

    #[test]
    fn from_rows_rejects_empty() {
        assert_eq!(ComparisonMatrix::from_rows(vec![]), Err(AhpError::EmptyMatrix));
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let result = ComparisonMatrix::from_rows(vec![vec![1.0, 2.0], vec![0.5]]);
        assert_eq!(result, Err(AhpError::NotSquare { rows: 2, row: 1, len: 1 }));
    }

    #[test]
    fn get_reads_cells_and_guards_bounds() {
        let m = classic();
        assert_eq!(m.get(0, 2), Some(5.0));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn column_sum_adds_down_the_column() {
        let m = classic();
        assert!((m.column_sum(2) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn classic_matrix_is_reciprocal() {
        assert!(classic().is_reciprocal(1e-9));
    }

    #[test]
    fn broken_mirror_is_not_reciprocal() {
        let m = ComparisonMatrix::from_rows(vec![vec![1.0, 3.0], vec![3.0, 1.0]]).unwrap();
        assert!(!m.is_reciprocal(1e-3));
    }

    #[test]
    fn zero_cell_is_not_reciprocal() {
        let m = ComparisonMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(!m.is_reciprocal(1e-3));
    }

    #[test]
    fn first_non_finite_reports_position() {
        let m = ComparisonMatrix::from_rows(vec![vec![1.0, 2.0], vec![f64::NAN, 1.0]]).unwrap();
        let (row, column, value) = m.first_non_finite().unwrap();
        assert_eq!((row, column), (1, 0));
        assert!(value.is_nan());
    }

    #[test]
    fn scale_violations_report_upper_triangle_only() {
        let m = ComparisonMatrix::from_rows(vec![
            vec![1.0, 12.0, 0.05],
            vec![1.0 / 12.0, 1.0, 9.0],
            vec![20.0, 1.0 / 9.0, 1.0],
        ])
        .unwrap();

        let violations = m.scale_violations(Precision::default());
        assert_eq!(violations.len(), 2);
        assert_eq!((violations[0].row, violations[0].column), (0, 1));
        assert_eq!((violations[1].row, violations[1].column), (0, 2));
    }

    fn places(p: u32) -> Precision {
        Precision::try_new(p).unwrap()
    }

    #[test]
    fn rounded_reciprocal_of_nine_is_on_scale() {
        assert!(is_on_saaty_scale(0.1111, places(4)));
        assert!(is_on_saaty_scale(0.111, places(3)));
        assert!(is_on_saaty_scale(0.11, places(2)));
        assert!(is_on_saaty_scale(1.0 / 9.0, places(4)));
        assert!(is_on_saaty_scale(9.0, places(2)));
        assert!(!is_on_saaty_scale(9.5, places(4)));
        assert!(!is_on_saaty_scale(0.1, places(2)));
    }

    #[test]
    fn scale_bounds_follow_precision() {
        // 0.11 is 1/9 at two places but a real value below 1/9 at four
        assert!(is_on_saaty_scale(0.11, places(2)));
        assert!(!is_on_saaty_scale(0.11, places(4)));
        assert!(!is_on_saaty_scale(9.01, places(2)));
    }

    #[test]
    fn two_place_matrix_at_scale_ends_has_no_violations() {
        let m = ComparisonMatrix::from_rows(vec![
            vec![1.0, 0.11, 9.0],
            vec![9.0, 1.0, 0.11],
            vec![0.11, 9.0, 1.0],
        ])
        .unwrap();
        assert!(m.scale_violations(places(2)).is_empty());
    }

    #[test]
    fn serde_uses_nested_rows() {
        let m = classic();
        let json = serde_json::to_string(&m).unwrap();
        let back: ComparisonMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert!(serde_json::from_str::<ComparisonMatrix>("[[1.0, 2.0]]").is_err());
    }

    #[test]
    fn to_dmatrix_keeps_row_major_order() {
        let m = classic();
        let d = m.to_dmatrix();
        assert_eq!(d[(0, 1)], 3.0);
        assert_eq!(d[(1, 0)], 1.0 / 3.0);
    }
}
