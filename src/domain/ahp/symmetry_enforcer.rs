//! Symmetry Enforcer - restores the reciprocal invariant after an edit.
//!
//! The upper triangle is authoritative and the lower triangle is always
//! derived from it, so there is never a question of which of two mirrored
//! cells the user actually changed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ComparisonMatrix;
use crate::domain::foundation::ValidationError;

/// Number of decimal places judgments are rounded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Precision(u32);

impl Precision {
    pub const MIN: u32 = 2;
    pub const MAX: u32 = 4;

    /// Four decimal places keep `a[i][j] * a[j][i]` within 1e-3 of 1 across
    /// the whole 1/9..9 scale (three places give 6 * 0.167 = 1.002).
    pub const DEFAULT: Self = Self(4);

    /// Creates a Precision, returning error if outside 2..=4.
    pub fn try_new(places: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&places) {
            return Err(ValidationError::out_of_range(
                "precision",
                i64::from(Self::MIN),
                i64::from(Self::MAX),
                i64::from(places),
            ));
        }
        Ok(Self(places))
    }

    /// Returns the number of decimal places.
    pub fn places(&self) -> u32 {
        self.0
    }

    /// Smallest positive value representable at this precision.
    pub fn quantum(&self) -> f64 {
        1.0 / 10f64.powi(self.0 as i32)
    }

    /// Rounds `value` to this precision, half away from zero.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.0 as i32);
        let scaled = value * factor;
        if !scaled.is_finite() {
            return value;
        }
        scaled.round() / factor
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Precision {
    type Error = ValidationError;

    fn try_from(places: u32) -> Result<Self, Self::Error> {
        Self::try_new(places)
    }
}

impl From<Precision> for u32 {
    fn from(precision: Precision) -> Self {
        precision.0
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} decimal places", self.0)
    }
}

/// Rebuilds a valid reciprocal matrix from user-entered judgments.
///
/// Total over its input: missing, non-finite, zero or negative upper-triangle
/// cells become the neutral judgment 1.0 instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymmetryEnforcer {
    precision: Precision,
}

impl SymmetryEnforcer {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Enforces reciprocity on an existing matrix.
    pub fn enforce(&self, matrix: &ComparisonMatrix) -> ComparisonMatrix {
        let n = matrix.size();
        self.build(n, |i, j| matrix.get(i, j))
    }

    /// Enforces reciprocity on a raw judgment table.
    ///
    /// The size is the number of rows. Short rows are tolerated: absent cells
    /// count as missing, as do `None` cells. Lower-triangle input is ignored.
    pub fn enforce_table(&self, table: &[Vec<Option<f64>>]) -> ComparisonMatrix {
        let n = table.len();
        self.build(n, |i, j| table.get(i).and_then(|row| row.get(j).copied().flatten()))
    }

    fn build(&self, n: usize, upper: impl Fn(usize, usize) -> Option<f64>) -> ComparisonMatrix {
        if n <= 1 {
            return ComparisonMatrix::neutral(1);
        }

        let mut cells = vec![1.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let value = self.normalize(upper(i, j));
                cells[i * n + j] = value;
                cells[j * n + i] = self.rounded_positive(1.0 / value);
            }
        }

        ComparisonMatrix::from_cells(n, cells)
    }

    /// Substitutes neutral for unusable input, then rounds.
    fn normalize(&self, value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => self.rounded_positive(v),
            _ => 1.0,
        }
    }

    /// Rounds without ever reaching zero: values below one quantum are
    /// raised to it.
    fn rounded_positive(&self, value: f64) -> f64 {
        self.precision.round(value).max(self.precision.quantum())
    }
}
