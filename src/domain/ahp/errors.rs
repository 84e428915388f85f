//! Fatal errors and non-fatal warnings raised by the AHP engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Identifies which comparison matrix of a hierarchy a problem belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum MatrixRef {
    /// The criteria-level matrix (criteria compared against the goal).
    Criteria,
    /// The alternatives matrix bound to one criterion.
    Alternatives { criterion: String },
}

impl MatrixRef {
    pub fn alternatives(criterion: impl Into<String>) -> Self {
        MatrixRef::Alternatives {
            criterion: criterion.into(),
        }
    }
}

impl fmt::Display for MatrixRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixRef::Criteria => write!(f, "criteria matrix"),
            MatrixRef::Alternatives { criterion } => {
                write!(f, "alternatives matrix for criterion '{}'", criterion)
            }
        }
    }
}

/// Coarse classification of [`AhpError`], one per fatal error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AhpErrorKind {
    InvalidMatrix,
    DegenerateMatrix,
    DimensionMismatch,
    ConsistencyComputationFailed,
}

/// Fatal engine errors. Each aborts the computation that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AhpError {
    #[error("Matrix has no rows")]
    EmptyMatrix,

    #[error("Matrix is not square: {rows} rows but row {row} has {len} cells")]
    NotSquare { rows: usize, row: usize, len: usize },

    #[error("Cell ({row}, {column}) holds {value}, expected a finite non-negative number")]
    InvalidMatrix { row: usize, column: usize, value: f64 },

    #[error("Column {column} sums to zero, weights are undefined")]
    DegenerateMatrix { column: usize },

    #[error("Criteria matrix has size {actual}, expected {expected} criteria")]
    CriteriaDimensionMismatch { expected: usize, actual: usize },

    #[error(
        "Alternatives matrix for criterion '{criterion}' has size {actual}, expected {expected} alternatives"
    )]
    DimensionMismatch {
        criterion: String,
        expected: usize,
        actual: usize,
    },

    #[error("Criterion '{criterion}' has no alternatives matrix")]
    MissingAlternativeMatrix { criterion: String },

    #[error("Consistency computation failed: {reason}")]
    ConsistencyComputationFailed { reason: String },

    #[error("In {matrix}: {source}")]
    InMatrix {
        matrix: MatrixRef,
        #[source]
        source: Box<AhpError>,
    },
}

impl AhpError {
    /// Returns the error kind, looking through matrix context.
    pub fn kind(&self) -> AhpErrorKind {
        match self {
            AhpError::EmptyMatrix | AhpError::InvalidMatrix { .. } => AhpErrorKind::InvalidMatrix,
            AhpError::DegenerateMatrix { .. } => AhpErrorKind::DegenerateMatrix,
            AhpError::NotSquare { .. }
            | AhpError::CriteriaDimensionMismatch { .. }
            | AhpError::DimensionMismatch { .. }
            | AhpError::MissingAlternativeMatrix { .. } => AhpErrorKind::DimensionMismatch,
            AhpError::ConsistencyComputationFailed { .. } => {
                AhpErrorKind::ConsistencyComputationFailed
            }
            AhpError::InMatrix { source, .. } => source.kind(),
        }
    }

    /// Attaches the matrix the error was raised for.
    pub fn in_matrix(self, matrix: MatrixRef) -> Self {
        match self {
            // Already attributed.
            AhpError::InMatrix { .. } => self,
            other => AhpError::InMatrix {
                matrix,
                source: Box::new(other),
            },
        }
    }

    /// Returns the matrix this error was attributed to, if any.
    pub fn matrix(&self) -> Option<&MatrixRef> {
        match self {
            AhpError::InMatrix { matrix, .. } => Some(matrix),
            _ => None,
        }
    }
}

impl From<AhpError> for DomainError {
    fn from(err: AhpError) -> Self {
        let code = match err.kind() {
            AhpErrorKind::InvalidMatrix => ErrorCode::InvalidMatrix,
            AhpErrorKind::DegenerateMatrix => ErrorCode::DegenerateMatrix,
            AhpErrorKind::DimensionMismatch => ErrorCode::DimensionMismatch,
            AhpErrorKind::ConsistencyComputationFailed => ErrorCode::ConsistencyComputationFailed,
        };
        let mut domain = DomainError::new(code, err.to_string());
        if let Some(matrix) = err.matrix() {
            domain = domain.with_detail("matrix", matrix.to_string());
        }
        domain
    }
}

/// Non-fatal findings. Computation proceeds; these are surfaced to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JudgmentWarning {
    /// A judgment lies outside the conventional 1/9..9 scale.
    ScaleViolation {
        matrix: MatrixRef,
        row: usize,
        column: usize,
        value: f64,
    },
    /// Consistency ratio exceeds the acceptance threshold.
    InconsistentJudgments {
        matrix: MatrixRef,
        consistency_ratio: f64,
        threshold: f64,
    },
    /// Consistency could not be computed; CR is unknown, not acceptable.
    ConsistencyUnknown { matrix: MatrixRef, reason: String },
}

impl JudgmentWarning {
    pub fn matrix(&self) -> &MatrixRef {
        match self {
            JudgmentWarning::ScaleViolation { matrix, .. }
            | JudgmentWarning::InconsistentJudgments { matrix, .. }
            | JudgmentWarning::ConsistencyUnknown { matrix, .. } => matrix,
        }
    }
}

impl fmt::Display for JudgmentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JudgmentWarning::ScaleViolation {
                matrix,
                row,
                column,
                value,
            } => write!(
                f,
                "{}: judgment {} at ({}, {}) is outside the 1/9..9 scale",
                matrix, value, row, column
            ),
            JudgmentWarning::InconsistentJudgments {
                matrix,
                consistency_ratio,
                threshold,
            } => write!(
                f,
                "{}: CR = {:.1}% exceeds {:.0}%, revise the judgments",
                matrix,
                consistency_ratio * 100.0,
                threshold * 100.0
            ),
            JudgmentWarning::ConsistencyUnknown { matrix, reason } => {
                write!(f, "{}: consistency unknown ({})", matrix, reason)
            }
        }
    }
}
