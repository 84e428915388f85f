//! Hierarchy snapshots - the interchange shape shared with persistence.
//!
//! Matrices are name-indexed (`row name -> column name -> judgment`), so a
//! snapshot stays readable when edited by hand. Loading is forgiving: absent
//! cells and absent per-criterion matrices come back neutral through the
//! symmetry enforcer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::{ComparisonMatrix, Hierarchy, Precision};
use crate::domain::foundation::ValidationError;

/// A comparison matrix keyed by entity name.
pub type NamedMatrix = BTreeMap<String, BTreeMap<String, f64>>;

/// Serializable form of a [`Hierarchy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchySnapshot {
    pub goal: String,
    pub criteria: Vec<String>,
    pub alternatives: Vec<String>,
    pub criteria_matrix: NamedMatrix,
    #[serde(default)]
    pub alternative_matrices: BTreeMap<String, NamedMatrix>,
}

impl HierarchySnapshot {
    /// Parses a snapshot from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Renders the snapshot as YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Renders the snapshot as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Hierarchy {
    /// Rebuilds a hierarchy from a snapshot.
    ///
    /// Every matrix goes through the symmetry enforcer at `precision`, so only
    /// the upper triangle of each table matters. Matrices for criteria not
    /// listed in the snapshot are ignored.
    ///
    /// # Errors
    /// Blank or duplicate names, or an empty criteria/alternatives list.
    pub fn from_snapshot(
        snapshot: &HierarchySnapshot,
        precision: Precision,
    ) -> Result<Self, ValidationError> {
        for criterion in snapshot.alternative_matrices.keys() {
            if !snapshot.criteria.contains(criterion) {
                warn!(criterion = %criterion, "Ignoring alternatives matrix of unknown criterion");
            }
        }

        let criteria_table = table_from_named(&snapshot.criteria, &snapshot.criteria_matrix);
        let empty = NamedMatrix::new();
        let alternative_tables: Vec<_> = snapshot
            .criteria
            .iter()
            .map(|criterion| {
                let named = snapshot.alternative_matrices.get(criterion).unwrap_or(&empty);
                table_from_named(&snapshot.alternatives, named)
            })
            .collect();

        Hierarchy::from_parts(
            snapshot.goal.clone(),
            snapshot.criteria.clone(),
            snapshot.alternatives.clone(),
            &criteria_table,
            &alternative_tables,
            precision,
        )
    }

    /// Captures the hierarchy as a snapshot.
    pub fn to_snapshot(&self) -> HierarchySnapshot {
        let criteria = self.criterion_names();
        let alternatives = self.alternative_names();

        let alternative_matrices = criteria
            .iter()
            .enumerate()
            .filter_map(|(index, criterion)| {
                self.alternative_matrix(index)
                    .map(|matrix| (criterion.clone(), named_from_matrix(&alternatives, matrix)))
            })
            .collect();

        HierarchySnapshot {
            goal: self.goal().to_string(),
            criteria_matrix: named_from_matrix(&criteria, self.criteria_matrix()),
            criteria,
            alternatives,
            alternative_matrices,
        }
    }
}

/// Reads a named matrix in `names` order; absent cells become None.
fn table_from_named(names: &[String], named: &NamedMatrix) -> Vec<Vec<Option<f64>>> {
    names
        .iter()
        .map(|row| {
            let cells = named.get(row);
            names
                .iter()
                .map(|column| cells.and_then(|c| c.get(column)).copied())
                .collect()
        })
        .collect()
}

fn named_from_matrix(names: &[String], matrix: &ComparisonMatrix) -> NamedMatrix {
    names
        .iter()
        .zip(matrix.rows())
        .map(|(row_name, row)| {
            let cells = names.iter().cloned().zip(row.iter().copied()).collect();
            (row_name.clone(), cells)
        })
        .collect()
}
