//! Plain-text tables for evaluation results, outlines and listings.

use tabled::{builder::Builder, settings::Style, Table, Tabled};

use crate::domain::ahp::{GlobalPriorities, HierarchyOutline, MatrixAssessment, PriorityVector};
use crate::ports::StoredSnapshotInfo;

/// Weight display row for tables
#[derive(Tabled)]
struct WeightRow {
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

/// Stored hierarchy display row for tables
#[derive(Tabled)]
struct HierarchyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    goal: String,
    #[tabled(rename = "Saved")]
    saved_at: String,
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// Names paired with their local weights.
pub fn weights_table(names: &[String], weights: &PriorityVector) -> String {
    let rows: Vec<WeightRow> = names
        .iter()
        .zip(weights.iter())
        .map(|(name, weight)| WeightRow {
            name: name.clone(),
            weight: percent(*weight),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One line summarizing a matrix's consistency.
pub fn consistency_line(assessment: &MatrixAssessment) -> String {
    match (&assessment.consistency, &assessment.verdict) {
        (Some(report), Some(verdict)) => format!("{} ({})", report, verdict.label()),
        _ => "consistency unknown".to_string(),
    }
}

/// Global priority table, best alternative first.
///
/// Columns are rank, alternative, one contribution per criterion and total.
pub fn global_table(global: &GlobalPriorities) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["Rank".to_string(), "Alternative".to_string()];
    header.extend(global.criteria.iter().cloned());
    header.push("Total".to_string());
    builder.push_record(header);

    for (rank, row) in global.rows.iter().enumerate() {
        let mut record = vec![(rank + 1).to_string(), row.alternative.clone()];
        record.extend(row.contributions.iter().map(|c| format!("{:.4}", c)));
        record.push(format!("{:.4}", row.total));
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Goal, criteria and alternatives as an indented tree.
pub fn outline_tree(outline: &HierarchyOutline) -> String {
    let mut out = format!("{}\n", outline.goal);
    for (i, criterion) in outline.criteria.iter().enumerate() {
        let last_criterion = i + 1 == outline.criteria.len();
        let (branch, indent) = if last_criterion {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(&format!("{}{}\n", branch, criterion));
        for (j, alternative) in outline.alternatives.iter().enumerate() {
            let leaf = if j + 1 == outline.alternatives.len() {
                "└── "
            } else {
                "├── "
            };
            out.push_str(&format!("{}{}{}\n", indent, leaf, alternative));
        }
    }
    out
}

/// Stored hierarchies, most recent first.
pub fn listing_table(infos: &[StoredSnapshotInfo]) -> String {
    let rows: Vec<HierarchyRow> = infos
        .iter()
        .map(|info| HierarchyRow {
            id: info.id.to_string(),
            goal: info.goal.clone(),
            saved_at: info.saved_at.to_string(),
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
