//! Saaty AHP CLI
//!
//! Command-line front end over the application handlers. Hierarchies are kept
//! as YAML snapshots in the configured storage directory.
//!
//! # Usage
//!
//! ```bash
//! # Create a hierarchy with three criteria and two alternatives
//! saaty-ahp new --goal "Choose a car" --criteria 3 --alternatives 2 \
//!     --criterion Price --criterion Comfort --criterion Safety
//!
//! # Enter the upper triangle of the criteria matrix
//! saaty-ahp judge --id <ID> --upper 3,5,1/2
//!
//! # Evaluate a stored hierarchy, or a snapshot file
//! saaty-ahp evaluate --id <ID>
//! saaty-ahp evaluate --file decision.yaml --format json
//! ```

mod report;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::FileSnapshotStore;
use crate::application::{
    CreateHierarchyCommand, CreateHierarchyHandler, EngineSettings, EvaluateHierarchyHandler,
    EvaluateHierarchyQuery, EvaluateHierarchyResult, MatrixTarget, ReshapeHierarchyCommand,
    ReshapeHierarchyHandler, ReshapeOperation, UpdateJudgmentsCommand, UpdateJudgmentsHandler,
};
use crate::config::AppConfig;
use crate::domain::ahp::{HierarchySnapshot, DEFAULT_GOAL_NAME};
use crate::domain::foundation::HierarchyId;
use crate::ports::SnapshotStore;

/// Saaty AHP Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "saaty-ahp")]
#[command(author, version, about = "Pairwise-comparison decisions with the Analytic Hierarchy Process")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a hierarchy with neutral judgments
    New(NewArgs),

    /// Replace the judgments of one comparison matrix
    Judge(JudgeArgs),

    /// Rename or resize part of a hierarchy
    Reshape(ReshapeArgs),

    /// Compute weights, consistency and the global ranking
    Evaluate(EvaluateArgs),

    /// List stored hierarchies
    List(ListArgs),

    /// Delete a stored hierarchy
    Delete {
        /// Hierarchy ID
        id: HierarchyId,
    },
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Decision goal
    #[arg(long, default_value = DEFAULT_GOAL_NAME)]
    pub goal: String,

    /// Number of criteria
    #[arg(long, default_value_t = 3)]
    pub criteria: usize,

    /// Number of alternatives
    #[arg(long, default_value_t = 3)]
    pub alternatives: usize,

    /// Criterion names, in order (repeatable)
    #[arg(long = "criterion")]
    pub criterion_names: Vec<String>,

    /// Alternative names, in order (repeatable)
    #[arg(long = "alternative")]
    pub alternative_names: Vec<String>,
}

/// Arguments for the judge command
#[derive(Args, Debug)]
pub struct JudgeArgs {
    /// Hierarchy ID
    #[arg(long)]
    pub id: HierarchyId,

    /// Write the alternatives matrix of this criterion (1-based) instead of
    /// the criteria matrix
    #[arg(long)]
    pub criterion: Option<usize>,

    /// Upper triangle, row by row, e.g. `3,5,1/2` for a 3x3 matrix
    #[arg(long, value_delimiter = ',', value_parser = parse_judgment, required = true)]
    pub upper: Vec<f64>,
}

/// Arguments for the reshape command
#[derive(Args, Debug)]
pub struct ReshapeArgs {
    /// Hierarchy ID
    #[arg(long)]
    pub id: HierarchyId,

    #[command(subcommand)]
    pub change: ReshapeChange,
}

/// Structural edits
#[derive(Subcommand, Debug)]
pub enum ReshapeChange {
    /// Rename the goal
    Goal { name: String },
    /// Rename the criterion at a 1-based position
    Criterion { position: usize, name: String },
    /// Rename the alternative at a 1-based position
    Alternative { position: usize, name: String },
    /// Change the number of criteria (resets the criteria judgments)
    Criteria { count: usize },
    /// Change the number of alternatives (resets all alternative judgments)
    Alternatives { count: usize },
}

/// Arguments for the evaluate command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["id", "file"])))]
pub struct EvaluateArgs {
    /// Stored hierarchy ID
    #[arg(long)]
    pub id: Option<HierarchyId>,

    /// Snapshot file (YAML, or JSON with a `.json` extension)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Parses a judgment written as a decimal or a fraction such as `1/3`.
pub fn parse_judgment(input: &str) -> Result<f64, String> {
    let input = input.trim();
    let value = match input.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| format!("invalid judgment '{}'", input))?;
            let den: f64 = den.trim().parse().map_err(|_| format!("invalid judgment '{}'", input))?;
            if den == 0.0 {
                return Err(format!("invalid judgment '{}': zero denominator", input));
            }
            num / den
        }
        None => input.parse().map_err(|_| format!("invalid judgment '{}'", input))?,
    };
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("judgment '{}' must be a positive number", input));
    }
    Ok(value)
}

/// Expands an upper triangle (row-major) into a judgment table.
pub fn table_from_upper(upper: &[f64]) -> Result<Vec<Vec<Option<f64>>>> {
    // k = n(n-1)/2
    let k = upper.len();
    let n = (1.0 + (1.0 + 8.0 * k as f64).sqrt()) / 2.0;
    let n = n.round() as usize;
    if n * (n - 1) / 2 != k {
        bail!("{} values do not form the upper triangle of a square matrix", k);
    }

    let mut table = vec![vec![None; n]; n];
    let mut values = upper.iter();
    for (i, row) in table.iter_mut().enumerate() {
        for cell in row.iter_mut().skip(i + 1) {
            *cell = values.next().copied();
        }
    }
    Ok(table)
}

fn zero_based(position: usize, what: &str) -> Result<usize> {
    position
        .checked_sub(1)
        .with_context(|| format!("{} positions start at 1", what))
}

/// Execute a CLI command
pub async fn execute(command: Commands, config: &AppConfig) -> Result<()> {
    let settings = config.engine.settings().context("invalid engine configuration")?;
    let store: Arc<dyn SnapshotStore> =
        Arc::new(FileSnapshotStore::new(&config.storage.snapshot_dir));

    match command {
        Commands::New(args) => execute_new(args, store, settings).await,
        Commands::Judge(args) => execute_judge(args, store, settings).await,
        Commands::Reshape(args) => execute_reshape(args, store, settings).await,
        Commands::Evaluate(args) => execute_evaluate(args, store, settings).await,
        Commands::List(args) => execute_list(args, store).await,
        Commands::Delete { id } => execute_delete(id, store).await,
    }
}

async fn execute_new(
    args: NewArgs,
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
) -> Result<()> {
    let handler = CreateHierarchyHandler::new(store, settings);
    let result = handler
        .handle(CreateHierarchyCommand {
            goal: args.goal,
            criteria_count: args.criteria,
            alternative_count: args.alternatives,
            criterion_names: args.criterion_names,
            alternative_names: args.alternative_names,
        })
        .await?;

    println!("{} {}", "Created hierarchy".green().bold(), result.id);
    println!();
    print!("{}", report::outline_tree(&result.hierarchy.outline()));
    Ok(())
}

async fn execute_judge(
    args: JudgeArgs,
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
) -> Result<()> {
    let target = match args.criterion {
        Some(position) => MatrixTarget::Alternatives {
            criterion_index: zero_based(position, "criterion")?,
        },
        None => MatrixTarget::Criteria,
    };

    let handler = UpdateJudgmentsHandler::new(store, settings);
    let result = handler
        .handle(UpdateJudgmentsCommand {
            hierarchy_id: args.id,
            target,
            judgments: table_from_upper(&args.upper)?,
        })
        .await?;

    println!("{}", "Enforced matrix".bold().cyan());
    for row in result.matrix.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>8.4}", v)).collect();
        println!("  {}", cells.join(" "));
    }
    for warning in &result.warnings {
        println!("{} {}", "[WARN]".yellow().bold(), warning);
    }
    Ok(())
}

async fn execute_reshape(
    args: ReshapeArgs,
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
) -> Result<()> {
    let operation = match args.change {
        ReshapeChange::Goal { name } => ReshapeOperation::RenameGoal { name },
        ReshapeChange::Criterion { position, name } => ReshapeOperation::RenameCriterion {
            index: zero_based(position, "criterion")?,
            name,
        },
        ReshapeChange::Alternative { position, name } => ReshapeOperation::RenameAlternative {
            index: zero_based(position, "alternative")?,
            name,
        },
        ReshapeChange::Criteria { count } => ReshapeOperation::ResizeCriteria { count },
        ReshapeChange::Alternatives { count } => ReshapeOperation::ResizeAlternatives { count },
    };

    let handler = ReshapeHierarchyHandler::new(store, settings);
    let result = handler
        .handle(ReshapeHierarchyCommand {
            hierarchy_id: args.id,
            operation,
        })
        .await?;

    print!("{}", report::outline_tree(&result.outline));
    Ok(())
}

async fn read_snapshot_file(path: &Path) -> Result<HierarchySnapshot> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let snapshot = if is_json {
        HierarchySnapshot::from_json(&text)
            .with_context(|| format!("{} is not a valid JSON snapshot", path.display()))?
    } else {
        HierarchySnapshot::from_yaml(&text)
            .with_context(|| format!("{} is not a valid YAML snapshot", path.display()))?
    };
    Ok(snapshot)
}

async fn execute_evaluate(
    args: EvaluateArgs,
    store: Arc<dyn SnapshotStore>,
    settings: EngineSettings,
) -> Result<()> {
    let handler = EvaluateHierarchyHandler::new(store, settings);

    let result = match (args.id, args.file) {
        (Some(id), _) => handler.handle(EvaluateHierarchyQuery { hierarchy_id: id }).await?,
        (None, Some(path)) => handler.evaluate_snapshot(&read_snapshot_file(&path).await?)?,
        (None, None) => bail!("either --id or --file is required"),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result.evaluation)?),
        OutputFormat::Table => print_evaluation(&result),
    }
    Ok(())
}

fn print_evaluation(result: &EvaluateHierarchyResult) {
    let evaluation = &result.evaluation;
    let hierarchy = &result.hierarchy;

    println!("{}", evaluation.goal.bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!("{}", "Criteria".bold());
    println!(
        "{}",
        report::weights_table(&hierarchy.criterion_names(), &evaluation.criteria.weights)
    );
    println!("  {}", report::consistency_line(&evaluation.criteria).dimmed());
    println!();

    let alternatives = hierarchy.alternative_names();
    for (criterion, assessment) in hierarchy.criteria().iter().zip(&evaluation.alternatives) {
        println!("{} {}", "Alternatives under".bold(), criterion.name.bold());
        println!("{}", report::weights_table(&alternatives, &assessment.weights));
        println!("  {}", report::consistency_line(assessment).dimmed());
        println!();
    }

    println!("{}", "Global priorities".bold());
    println!("{}", report::global_table(&evaluation.global));

    if let Some(best) = evaluation.global.best() {
        println!();
        println!("{} {}", "Best alternative:".green().bold(), best.alternative);
    }

    if evaluation.has_warnings() {
        println!();
        for warning in &evaluation.warnings {
            println!("{} {}", "[WARN]".yellow().bold(), warning);
        }
    }
}

async fn execute_list(args: ListArgs, store: Arc<dyn SnapshotStore>) -> Result<()> {
    let infos = store.list().await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&infos)?),
        OutputFormat::Table if infos.is_empty() => {
            println!("No hierarchies stored. Use 'saaty-ahp new' to create one.");
        }
        OutputFormat::Table => println!("{}", report::listing_table(&infos)),
    }
    Ok(())
}

async fn execute_delete(id: HierarchyId, store: Arc<dyn SnapshotStore>) -> Result<()> {
    if !store.exists(id).await? {
        bail!("hierarchy {} not found", id);
    }
    store.delete(id).await?;
    println!("{} {}", "Deleted hierarchy".green().bold(), id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fractions_and_decimals() {
        assert_eq!(parse_judgment("3").unwrap(), 3.0);
        assert_eq!(parse_judgment(" 0.5 ").unwrap(), 0.5);
        assert!((parse_judgment("1/3").unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_and_malformed_judgments() {
        assert!(parse_judgment("0").is_err());
        assert!(parse_judgment("-2").is_err());
        assert!(parse_judgment("1/0").is_err());
        assert!(parse_judgment("three").is_err());
        assert!(parse_judgment("NaN").is_err());
    }

    #[test]
    fn upper_triangle_expands_row_by_row() {
        let table = table_from_upper(&[3.0, 5.0, 0.5]).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0], vec![None, Some(3.0), Some(5.0)]);
        assert_eq!(table[1], vec![None, None, Some(0.5)]);
        assert_eq!(table[2], vec![None, None, None]);
    }

    #[test]
    fn single_value_is_a_two_by_two_matrix() {
        let table = table_from_upper(&[7.0]).unwrap();
        assert_eq!(table, vec![vec![None, Some(7.0)], vec![None, None]]);
    }

    #[test]
    fn incomplete_triangle_is_rejected() {
        assert!(table_from_upper(&[1.0, 2.0]).is_err());
        assert!(table_from_upper(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }

    #[test]
    fn evaluate_requires_a_source() {
        let result = Cli::try_parse_from(["saaty-ahp", "evaluate"]);
        assert!(result.is_err());

        let both = Cli::try_parse_from([
            "saaty-ahp",
            "evaluate",
            "--id",
            "6f1c2a4e-8a55-4b1e-9f5e-0a7e3c2d1b90",
            "--file",
            "a.yaml",
        ]);
        assert!(both.is_err());
    }

    #[test]
    fn parses_judge_command() {
        let cli = Cli::try_parse_from([
            "saaty-ahp",
            "judge",
            "--id",
            "6f1c2a4e-8a55-4b1e-9f5e-0a7e3c2d1b90",
            "--criterion",
            "2",
            "--upper",
            "3,1/5,1/2",
        ])
        .unwrap();

        match cli.command {
            Commands::Judge(args) => {
                assert_eq!(args.criterion, Some(2));
                assert_eq!(args.upper.len(), 3);
                assert!((args.upper[1] - 0.2).abs() < 1e-12);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn zero_position_is_rejected() {
        assert!(zero_based(0, "criterion").is_err());
        assert_eq!(zero_based(1, "criterion").unwrap(), 0);
    }

    #[tokio::test]
    async fn reads_json_and_yaml_snapshot_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let snapshot = crate::domain::ahp::Hierarchy::new("Goal", 2, 2)
            .unwrap()
            .to_snapshot();

        let yaml_path = dir.path().join("decision.yaml");
        std::fs::write(&yaml_path, snapshot.to_yaml().unwrap()).unwrap();
        let json_path = dir.path().join("decision.JSON");
        std::fs::write(&json_path, snapshot.to_json().unwrap()).unwrap();

        assert_eq!(read_snapshot_file(&yaml_path).await.unwrap(), snapshot);
        assert_eq!(read_snapshot_file(&json_path).await.unwrap(), snapshot);
    }
}
