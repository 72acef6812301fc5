//! `mrt risk` command - the risk assessment table

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{load_document, print_saved, save_document, truncate_str};
use crate::cli::output::effective_format;
use crate::cli::table::Listing;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::matrix::{ProbabilityLevel, RiskBand, SeverityLevel};
use crate::core::methods::join_methods;
use crate::entities::RiskEntry;

#[derive(Subcommand, Debug)]
pub enum RiskCommands {
    /// Rebuild the risk table from the hazard tree, keeping existing scores
    Refresh,

    /// List risk entries
    List {
        /// Only entries for this role
        #[arg(long, short = 'r')]
        role: Option<String>,

        /// Only entries whose residual risk is at least this level
        #[arg(long)]
        min_residual: Option<RiskBand>,
    },

    /// Score a risk entry or record its measures
    Set(SetArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Item ID from `mrt risk list`
    pub item_id: u32,

    /// Severity before measures
    #[arg(long)]
    pub initial_severity: Option<SeverityLevel>,

    /// Probability before measures
    #[arg(long)]
    pub initial_probability: Option<ProbabilityLevel>,

    /// Severity after measures
    #[arg(long)]
    pub residual_severity: Option<SeverityLevel>,

    /// Probability after measures
    #[arg(long)]
    pub residual_probability: Option<ProbabilityLevel>,

    /// Risk reduction measures (free text)
    #[arg(long, short = 'm')]
    pub measures: Option<String>,

    /// Hierarchy-of-controls code(s), e.g. 3.2 (see `mrt catalog methods`)
    #[arg(long = "method", value_delimiter = ',')]
    pub methods: Vec<String>,

    /// Append to the existing measures instead of replacing them
    #[arg(long)]
    pub append: bool,
}

/// A risk entry with its computed levels, for structured output
#[derive(Serialize)]
struct RiskRow<'a> {
    #[serde(flatten)]
    entry: &'a RiskEntry,
    initial_risk: RiskBand,
    residual_risk: RiskBand,
}

pub fn run(cmd: RiskCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RiskCommands::Refresh => run_refresh(global),
        RiskCommands::List { role, min_residual } => run_list(role, min_residual, global),
        RiskCommands::Set(args) => run_set(args, global),
    }
}

fn run_refresh(global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let before = doc.risk_entries.len();
    doc.refresh_risk_entries();
    save_document(&path, &doc)?;

    let high = doc
        .risk_entries
        .iter()
        .filter(|e| e.residual_risk() == RiskBand::High)
        .count();
    println!(
        "{} Risk table refreshed: {} entries (was {})",
        style("✓").green(),
        doc.risk_entries.len(),
        before
    );
    if high > 0 {
        println!("  {} with High residual risk", style(high).red());
    }
    print_saved(&path);
    Ok(())
}

/// Measures after applying `--measures`, `--method` and `--append`
fn combined_measures(existing: &str, args: &SetArgs) -> Result<Option<String>> {
    let mut parts: Vec<String> = Vec::new();
    if let Some(measures) = &args.measures {
        parts.push(measures.trim().to_string());
    }
    if !args.methods.is_empty() {
        parts.push(join_methods(&args.methods)?);
    }
    parts.retain(|p| !p.is_empty());
    if parts.is_empty() {
        return Ok(None);
    }
    if args.append && !existing.trim().is_empty() {
        parts.insert(0, existing.trim().to_string());
    }
    Ok(Some(parts.join(", ")))
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let entry = doc.risk_entry_mut(args.item_id)?;

    if let Some(severity) = args.initial_severity {
        entry.initial_severity = severity;
    }
    if let Some(probability) = args.initial_probability {
        entry.initial_probability = probability;
    }
    if let Some(severity) = args.residual_severity {
        entry.residual_severity = severity;
    }
    if let Some(probability) = args.residual_probability {
        entry.residual_probability = probability;
    }
    if let Some(measures) = combined_measures(&entry.risk_reduction_measures, &args)? {
        entry.risk_reduction_measures = measures;
    }

    println!(
        "{} Item {}: initial {} / residual {}",
        style("✓").green(),
        entry.item_id,
        entry.initial_risk(),
        entry.residual_risk()
    );
    if !entry.is_reduced() && entry.residual_risk() == RiskBand::High {
        println!("  {} Residual risk is still High", style("!").yellow());
    }

    save_document(&path, &doc)?;
    print_saved(&path);
    Ok(())
}

fn run_list(role: Option<String>, min_residual: Option<RiskBand>, global: &GlobalOpts) -> Result<()> {
    let (_, doc) = load_document(global)?;
    let format = effective_format(global.output, true);

    let entries: Vec<&RiskEntry> = doc
        .risk_entries
        .iter()
        .filter(|e| role.as_ref().map_or(true, |r| e.role.eq_ignore_ascii_case(r)))
        .filter(|e| min_residual.map_or(true, |min| e.residual_risk() >= min))
        .collect();

    let records: Vec<RiskRow> = entries
        .iter()
        .map(|e| RiskRow {
            entry: e,
            initial_risk: e.initial_risk(),
            residual_risk: e.residual_risk(),
        })
        .collect();

    let width = if format == OutputFormat::Table { 28 } else { usize::MAX };
    let rows = entries
        .iter()
        .map(|e| {
            vec![
                e.item_id.to_string(),
                e.role.clone(),
                e.task.clone(),
                e.hazard_category.to_string(),
                e.hazard_name.clone(),
                truncate_str(&e.cause, width),
                e.initial_severity.to_string(),
                e.initial_probability.to_string(),
                e.initial_risk().to_string(),
                truncate_str(&e.risk_reduction_measures, width),
                e.residual_severity.to_string(),
                e.residual_probability.to_string(),
                e.residual_risk().to_string(),
            ]
        })
        .collect();

    Listing {
        headers: &[
            "ID", "ROLE", "TASK", "CATEGORY", "HAZARD", "CAUSE", "INIT SEV", "INIT PROB",
            "INIT RISK", "MEASURES", "RES SEV", "RES PROB", "RES RISK",
        ],
        rows,
        records: &records,
        empty_text: "No risk entries. Run `mrt risk refresh` after adding hazards.",
    }
    .print(format)
}
