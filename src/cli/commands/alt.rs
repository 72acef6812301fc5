//! `mrt alt` command - alternative methods to lockout/tagout

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    confirm, load_document, print_saved, resolve_hazard_arg, save_document, truncate_str,
};
use crate::cli::output::effective_format;
use crate::cli::table::Listing;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::AssessmentDocument;
use crate::entities::{AlternativeMethodEntry, AssessmentStatus};

#[derive(Subcommand, Debug)]
pub enum AltCommands {
    /// Replace the table with one default row per risk entry
    Populate {
        /// Skip confirmation when rows would be replaced
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List alternative method rows
    List,

    /// Add an alternative method row
    Add(AltFields),

    /// Change fields of a row
    Set {
        /// Row number from `mrt alt list`
        row: usize,

        #[command(flatten)]
        fields: AltFields,
    },

    /// Remove a row
    Rm {
        row: usize,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct AltFields {
    /// Task the method applies to [default: the hazard's task]
    #[arg(long)]
    pub task: Option<String>,

    /// Hazard as a risk item ID or "role - task - hazard - cause"
    #[arg(long)]
    pub hazard: Option<String>,

    /// Risk assessment complete (Yes, No, In Progress)
    #[arg(long)]
    pub complete: Option<AssessmentStatus>,

    /// Why full lockout/tagout is not feasible
    #[arg(long)]
    pub justification: Option<String>,

    /// Alternative procedure
    #[arg(long)]
    pub procedure: Option<String>,

    /// Engineering controls providing protection
    #[arg(long)]
    pub controls: Option<String>,

    #[arg(long)]
    pub training: Option<String>,

    #[arg(long)]
    pub verification: Option<String>,

    #[arg(long)]
    pub approvals: Option<String>,
}

fn apply_fields(
    doc: &AssessmentDocument,
    entry: &mut AlternativeMethodEntry,
    fields: AltFields,
) -> Result<()> {
    if let Some(hazard) = &fields.hazard {
        let hazard_ref = resolve_hazard_arg(doc, hazard)?;
        if fields.task.is_none() && entry.task.trim().is_empty() {
            entry.task = hazard_ref.task.clone();
        }
        entry.associated_hazard = Some(hazard_ref);
    }
    if let Some(task) = fields.task {
        entry.task = task;
    }
    if let Some(status) = fields.complete {
        entry.risk_assessment_complete = status;
    }
    if let Some(justification) = fields.justification {
        entry.justification = justification;
    }
    if let Some(procedure) = fields.procedure {
        entry.procedure = procedure;
    }
    if let Some(controls) = fields.controls {
        entry.engineering_controls = controls;
    }
    if let Some(training) = fields.training {
        entry.training_requirements = training;
    }
    if let Some(verification) = fields.verification {
        entry.verification_steps = verification;
    }
    if let Some(approvals) = fields.approvals {
        entry.approvals = approvals;
    }
    Ok(())
}

pub fn run(cmd: AltCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AltCommands::Populate { yes } => run_populate(yes, global),
        AltCommands::List => {
            let (_, doc) = load_document(global)?;
            list(&doc, global)
        }
        AltCommands::Add(fields) => run_add(fields, global),
        AltCommands::Set { row, fields } => run_set(row, fields, global),
        AltCommands::Rm { row, yes } => run_rm(row, yes, global),
    }
}

fn run_populate(yes: bool, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let existing = doc.alt_method_entries.len();
    if existing > 0
        && !confirm(&format!("Replace {} existing alternative method row(s)?", existing), yes)?
    {
        println!("Cancelled.");
        return Ok(());
    }
    doc.auto_populate_alt_method_entries();
    save_document(&path, &doc)?;
    println!(
        "{} Created {} alternative method row(s) from the risk table",
        style("✓").green(),
        doc.alt_method_entries.len()
    );
    println!("Fill in procedures and controls, then run `mrt validate`.");
    print_saved(&path);
    Ok(())
}

fn run_add(fields: AltFields, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let mut entry = AlternativeMethodEntry::default();
    apply_fields(&doc, &mut entry, fields)?;

    let row = doc.add_alt_method_entry(entry);
    save_document(&path, &doc)?;
    println!("{} Added alternative method row {}", style("✓").green(), row);
    print_saved(&path);
    Ok(())
}

fn run_set(row: usize, fields: AltFields, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let mut entry = doc.alt_method_entry_mut(row)?.clone();
    apply_fields(&doc, &mut entry, fields)?;
    *doc.alt_method_entry_mut(row)? = entry;

    save_document(&path, &doc)?;
    println!("{} Updated alternative method row {}", style("✓").green(), row);
    print_saved(&path);
    Ok(())
}

fn run_rm(row: usize, yes: bool, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    doc.alt_method_entry_mut(row)?;
    if !confirm(&format!("Remove alternative method row {}?", row), yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    doc.remove_alt_method_entry(row)?;

    save_document(&path, &doc)?;
    println!("{} Removed alternative method row {}", style("✓").green(), row);
    print_saved(&path);
    Ok(())
}

fn list(doc: &AssessmentDocument, global: &GlobalOpts) -> Result<()> {
    let format = effective_format(global.output, true);
    let width = if format == OutputFormat::Table { 32 } else { usize::MAX };

    let rows = doc
        .alt_method_entries
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let hazard = a
                .associated_hazard
                .as_ref()
                .map(|h| h.label())
                .unwrap_or_default();
            vec![
                (i + 1).to_string(),
                a.task.clone(),
                truncate_str(&hazard, width),
                a.risk_assessment_complete.to_string(),
                truncate_str(&a.justification, width),
                truncate_str(&a.procedure, width),
                truncate_str(&a.engineering_controls, width),
                truncate_str(&a.training_requirements, width),
                truncate_str(&a.verification_steps, width),
                truncate_str(&a.approvals, width),
            ]
        })
        .collect();

    Listing {
        headers: &[
            "#", "TASK", "HAZARD", "COMPLETE", "JUSTIFICATION", "PROCEDURE", "CONTROLS",
            "TRAINING", "VERIFICATION", "APPROVALS",
        ],
        rows,
        records: &doc.alt_method_entries,
        empty_text: "No alternative method rows. Run `mrt alt populate`.",
    }
    .print(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_hazard() -> AssessmentDocument {
        let mut doc = AssessmentDocument::default();
        doc.add_role("Maintenance").unwrap();
        doc.add_task("Maintenance", "Change die").unwrap();
        doc.add_hazard_text("Maintenance", "Change die", "Crushing - Ram drift")
            .unwrap();
        doc.refresh_risk_entries();
        doc
    }

    #[test]
    fn test_task_defaults_to_hazard_task() {
        let doc = doc_with_hazard();
        let mut entry = AlternativeMethodEntry::default();
        let fields = AltFields {
            hazard: Some("1".to_string()),
            ..Default::default()
        };
        apply_fields(&doc, &mut entry, fields).unwrap();
        assert_eq!(entry.task, "Change die");
        assert_eq!(
            entry.associated_hazard.as_ref().map(|h| h.hazard.hazard_name.as_str()),
            Some("Crushing")
        );
    }

    #[test]
    fn test_explicit_task_wins() {
        let doc = doc_with_hazard();
        let mut entry = AlternativeMethodEntry::default();
        let fields = AltFields {
            task: Some("Adjust feed".to_string()),
            hazard: Some("1".to_string()),
            complete: Some(AssessmentStatus::InProgress),
            ..Default::default()
        };
        apply_fields(&doc, &mut entry, fields).unwrap();
        assert_eq!(entry.task, "Adjust feed");
        assert_eq!(entry.risk_assessment_complete, AssessmentStatus::InProgress);
    }
}
