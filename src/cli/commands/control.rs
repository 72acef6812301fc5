//! `mrt control` command - control system assessment

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{
    confirm, load_document, print_saved, resolve_hazard_arg, save_document, truncate_str,
};
use crate::cli::output::{effective_format, is_structured, print_structured};
use crate::cli::table::Listing;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::matrix::RiskBand;
use crate::core::AssessmentDocument;
use crate::entities::{ControlSystemEntry, ControlType, HazardRef, SafetyCategory};

#[derive(Subcommand, Debug)]
pub enum ControlCommands {
    /// Replace the table with one default row per risk entry
    Populate {
        /// Skip confirmation when rows would be replaced
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List control system rows
    List,

    /// Add a control system row
    Add(ControlFields),

    /// Change fields of a row
    Set {
        /// Row number from `mrt control list`
        row: usize,

        #[command(flatten)]
        fields: ControlFields,
    },

    /// Remove a row
    Rm {
        row: usize,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Recommended control categories for a risk level
    Guidance {
        /// Residual risk level (High, Medium, Low)
        risk: RiskBand,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ControlFields {
    /// Safety function performed
    #[arg(long = "function")]
    pub safety_function: Option<String>,

    /// Hazard as a risk item ID or "role - task - hazard - cause"
    #[arg(long)]
    pub hazard: Option<String>,

    /// Required category (1-4)
    #[arg(long)]
    pub required: Option<SafetyCategory>,

    /// Installed category (1-4)
    #[arg(long)]
    pub actual: Option<SafetyCategory>,

    /// Control type (Interlock, Light Curtain, Emergency Stop, Pressure
    /// Sensitive Mat, Two-Hand Control, or any other text)
    #[arg(long = "type")]
    pub control_type: Option<String>,

    /// How the function is verified
    #[arg(long)]
    pub verification: Option<String>,
}

/// Point a row at a hazard, copying risk levels from its risk entry
fn attach_hazard(doc: &AssessmentDocument, entry: &mut ControlSystemEntry, hazard: HazardRef) {
    if let Some(risk) = doc.risk_entries.iter().find(|e| e.hazard_ref() == hazard) {
        entry.initial_risk = Some(risk.initial_risk());
        entry.final_risk = Some(risk.residual_risk());
    }
    entry.associated_hazard = Some(hazard);
}

fn apply_fields(
    doc: &AssessmentDocument,
    entry: &mut ControlSystemEntry,
    fields: ControlFields,
) -> Result<()> {
    if let Some(hazard) = &fields.hazard {
        let hazard_ref = resolve_hazard_arg(doc, hazard)?;
        attach_hazard(doc, entry, hazard_ref);
    }
    if let Some(function) = fields.safety_function {
        entry.safety_function = function;
    }
    if let Some(required) = fields.required {
        entry.required_category = required;
    }
    if let Some(actual) = fields.actual {
        entry.actual_category = actual;
    }
    if let Some(control_type) = fields.control_type {
        if control_type.trim().is_empty() {
            return Err(miette::miette!(
                help = "omit --type to keep the current type",
                "Control type cannot be empty"
            ));
        }
        entry.control_type = ControlType::from_label(&control_type);
    }
    if let Some(verification) = fields.verification {
        entry.verification = verification;
    }
    Ok(())
}

pub fn run(cmd: ControlCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ControlCommands::Populate { yes } => run_populate(yes, global),
        ControlCommands::List => {
            let (_, doc) = load_document(global)?;
            list(&doc, global)
        }
        ControlCommands::Add(fields) => run_add(fields, global),
        ControlCommands::Set { row, fields } => run_set(row, fields, global),
        ControlCommands::Rm { row, yes } => run_rm(row, yes, global),
        ControlCommands::Guidance { risk } => run_guidance(risk, global),
    }
}

fn run_populate(yes: bool, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let existing = doc.control_entries.len();
    if existing > 0 && !confirm(&format!("Replace {} existing control row(s)?", existing), yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    doc.auto_populate_control_entries();
    save_document(&path, &doc)?;
    println!(
        "{} Created {} control row(s) from the risk table",
        style("✓").green(),
        doc.control_entries.len()
    );
    print_saved(&path);
    Ok(())
}

fn run_add(fields: ControlFields, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let explicit_required = fields.required.is_some();
    let explicit_actual = fields.actual.is_some();

    let mut entry = ControlSystemEntry::default();
    apply_fields(&doc, &mut entry, fields)?;
    if !explicit_required {
        if let Some(final_risk) = entry.final_risk {
            entry.required_category = SafetyCategory::required_for(final_risk);
        }
    }
    if !explicit_actual {
        entry.actual_category = entry.required_category;
    }

    let row = doc.add_control_entry(entry);
    save_document(&path, &doc)?;
    println!("{} Added control row {}", style("✓").green(), row);
    print_saved(&path);
    Ok(())
}

fn run_set(row: usize, fields: ControlFields, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    let mut entry = doc.control_entry_mut(row)?.clone();
    apply_fields(&doc, &mut entry, fields)?;
    *doc.control_entry_mut(row)? = entry;

    save_document(&path, &doc)?;
    println!("{} Updated control row {}", style("✓").green(), row);
    print_saved(&path);
    Ok(())
}

fn run_rm(row: usize, yes: bool, global: &GlobalOpts) -> Result<()> {
    let (path, mut doc) = load_document(global)?;
    doc.control_entry_mut(row)?;
    if !confirm(&format!("Remove control row {}?", row), yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    doc.remove_control_entry(row)?;

    save_document(&path, &doc)?;
    println!("{} Removed control row {}", style("✓").green(), row);
    print_saved(&path);
    Ok(())
}

fn run_guidance(risk: RiskBand, global: &GlobalOpts) -> Result<()> {
    let (low, high) = SafetyCategory::guidance(risk);
    let required = SafetyCategory::required_for(risk);
    if is_structured(global.output) {
        let output = serde_json::json!({
            "risk": risk,
            "recommended": [low.number(), high.number()],
            "required": required.number(),
        });
        return print_structured(global.output, &output);
    }
    let range = if low == high {
        low.to_string()
    } else {
        format!("{} to {}", low, high)
    };
    println!("{} risk: {} recommended", risk, style(range).cyan());
    println!("Auto-populated rows use {}", required);
    Ok(())
}

fn list(doc: &AssessmentDocument, global: &GlobalOpts) -> Result<()> {
    let format = effective_format(global.output, true);
    let width = if format == OutputFormat::Table { 40 } else { usize::MAX };
    let band = |b: Option<RiskBand>| b.map(|b| b.to_string()).unwrap_or_default();

    let rows = doc
        .control_entries
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let stale = c
                .associated_hazard
                .as_ref()
                .map_or(false, |h| !doc.resolve_ref(h));
            let hazard = c
                .associated_hazard
                .as_ref()
                .map(|h| h.label())
                .unwrap_or_default();
            vec![
                (i + 1).to_string(),
                c.safety_function.clone(),
                if stale {
                    format!("{} (missing)", truncate_str(&hazard, width))
                } else {
                    truncate_str(&hazard, width)
                },
                band(c.initial_risk),
                band(c.final_risk),
                c.required_category.to_string(),
                c.actual_category.to_string(),
                if c.meets_requirement() { "yes" } else { "NO" }.to_string(),
                c.control_type.to_string(),
                c.verification.clone(),
            ]
        })
        .collect();

    Listing {
        headers: &[
            "#", "SAFETY FUNCTION", "HAZARD", "INITIAL", "FINAL", "REQUIRED", "ACTUAL", "MEETS",
            "TYPE", "VERIFICATION",
        ],
        rows,
        records: &doc.control_entries,
        empty_text: "No control system rows. Run `mrt control populate`.",
    }
    .print(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_hazard() -> AssessmentDocument {
        let mut doc = AssessmentDocument::default();
        doc.add_role("Operator").unwrap();
        doc.add_task("Operator", "Clear jam").unwrap();
        doc.add_hazard_text("Operator", "Clear jam", "Crushing - Ram").unwrap();
        doc.refresh_risk_entries();
        doc
    }

    #[test]
    fn test_empty_type_is_rejected() {
        let doc = doc_with_hazard();
        let mut entry = ControlSystemEntry {
            control_type: ControlType::LightCurtain,
            ..Default::default()
        };
        let fields = ControlFields {
            control_type: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(apply_fields(&doc, &mut entry, fields).is_err());
        assert_eq!(entry.control_type, ControlType::LightCurtain);
    }

    #[test]
    fn test_type_text_is_normalized() {
        let doc = doc_with_hazard();
        let mut entry = ControlSystemEntry::default();
        let fields = ControlFields {
            control_type: Some("light curtain".to_string()),
            hazard: Some("1".to_string()),
            ..Default::default()
        };
        apply_fields(&doc, &mut entry, fields).unwrap();
        assert_eq!(entry.control_type, ControlType::LightCurtain);
        assert_eq!(entry.final_risk, Some(RiskBand::High));
    }
}
