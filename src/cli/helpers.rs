//! Shared helper functions for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::{AssessmentDocument, Config};
use crate::entities::role::HazardRef;
use crate::persist;

/// Document path from `--file`, then config, then the default name
pub fn document_path(global: &GlobalOpts) -> PathBuf {
    global
        .file
        .clone()
        .unwrap_or_else(|| Config::load().document_file())
}

/// Load the working document. Syntax errors keep their source diagnostics.
pub fn load_document(global: &GlobalOpts) -> Result<(PathBuf, AssessmentDocument)> {
    let path = document_path(global);
    if !path.exists() {
        return Err(miette::miette!(
            help = "create one with `mrt new` or pass --file",
            "No assessment file at {}",
            path.display()
        ));
    }
    let doc = persist::load(&path).map_err(miette::Report::new)?;
    Ok((path, doc))
}

pub fn save_document(path: &Path, doc: &AssessmentDocument) -> Result<()> {
    persist::save(path, doc).map_err(miette::Report::new)
}

/// Resolve a hazard given as a risk item ID or as a full
/// "role - task - hazard - cause" label of a hazard in the tree
pub fn resolve_hazard_arg(doc: &AssessmentDocument, arg: &str) -> Result<HazardRef> {
    let wanted = arg.trim();
    if let Ok(item_id) = wanted.trim_start_matches('#').parse::<u32>() {
        return doc
            .risk_entries
            .iter()
            .find(|e| e.item_id == item_id)
            .map(|e| e.hazard_ref())
            .ok_or_else(|| miette::miette!("No risk entry with item ID {}", item_id));
    }

    doc.hazard_refs()
        .into_iter()
        .find(|r| r.label() == wanted)
        .ok_or_else(|| {
            miette::miette!(
                help = "use a risk item ID from `mrt risk list` or a label from `mrt role list`",
                "Hazard not found: {}",
                wanted
            )
        })
}

/// Truncate to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Ask before a destructive change. `--yes` and non-interactive stdin skip
/// the prompt.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes || !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

pub fn print_saved(path: &Path) {
    eprintln!("{} Saved {}", style("✓").green(), path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("Überprüfung", 6), "Übe...");
    }

    #[test]
    fn test_resolve_hazard_arg() {
        let mut doc = AssessmentDocument::default();
        doc.add_role("Operator").unwrap();
        doc.add_task("Operator", "Clear jam").unwrap();
        doc.add_hazard_text("Operator", "Clear jam", "Crushing - Ram").unwrap();
        doc.refresh_risk_entries();

        let by_id = resolve_hazard_arg(&doc, "1").unwrap();
        let by_label = resolve_hazard_arg(&doc, "Operator - Clear jam - Crushing - Ram").unwrap();
        assert_eq!(by_id, by_label);
        assert!(resolve_hazard_arg(&doc, "#7").is_err());
        assert!(resolve_hazard_arg(&doc, "Operator - Clear jam - Shear").is_err());
    }
}
