//! Alternative method compliance checks (ANSI Z244.1)
//!
//! Each alternative method row must be fully documented before the method can
//! replace lockout/tagout. Missing fields are critical issues; incomplete
//! assessments and suspiciously short text are warnings.

use serde::Serialize;

use crate::core::document::AssessmentDocument;
use crate::entities::alt_method::{AlternativeMethodEntry, AssessmentStatus};

/// Justifications shorter than this (in characters) are flagged
pub const MIN_JUSTIFICATION_CHARS: usize = 20;

/// Procedures shorter than this (in characters) are flagged
pub const MIN_PROCEDURE_CHARS: usize = 30;

/// Requirement reminders appended to every rendered report
pub const Z244_REQUIREMENTS: [&str; 6] = [
    "All alternative methods must have complete documentation",
    "Risk assessment must be completed before implementing A/M",
    "Engineering controls must be specified",
    "Training requirements must be documented",
    "Verification steps must be established",
    "Management approval must be obtained",
];

/// Findings for a non-empty set of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub critical_issues: Vec<String>,
    pub warnings: Vec<String>,
}

/// Result of a validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// There were no alternative method rows to check
    NothingToValidate,
    Checked(ValidationReport),
}

impl ValidationOutcome {
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            ValidationOutcome::NothingToValidate => None,
            ValidationOutcome::Checked(report) => Some(report),
        }
    }
}

impl ValidationReport {
    /// No critical issues; warnings do not block compliance
    pub fn is_compliant(&self) -> bool {
        self.critical_issues.is_empty()
    }

    /// Plain-text report as shown to the analyst
    pub fn render(&self) -> String {
        let mut out = String::from("Alternative Method Validation Report\n");
        out.push_str(&"=".repeat(40));
        out.push_str("\n\n");

        if !self.critical_issues.is_empty() {
            out.push_str("CRITICAL ISSUES:\n");
            for issue in &self.critical_issues {
                out.push_str(&format!("  - {}\n", issue));
            }
            out.push('\n');
        }

        if !self.warnings.is_empty() {
            out.push_str("WARNINGS:\n");
            for warning in &self.warnings {
                out.push_str(&format!("  - {}\n", warning));
            }
            out.push('\n');
        }

        if self.critical_issues.is_empty() && self.warnings.is_empty() {
            out.push_str("All alternative methods are compliant!\n\n");
        }

        out.push_str("ANSI Z244.1 Requirements:\n");
        for requirement in Z244_REQUIREMENTS {
            out.push_str(&format!("  - {}\n", requirement));
        }
        out
    }
}

fn missing(text: &str) -> bool {
    text.trim().is_empty()
}

fn check_entry(row: usize, entry: &AlternativeMethodEntry, report: &mut ValidationReport) {
    let required: [(&str, bool); 8] = [
        ("Missing Task", missing(&entry.task)),
        ("Missing Associated Hazard", entry.associated_hazard.is_none()),
        (
            "Missing Justification for Alternative Method",
            missing(&entry.justification),
        ),
        ("Missing Procedure", missing(&entry.procedure)),
        ("Missing Engineering Controls", missing(&entry.engineering_controls)),
        ("Missing Training Requirements", missing(&entry.training_requirements)),
        ("Missing Verification Steps", missing(&entry.verification_steps)),
        ("Missing Approvals", missing(&entry.approvals)),
    ];
    for (message, failed) in required {
        if failed {
            report.critical_issues.push(format!("Row {}: {}", row, message));
        }
    }

    if entry.risk_assessment_complete != AssessmentStatus::Yes {
        report
            .warnings
            .push(format!("Row {}: Risk Assessment not marked as complete", row));
    }

    let justification = entry.justification.trim();
    if !justification.is_empty() && justification.chars().count() < MIN_JUSTIFICATION_CHARS {
        report
            .warnings
            .push(format!("Row {}: Justification may be too brief", row));
    }

    let procedure = entry.procedure.trim();
    if !procedure.is_empty() && procedure.chars().count() < MIN_PROCEDURE_CHARS {
        report
            .warnings
            .push(format!("Row {}: Procedure may be too brief", row));
    }
}

/// Check alternative method rows. Rows are numbered from 1.
pub fn validate(entries: &[AlternativeMethodEntry]) -> ValidationOutcome {
    if entries.is_empty() {
        return ValidationOutcome::NothingToValidate;
    }

    let mut report = ValidationReport::default();
    for (index, entry) in entries.iter().enumerate() {
        check_entry(index + 1, entry, &mut report);
    }
    ValidationOutcome::Checked(report)
}

/// Check the document's alternative methods, also flagging rows whose hazard
/// was removed from the hazard tree
pub fn validate_document(doc: &AssessmentDocument) -> ValidationOutcome {
    let mut outcome = validate(&doc.alt_method_entries);
    if let ValidationOutcome::Checked(report) = &mut outcome {
        for (index, entry) in doc.alt_method_entries.iter().enumerate() {
            if let Some(hazard_ref) = &entry.associated_hazard {
                if !doc.resolve_ref(hazard_ref) {
                    report.warnings.push(format!(
                        "Row {}: Associated Hazard no longer exists in hazard tree",
                        index + 1
                    ));
                }
            }
        }
    }
    tracing::info!(
        rows = doc.alt_method_entries.len(),
        compliant = outcome.report().map(|r| r.is_compliant()),
        "validated alternative methods"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::role::{HazardRecord, HazardRef};

    fn complete_entry() -> AlternativeMethodEntry {
        AlternativeMethodEntry {
            task: "Clear jam".to_string(),
            associated_hazard: Some(HazardRef::new(
                "Operator",
                "Clear jam",
                HazardRecord::new("Crushing", "Moving parts"),
            )),
            risk_assessment_complete: AssessmentStatus::Yes,
            justification: "Production requires frequent jam clearing".to_string(),
            procedure: "Stop cycle, open interlocked guard, clear jam with tool".to_string(),
            engineering_controls: "Interlocked guard, Category 3".to_string(),
            training_requirements: "Annual jam clearing training".to_string(),
            verification_steps: "Daily interlock function test".to_string(),
            approvals: "Plant manager".to_string(),
        }
    }

    #[test]
    fn test_empty_input_has_nothing_to_validate() {
        assert_eq!(validate(&[]), ValidationOutcome::NothingToValidate);
    }

    #[test]
    fn test_complete_entry_is_compliant() {
        let outcome = validate(&[complete_entry()]);
        let report = outcome.report().unwrap();
        assert!(report.critical_issues.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.is_compliant());
        assert!(report.render().contains("All alternative methods are compliant!"));
    }

    #[test]
    fn test_blank_entry_reports_every_missing_field() {
        let entry = AlternativeMethodEntry {
            risk_assessment_complete: AssessmentStatus::No,
            ..Default::default()
        };
        let outcome = validate(&[complete_entry(), entry]);
        let report = outcome.report().unwrap();
        assert_eq!(
            report.critical_issues,
            vec![
                "Row 2: Missing Task",
                "Row 2: Missing Associated Hazard",
                "Row 2: Missing Justification for Alternative Method",
                "Row 2: Missing Procedure",
                "Row 2: Missing Engineering Controls",
                "Row 2: Missing Training Requirements",
                "Row 2: Missing Verification Steps",
                "Row 2: Missing Approvals",
            ]
        );
        assert_eq!(
            report.warnings,
            vec!["Row 2: Risk Assessment not marked as complete"]
        );
        assert!(!report.is_compliant());
    }

    #[test]
    fn test_brief_text_warnings() {
        let mut entry = complete_entry();
        entry.justification = "Too frequent".to_string();
        entry.procedure = "Open guard".to_string();
        entry.risk_assessment_complete = AssessmentStatus::InProgress;
        let outcome = validate(&[entry]);
        let report = outcome.report().unwrap();
        assert!(report.is_compliant());
        assert_eq!(
            report.warnings,
            vec![
                "Row 1: Risk Assessment not marked as complete",
                "Row 1: Justification may be too brief",
                "Row 1: Procedure may be too brief",
            ]
        );
    }

    #[test]
    fn test_lengths_count_characters() {
        let mut entry = complete_entry();
        // 19 characters but more than 20 bytes
        entry.justification = "Überprüfung nötig!!".to_string();
        assert_eq!(entry.justification.chars().count(), 19);
        assert!(entry.justification.len() > 20);
        let outcome = validate(&[entry]);
        assert!(outcome
            .report()
            .unwrap()
            .warnings
            .contains(&"Row 1: Justification may be too brief".to_string()));
    }

    #[test]
    fn test_render_lists_requirements() {
        let outcome = validate(&[AlternativeMethodEntry::default()]);
        let text = outcome.report().unwrap().render();
        assert!(text.starts_with("Alternative Method Validation Report"));
        assert!(text.contains("CRITICAL ISSUES:"));
        assert!(text.contains("Management approval must be obtained"));
    }

    #[test]
    fn test_stale_reference_warning() {
        let mut doc = AssessmentDocument::default();
        doc.add_role("Operator").unwrap();
        doc.add_task("Operator", "Clear jam").unwrap();
        doc.add_hazard_text("Operator", "Clear jam", "Crushing - Moving parts")
            .unwrap();
        doc.alt_method_entries.push(complete_entry());

        let fresh = validate_document(&doc);
        assert!(fresh.report().unwrap().warnings.is_empty());

        doc.remove_task("Operator", "Clear jam").unwrap();
        let stale = validate_document(&doc);
        assert_eq!(
            stale.report().unwrap().warnings,
            vec!["Row 1: Associated Hazard no longer exists in hazard tree"]
        );
    }
}
