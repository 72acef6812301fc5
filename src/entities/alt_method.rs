//! Alternative method entry - documented exception to full lockout/tagout
//!
//! ANSI Z244.1 allows an alternative to LOTO for routine, repetitive tasks
//! when a risk assessment shows equivalent protection. Each entry records the
//! justification and the controls that make the alternative acceptable.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::entities::role::HazardRef;

/// Whether the supporting risk assessment is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssessmentStatus {
    #[default]
    Yes,
    No,
    InProgress,
}

impl AssessmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AssessmentStatus::Yes => "Yes",
            AssessmentStatus::No => "No",
            AssessmentStatus::InProgress => "In Progress",
        }
    }

    /// Lenient parse for stored rows; blank or unknown text counts as No
    pub fn from_label_or_no(s: &str) -> Self {
        s.parse().unwrap_or(AssessmentStatus::No)
    }
}

impl std::fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for AssessmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "yes" | "y" => Ok(AssessmentStatus::Yes),
            "no" | "n" => Ok(AssessmentStatus::No),
            "in progress" | "inprogress" => Ok(AssessmentStatus::InProgress),
            _ => Err(format!(
                "Unknown status: {}. Expected Yes, No or In Progress",
                s
            )),
        }
    }
}

/// A row of the alternative method table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeMethodEntry {
    pub task: String,

    /// Hazard this alternative method covers (lookup only)
    pub associated_hazard: Option<HazardRef>,

    pub risk_assessment_complete: AssessmentStatus,

    /// Why full lockout is not feasible
    pub justification: String,

    pub procedure: String,

    pub engineering_controls: String,

    pub training_requirements: String,

    pub verification_steps: String,

    pub approvals: String,
}

impl AlternativeMethodEntry {
    /// Default justification sentence for a task/hazard pair
    pub fn default_justification(task: &str, hazard: &str) -> String {
        format!(
            "LOTO not feasible for {} due to {}. Alternative method provides equivalent protection.",
            task, hazard
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("In Progress".parse::<AssessmentStatus>().unwrap(), AssessmentStatus::InProgress);
        assert_eq!("in-progress".parse::<AssessmentStatus>().unwrap(), AssessmentStatus::InProgress);
        assert_eq!(AssessmentStatus::from_label_or_no(""), AssessmentStatus::No);
        assert_eq!(AssessmentStatus::from_label_or_no("YES"), AssessmentStatus::Yes);
    }

    #[test]
    fn test_default_justification() {
        assert_eq!(
            AlternativeMethodEntry::default_justification("Clear jam", "Crushing"),
            "LOTO not feasible for Clear jam due to Crushing. Alternative method provides equivalent protection."
        );
    }
}
