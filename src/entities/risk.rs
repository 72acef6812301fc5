//! Risk entry - one scored row per (role, task, hazard)

use serde::{Deserialize, Serialize};

use crate::core::catalog::HazardCategory;
use crate::core::matrix::{evaluate, ProbabilityLevel, RiskBand, SeverityLevel};
use crate::entities::role::{HazardRecord, HazardRef};

/// A row of the risk assessment table.
///
/// Initial and residual risk are computed from their inputs on demand and are
/// never stored, so they always agree with the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEntry {
    /// Sequential 1-based number, reassigned on every refresh
    pub item_id: u32,

    pub role: String,

    pub task: String,

    pub hazard_category: HazardCategory,

    pub hazard_name: String,

    pub cause: String,

    pub initial_severity: SeverityLevel,

    pub initial_probability: ProbabilityLevel,

    /// Free text, usually filled from the hierarchy of controls
    pub risk_reduction_measures: String,

    pub residual_severity: SeverityLevel,

    pub residual_probability: ProbabilityLevel,
}

impl RiskEntry {
    /// Fresh row with Serious/Likely for both assessments
    pub fn new(
        item_id: u32,
        role: impl Into<String>,
        task: impl Into<String>,
        hazard_category: HazardCategory,
        hazard: &HazardRecord,
    ) -> Self {
        Self {
            item_id,
            role: role.into(),
            task: task.into(),
            hazard_category,
            hazard_name: hazard.hazard_name.clone(),
            cause: hazard.cause.clone(),
            initial_severity: SeverityLevel::default(),
            initial_probability: ProbabilityLevel::default(),
            risk_reduction_measures: String::new(),
            residual_severity: SeverityLevel::default(),
            residual_probability: ProbabilityLevel::default(),
        }
    }

    pub fn initial_risk(&self) -> RiskBand {
        evaluate(self.initial_severity, self.initial_probability)
    }

    pub fn residual_risk(&self) -> RiskBand {
        evaluate(self.residual_severity, self.residual_probability)
    }

    /// The hazard record this row was generated from
    pub fn hazard(&self) -> HazardRecord {
        HazardRecord::new(self.hazard_name.clone(), self.cause.clone())
    }

    /// Key of the (role, task, hazard) triple
    pub fn hazard_ref(&self) -> HazardRef {
        HazardRef::new(self.role.clone(), self.task.clone(), self.hazard())
    }

    /// Whether the row names a role, task and hazard
    pub fn is_complete_triple(&self) -> bool {
        !self.role.is_empty() && !self.task.is_empty() && !self.hazard_name.is_empty()
    }

    /// Whether measures brought the risk down
    pub fn is_reduced(&self) -> bool {
        self.residual_risk() < self.initial_risk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> RiskEntry {
        RiskEntry::new(
            1,
            "Operator",
            "Clear jam",
            HazardCategory::Mechanical,
            &HazardRecord::new("Crushing", "Moving parts"),
        )
    }

    #[test]
    fn test_new_entry_defaults_to_serious_likely() {
        let e = entry();
        assert_eq!(e.initial_severity, SeverityLevel::Serious);
        assert_eq!(e.initial_probability, ProbabilityLevel::Likely);
        assert_eq!(e.initial_risk(), RiskBand::High);
        assert_eq!(e.residual_risk(), RiskBand::High);
        assert!(!e.is_reduced());
    }

    #[test]
    fn test_risk_follows_inputs() {
        let mut e = entry();
        e.residual_severity = SeverityLevel::Moderate;
        e.residual_probability = ProbabilityLevel::Remote;
        assert_eq!(e.residual_risk(), RiskBand::Low);
        assert!(e.is_reduced());
    }

    #[test]
    fn test_hazard_ref() {
        let e = entry();
        assert_eq!(e.hazard_ref().label(), "Operator - Clear jam - Crushing - Moving parts");
        assert!(e.is_complete_triple());
    }
}
