//! Control-system entry - safety functions and their ISO 13849 categories

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::matrix::RiskBand;
use crate::entities::role::HazardRef;

/// Control reliability category (ISO 13849-1 / ANSI B11.26), 1 to 4.
///
/// Unrelated to the hazard category of a risk entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum SafetyCategory {
    #[default]
    Cat1,
    Cat2,
    Cat3,
    Cat4,
}

impl SafetyCategory {
    pub fn number(&self) -> u8 {
        match self {
            SafetyCategory::Cat1 => 1,
            SafetyCategory::Cat2 => 2,
            SafetyCategory::Cat3 => 3,
            SafetyCategory::Cat4 => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(SafetyCategory::Cat1),
            2 => Some(SafetyCategory::Cat2),
            3 => Some(SafetyCategory::Cat3),
            4 => Some(SafetyCategory::Cat4),
            _ => None,
        }
    }

    /// Category required for a residual risk level
    pub fn required_for(risk: RiskBand) -> Self {
        match risk {
            RiskBand::High => SafetyCategory::Cat4,
            RiskBand::Medium => SafetyCategory::Cat3,
            RiskBand::Low => SafetyCategory::Cat1,
        }
    }

    /// Acceptable range per risk level, as offered by the category calculator
    pub fn guidance(risk: RiskBand) -> (SafetyCategory, SafetyCategory) {
        match risk {
            RiskBand::High => (SafetyCategory::Cat3, SafetyCategory::Cat4),
            RiskBand::Medium => (SafetyCategory::Cat2, SafetyCategory::Cat3),
            RiskBand::Low => (SafetyCategory::Cat1, SafetyCategory::Cat1),
        }
    }

    /// Lenient parse for stored rows; bad text becomes Category 1
    pub fn from_label_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for SafetyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Category {}", self.number())
    }
}

impl FromStr for SafetyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("Category")
            .or_else(|| trimmed.strip_prefix("category"))
            .or_else(|| trimmed.strip_prefix("Cat"))
            .or_else(|| trimmed.strip_prefix("cat"))
            .unwrap_or(trimmed)
            .trim();
        digits
            .parse::<u8>()
            .ok()
            .and_then(SafetyCategory::from_number)
            .ok_or_else(|| format!("Unknown control category: {}. Expected 1-4", s))
    }
}

/// Kind of safeguarding device; open-ended through `Custom`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ControlType {
    #[default]
    Interlock,
    LightCurtain,
    EmergencyStop,
    PressureSensitiveMat,
    TwoHandControl,
    Custom(String),
}

impl ControlType {
    /// The predefined types, in the order they are offered
    pub const STANDARD: [ControlType; 5] = [
        ControlType::Interlock,
        ControlType::LightCurtain,
        ControlType::EmergencyStop,
        ControlType::PressureSensitiveMat,
        ControlType::TwoHandControl,
    ];

    pub fn label(&self) -> &str {
        match self {
            ControlType::Interlock => "Interlock",
            ControlType::LightCurtain => "Light Curtain",
            ControlType::EmergencyStop => "Emergency Stop",
            ControlType::PressureSensitiveMat => "Pressure Sensitive Mat",
            ControlType::TwoHandControl => "Two-Hand Control",
            ControlType::Custom(text) => text.as_str(),
        }
    }

    /// Parse a stored label. Blank text is the default type; anything not
    /// predefined is kept as trimmed custom text, so `Custom` never holds an
    /// empty or standard label and the stored cell reads back the same.
    pub fn from_label(s: &str) -> Self {
        let text = s.trim();
        if text.is_empty() {
            return ControlType::default();
        }
        ControlType::STANDARD
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(text))
            .cloned()
            .unwrap_or_else(|| ControlType::Custom(text.to_string()))
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A row of the control-system assessment table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSystemEntry {
    /// Safety function performed by the control system
    pub safety_function: String,

    /// Hazard this function addresses (lookup only)
    pub associated_hazard: Option<HazardRef>,

    /// Risk before measures, copied from the risk table
    pub initial_risk: Option<RiskBand>,

    /// Risk after measures, copied from the risk table
    pub final_risk: Option<RiskBand>,

    pub required_category: SafetyCategory,

    pub actual_category: SafetyCategory,

    pub control_type: ControlType,

    /// How the function is verified (test, inspection, ...)
    pub verification: String,
}

impl ControlSystemEntry {
    /// Whether the installed category meets the required one
    pub fn meets_requirement(&self) -> bool {
        self.actual_category >= self.required_category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_category_from_residual_risk() {
        assert_eq!(SafetyCategory::required_for(RiskBand::High).number(), 4);
        assert_eq!(SafetyCategory::required_for(RiskBand::Medium).number(), 3);
        assert_eq!(SafetyCategory::required_for(RiskBand::Low).number(), 1);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Category 3".parse::<SafetyCategory>().unwrap(), SafetyCategory::Cat3);
        assert_eq!("4".parse::<SafetyCategory>().unwrap(), SafetyCategory::Cat4);
        assert_eq!("cat2".parse::<SafetyCategory>().unwrap(), SafetyCategory::Cat2);
        assert!("Category 5".parse::<SafetyCategory>().is_err());
        assert_eq!(SafetyCategory::from_label_or_default(""), SafetyCategory::Cat1);
        assert_eq!(SafetyCategory::Cat2.to_string(), "Category 2");
    }

    #[test]
    fn test_control_type_labels() {
        assert_eq!(ControlType::from_label("Light Curtain"), ControlType::LightCurtain);
        assert_eq!(
            ControlType::from_label("Safety Scanner"),
            ControlType::Custom("Safety Scanner".to_string())
        );
        assert_eq!(ControlType::Custom("Custom".into()).to_string(), "Custom");
    }

    #[test]
    fn test_control_type_label_reads_back_unchanged() {
        assert_eq!(ControlType::from_label(""), ControlType::Interlock);
        assert_eq!(ControlType::from_label("  "), ControlType::Interlock);
        assert_eq!(ControlType::from_label(" interlock "), ControlType::Interlock);
        assert_eq!(
            ControlType::from_label(" Safety Scanner "),
            ControlType::Custom("Safety Scanner".to_string())
        );
        for text in ["", "interlock", "LIGHT CURTAIN", " Safety Scanner "] {
            let parsed = ControlType::from_label(text);
            assert_eq!(ControlType::from_label(parsed.label()), parsed);
        }
    }

    #[test]
    fn test_meets_requirement() {
        let mut entry = ControlSystemEntry {
            required_category: SafetyCategory::Cat3,
            actual_category: SafetyCategory::Cat2,
            ..Default::default()
        };
        assert!(!entry.meets_requirement());
        entry.actual_category = SafetyCategory::Cat4;
        assert!(entry.meets_requirement());
    }
}
