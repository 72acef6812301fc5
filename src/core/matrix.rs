//! Risk matrix - severity x probability scoring
//!
//! A fixed 4x4 two-factor matrix (ANSI B11.0 TR3 style). The same evaluator
//! scores both the initial risk (before measures) and the residual risk
//! (after measures) of every risk entry.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Coarse outcome of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// Display label as written in saved documents
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Medium => "Medium",
            RiskBand::High => "High",
        }
    }

    /// Parse a stored label, `None` for empty or unknown text
    pub fn from_label(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for RiskBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskBand::Low),
            "medium" => Ok(RiskBand::Medium),
            "high" => Ok(RiskBand::High),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

/// Severity of harm, most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SeverityLevel {
    /// Death or permanent disabling injury
    Catastrophic,
    /// Severe injury, normally reversible
    #[default]
    Serious,
    /// Significant injury requiring more than first aid
    Moderate,
    /// No injury or first aid only
    Minor,
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 4] = [
        SeverityLevel::Catastrophic,
        SeverityLevel::Serious,
        SeverityLevel::Moderate,
        SeverityLevel::Minor,
    ];

    /// Row index in the matrix (0 = Catastrophic)
    pub fn rank(&self) -> usize {
        match self {
            SeverityLevel::Catastrophic => 0,
            SeverityLevel::Serious => 1,
            SeverityLevel::Moderate => 2,
            SeverityLevel::Minor => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeverityLevel::Catastrophic => "Catastrophic",
            SeverityLevel::Serious => "Serious",
            SeverityLevel::Moderate => "Moderate",
            SeverityLevel::Minor => "Minor",
        }
    }

    /// Lenient parse used for stored rows: unknown or blank text falls back
    /// to Serious (rank 1).
    pub fn from_label_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SeverityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "catastrophic" => Ok(SeverityLevel::Catastrophic),
            "serious" => Ok(SeverityLevel::Serious),
            "moderate" => Ok(SeverityLevel::Moderate),
            "minor" => Ok(SeverityLevel::Minor),
            _ => Err(format!(
                "Unknown severity: {}. Expected Catastrophic, Serious, Moderate or Minor",
                s
            )),
        }
    }
}

/// Probability of occurrence, most to least likely
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProbabilityLevel {
    VeryLikely,
    #[default]
    Likely,
    Unlikely,
    Remote,
}

impl ProbabilityLevel {
    pub const ALL: [ProbabilityLevel; 4] = [
        ProbabilityLevel::VeryLikely,
        ProbabilityLevel::Likely,
        ProbabilityLevel::Unlikely,
        ProbabilityLevel::Remote,
    ];

    /// Column index in the matrix (0 = Very Likely)
    pub fn rank(&self) -> usize {
        match self {
            ProbabilityLevel::VeryLikely => 0,
            ProbabilityLevel::Likely => 1,
            ProbabilityLevel::Unlikely => 2,
            ProbabilityLevel::Remote => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbabilityLevel::VeryLikely => "Very Likely",
            ProbabilityLevel::Likely => "Likely",
            ProbabilityLevel::Unlikely => "Unlikely",
            ProbabilityLevel::Remote => "Remote",
        }
    }

    /// Lenient parse used for stored rows: unknown or blank text falls back
    /// to Likely (rank 1).
    pub fn from_label_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ProbabilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProbabilityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "very likely" | "verylikely" => Ok(ProbabilityLevel::VeryLikely),
            "likely" => Ok(ProbabilityLevel::Likely),
            "unlikely" => Ok(ProbabilityLevel::Unlikely),
            "remote" => Ok(ProbabilityLevel::Remote),
            _ => Err(format!(
                "Unknown probability: {}. Expected Very Likely, Likely, Unlikely or Remote",
                s
            )),
        }
    }
}

use RiskBand::{High as H, Low as L, Medium as M};

/// Rows indexed by severity rank, columns by probability rank
const MATRIX: [[RiskBand; 4]; 4] = [
    [H, H, H, M],
    [H, H, M, L],
    [H, M, L, L],
    [M, L, L, L],
];

/// Score a severity/probability pair
pub fn evaluate(severity: SeverityLevel, probability: ProbabilityLevel) -> RiskBand {
    MATRIX[severity.rank()][probability.rank()]
}

/// Score stored labels, falling back to Serious/Likely for anything unknown
pub fn evaluate_labels(severity: &str, probability: &str) -> RiskBand {
    evaluate(
        SeverityLevel::from_label_or_default(severity),
        ProbabilityLevel::from_label_or_default(probability),
    )
}

/// The whole table, severity-major, for display
pub fn matrix_rows() -> Vec<(SeverityLevel, [RiskBand; 4])> {
    SeverityLevel::ALL
        .iter()
        .map(|s| (*s, MATRIX[s.rank()]))
        .collect()
}
