//! On-disk document layout
//!
//! Tables are stored as lists of `col_N` maps keyed by column position, and
//! hazard references as their display labels. Everything is defaulted so that
//! older or hand-edited files load with blanks instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::core::catalog::HazardCategory;
use crate::core::document::AssessmentDocument;
use crate::core::matrix::{evaluate_labels, ProbabilityLevel, RiskBand, SeverityLevel};
use crate::entities::alt_method::{AlternativeMethodEntry, AssessmentStatus};
use crate::entities::control::{ControlSystemEntry, ControlType, SafetyCategory};
use crate::entities::project::ProjectInfo;
use crate::entities::risk::RiskEntry;
use crate::entities::role::{HazardRecord, HazardRef, Task, UserRole};

pub const RISK_COLUMNS: usize = 13;
pub const CONTROL_COLUMNS: usize = 8;
pub const ALT_METHOD_COLUMNS: usize = 9;

/// Column headers of the risk table, by position
pub const RISK_HEADERS: [&str; RISK_COLUMNS] = [
    "Item ID",
    "User/Role",
    "Task",
    "Hazard Category",
    "Hazard",
    "Cause",
    "Initial Severity",
    "Initial Probability",
    "Initial Risk",
    "Risk Reduction Measures",
    "Residual Severity",
    "Residual Probability",
    "Residual Risk",
];

pub const CONTROL_HEADERS: [&str; CONTROL_COLUMNS] = [
    "Safety Function",
    "Associated Hazard",
    "Initial Risk",
    "Final Risk",
    "Required Category",
    "Actual Category",
    "Control Type",
    "Verification",
];

pub const ALT_METHOD_HEADERS: [&str; ALT_METHOD_COLUMNS] = [
    "Task",
    "Associated Hazard",
    "Risk Assessment Complete",
    "Justification",
    "Procedure",
    "Engineering Controls",
    "Training Requirements",
    "Verification Steps",
    "Approvals",
];

/// One table row as stored: `col_N` to cell value
pub type RowRecord = BTreeMap<String, Value>;

/// Deserialize a field, reading JSON `null` as the default value
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a list, reading a `null` list as empty and skipping `null`
/// elements
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().flatten().collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub task: String,
    /// Combined "name - cause" texts
    #[serde(deserialize_with = "lenient_vec")]
    pub hazards: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub user: String,
    #[serde(deserialize_with = "lenient_vec")]
    pub tasks: Vec<TaskRecord>,
}

/// The persisted form of an [`AssessmentDocument`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub project_info: ProjectInfo,
    #[serde(deserialize_with = "lenient_vec")]
    pub hazard_data: Vec<UserRecord>,
    #[serde(deserialize_with = "lenient_vec")]
    pub risk_assessment_data: Vec<RowRecord>,
    #[serde(deserialize_with = "lenient_vec")]
    pub control_system_data: Vec<RowRecord>,
    #[serde(deserialize_with = "lenient_vec")]
    pub alternative_method_data: Vec<RowRecord>,
    #[serde(deserialize_with = "null_as_default")]
    pub risk_reduction_text: String,
}

fn column_key(index: usize) -> String {
    format!("col_{}", index)
}

fn row_from_cells<const N: usize>(cells: [String; N]) -> RowRecord {
    cells
        .into_iter()
        .enumerate()
        .map(|(i, cell)| (column_key(i), Value::String(cell)))
        .collect()
}

/// Cell text; missing keys and nulls read as empty, numbers as their text
fn cell(row: &RowRecord, index: usize) -> String {
    match row.get(&column_key(index)) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn band_label(band: Option<RiskBand>) -> String {
    band.map(|b| b.label().to_string()).unwrap_or_default()
}

/// Resolves stored hazard labels, preferring triples that exist in the tree
struct RefResolver {
    live: HashMap<String, HazardRef>,
}

impl RefResolver {
    fn new(doc: &AssessmentDocument) -> Self {
        let live = doc
            .hazard_refs()
            .into_iter()
            .map(|r| (r.label(), r))
            .collect();
        Self { live }
    }

    fn resolve(&self, label: &str) -> Option<HazardRef> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        self.live
            .get(label)
            .cloned()
            .or_else(|| HazardRef::from_label(label))
    }
}

/// Cells of a risk row, by column position
pub fn risk_cells(e: &RiskEntry) -> [String; RISK_COLUMNS] {
    [
        e.item_id.to_string(),
        e.role.clone(),
        e.task.clone(),
        e.hazard_category.label().to_string(),
        e.hazard_name.clone(),
        e.cause.clone(),
        e.initial_severity.label().to_string(),
        e.initial_probability.label().to_string(),
        e.initial_risk().label().to_string(),
        e.risk_reduction_measures.clone(),
        e.residual_severity.label().to_string(),
        e.residual_probability.label().to_string(),
        e.residual_risk().label().to_string(),
    ]
}

pub fn control_cells(c: &ControlSystemEntry) -> [String; CONTROL_COLUMNS] {
    [
        c.safety_function.clone(),
        c.associated_hazard.as_ref().map(HazardRef::label).unwrap_or_default(),
        band_label(c.initial_risk),
        band_label(c.final_risk),
        c.required_category.to_string(),
        c.actual_category.to_string(),
        c.control_type.label().to_string(),
        c.verification.clone(),
    ]
}

pub fn alt_method_cells(a: &AlternativeMethodEntry) -> [String; ALT_METHOD_COLUMNS] {
    [
        a.task.clone(),
        a.associated_hazard.as_ref().map(HazardRef::label).unwrap_or_default(),
        a.risk_assessment_complete.label().to_string(),
        a.justification.clone(),
        a.procedure.clone(),
        a.engineering_controls.clone(),
        a.training_requirements.clone(),
        a.verification_steps.clone(),
        a.approvals.clone(),
    ]
}

/// Flatten a document into its stored form
pub fn to_record(doc: &AssessmentDocument) -> DocumentRecord {
    let hazard_data = doc
        .users
        .iter()
        .map(|u| UserRecord {
            user: u.name.clone(),
            tasks: u
                .tasks
                .iter()
                .map(|t| TaskRecord {
                    task: t.name.clone(),
                    hazards: t.hazards.iter().map(HazardRecord::text).collect(),
                })
                .collect(),
        })
        .collect();

    let risk_assessment_data = doc
        .risk_entries
        .iter()
        .map(|e| row_from_cells(risk_cells(e)))
        .collect();
    let control_system_data = doc
        .control_entries
        .iter()
        .map(|c| row_from_cells(control_cells(c)))
        .collect();
    let alternative_method_data = doc
        .alt_method_entries
        .iter()
        .map(|a| row_from_cells(alt_method_cells(a)))
        .collect();

    DocumentRecord {
        project_info: doc.project_info.clone(),
        hazard_data,
        risk_assessment_data,
        control_system_data,
        alternative_method_data,
        risk_reduction_text: doc.risk_reduction_notes.clone(),
    }
}

/// Rebuild a document from its stored form.
///
/// Stored risk bands (`col_8`, `col_12`) are ignored and recomputed from the
/// severity and probability cells.
pub fn from_record(record: DocumentRecord) -> AssessmentDocument {
    let mut doc = AssessmentDocument::new(record.project_info);
    doc.risk_reduction_notes = record.risk_reduction_text;

    doc.users = record
        .hazard_data
        .into_iter()
        .map(|u| UserRole {
            name: u.user,
            tasks: u
                .tasks
                .into_iter()
                .map(|t| {
                    let mut task = Task::new(t.task);
                    for text in t.hazards.iter().filter(|h| !h.trim().is_empty()) {
                        task.add_hazard(HazardRecord::from_text(text));
                    }
                    task
                })
                .collect(),
        })
        .collect();

    for (index, row) in record.risk_assessment_data.iter().enumerate() {
        for (severity, probability, band) in [(6, 7, 8), (10, 11, 12)] {
            let stored = cell(row, band);
            let computed = evaluate_labels(&cell(row, severity), &cell(row, probability));
            if !stored.trim().is_empty() && RiskBand::from_label(&stored) != Some(computed) {
                debug!(
                    row = index + 1,
                    stored = %stored,
                    computed = %computed,
                    "stored risk level differs from matrix, recomputing"
                );
            }
        }
    }

    doc.risk_entries = record
        .risk_assessment_data
        .iter()
        .enumerate()
        .map(|(index, row)| RiskEntry {
            item_id: cell(row, 0).trim().parse().unwrap_or(index as u32 + 1),
            role: cell(row, 1),
            task: cell(row, 2),
            hazard_category: HazardCategory::from_label_or_default(&cell(row, 3)),
            hazard_name: cell(row, 4),
            cause: cell(row, 5),
            initial_severity: SeverityLevel::from_label_or_default(&cell(row, 6)),
            initial_probability: ProbabilityLevel::from_label_or_default(&cell(row, 7)),
            risk_reduction_measures: cell(row, 9),
            residual_severity: SeverityLevel::from_label_or_default(&cell(row, 10)),
            residual_probability: ProbabilityLevel::from_label_or_default(&cell(row, 11)),
        })
        .collect();

    let resolver = RefResolver::new(&doc);

    doc.control_entries = record
        .control_system_data
        .iter()
        .map(|row| ControlSystemEntry {
            safety_function: cell(row, 0),
            associated_hazard: resolver.resolve(&cell(row, 1)),
            initial_risk: RiskBand::from_label(&cell(row, 2)),
            final_risk: RiskBand::from_label(&cell(row, 3)),
            required_category: SafetyCategory::from_label_or_default(&cell(row, 4)),
            actual_category: SafetyCategory::from_label_or_default(&cell(row, 5)),
            control_type: ControlType::from_label(&cell(row, 6)),
            verification: cell(row, 7),
        })
        .collect();

    doc.alt_method_entries = record
        .alternative_method_data
        .iter()
        .map(|row| AlternativeMethodEntry {
            task: cell(row, 0),
            associated_hazard: resolver.resolve(&cell(row, 1)),
            risk_assessment_complete: AssessmentStatus::from_label_or_no(&cell(row, 2)),
            justification: cell(row, 3),
            procedure: cell(row, 4),
            engineering_controls: cell(row, 5),
            training_requirements: cell(row, 6),
            verification_steps: cell(row, 7),
            approvals: cell(row, 8),
        })
        .collect();

    doc
}
