//! Assessment document - aggregate root of a risk assessment
//!
//! Holds the role/task/hazard tree and the three derived tables (risk,
//! control system, alternative method). The derived tables are rebuilt
//! wholesale from upstream data by the regeneration operations; they are
//! never merged.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::catalog::{infer_category, HazardCategory, HazardTemplate};
use crate::core::matrix::{ProbabilityLevel, SeverityLevel};
use crate::entities::alt_method::{AlternativeMethodEntry, AssessmentStatus};
use crate::entities::control::{ControlSystemEntry, ControlType, SafetyCategory};
use crate::entities::project::ProjectInfo;
use crate::entities::risk::RiskEntry;
use crate::entities::role::{HazardRecord, HazardRef, Task, UserRole, HAZARD_SEPARATOR};

/// Errors from structural operations; the document is unchanged when one is
/// returned.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum ModelError {
    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },

    #[error("Hazard name '{0}' cannot contain \" - \"")]
    #[diagnostic(help("the first \" - \" separates the hazard name from its cause"))]
    SeparatorInHazardName(String),

    #[error("User/role '{0}' already exists")]
    DuplicateRole(String),

    #[error("Task '{task}' already exists for '{role}'")]
    DuplicateTask { role: String, task: String },

    #[error("User/role not found: {0}")]
    RoleNotFound(String),

    #[error("Task '{task}' not found for '{role}'")]
    TaskNotFound { role: String, task: String },

    #[error("Hazard '{hazard}' not found under {role} / {task}")]
    HazardNotFound {
        role: String,
        task: String,
        hazard: String,
    },

    #[error("No risk entry with item ID {0}")]
    RiskEntryNotFound(u32),

    #[error("No {table} row {row} (table has {len} rows)")]
    RowOutOfRange {
        table: &'static str,
        row: usize,
        len: usize,
    },
}

/// A complete machine-safety risk assessment; the unit of save/load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentDocument {
    pub project_info: ProjectInfo,
    pub users: Vec<UserRole>,
    pub risk_entries: Vec<RiskEntry>,
    pub control_entries: Vec<ControlSystemEntry>,
    pub alt_method_entries: Vec<AlternativeMethodEntry>,
    /// Scratch text for risk reduction methods not yet transferred to a row
    pub risk_reduction_notes: String,
}

fn require_name(kind: &'static str, name: &str) -> Result<String, ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ModelError::EmptyName { kind })
    } else {
        Ok(trimmed.to_string())
    }
}

impl AssessmentDocument {
    pub fn new(project_info: ProjectInfo) -> Self {
        Self {
            project_info,
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------
    // Hazard tree
    // ------------------------------------------------------------------

    pub fn role(&self, name: &str) -> Option<&UserRole> {
        self.users.iter().find(|u| u.name == name)
    }

    fn role_mut(&mut self, name: &str) -> Result<&mut UserRole, ModelError> {
        self.users
            .iter_mut()
            .find(|u| u.name == name)
            .ok_or_else(|| ModelError::RoleNotFound(name.to_string()))
    }

    pub fn task(&self, role: &str, task: &str) -> Option<&Task> {
        self.role(role).and_then(|r| r.task(task))
    }

    fn task_mut(&mut self, role: &str, task: &str) -> Result<&mut Task, ModelError> {
        self.role_mut(role)?
            .task_mut(task)
            .ok_or_else(|| ModelError::TaskNotFound {
                role: role.to_string(),
                task: task.to_string(),
            })
    }

    pub fn add_role(&mut self, name: &str) -> Result<(), ModelError> {
        let name = require_name("User/role", name)?;
        if self.role(&name).is_some() {
            return Err(ModelError::DuplicateRole(name));
        }
        debug!(role = %name, "adding role");
        self.users.push(UserRole::new(name));
        Ok(())
    }

    pub fn rename_role(&mut self, old: &str, new: &str) -> Result<(), ModelError> {
        let new = require_name("User/role", new)?;
        if new != old && self.role(&new).is_some() {
            return Err(ModelError::DuplicateRole(new));
        }
        self.role_mut(old)?.name = new;
        Ok(())
    }

    /// Remove a role together with all its tasks and hazard records
    pub fn remove_role(&mut self, name: &str) -> Result<UserRole, ModelError> {
        let index = self
            .users
            .iter()
            .position(|u| u.name == name)
            .ok_or_else(|| ModelError::RoleNotFound(name.to_string()))?;
        let removed = self.users.remove(index);
        debug!(
            role = %name,
            tasks = removed.tasks.len(),
            hazards = removed.hazard_count(),
            "removed role"
        );
        Ok(removed)
    }

    pub fn add_task(&mut self, role: &str, name: &str) -> Result<(), ModelError> {
        let name = require_name("Task", name)?;
        let user = self.role_mut(role)?;
        if user.task(&name).is_some() {
            return Err(ModelError::DuplicateTask {
                role: role.to_string(),
                task: name,
            });
        }
        debug!(role = %role, task = %name, "adding task");
        user.tasks.push(Task::new(name));
        Ok(())
    }

    pub fn rename_task(&mut self, role: &str, old: &str, new: &str) -> Result<(), ModelError> {
        let new = require_name("Task", new)?;
        let user = self.role_mut(role)?;
        if new != old && user.task(&new).is_some() {
            return Err(ModelError::DuplicateTask {
                role: role.to_string(),
                task: new,
            });
        }
        match user.task_mut(old) {
            Some(task) => {
                task.name = new;
                Ok(())
            }
            None => Err(ModelError::TaskNotFound {
                role: role.to_string(),
                task: old.to_string(),
            }),
        }
    }

    /// Remove a task together with its hazard records
    pub fn remove_task(&mut self, role: &str, task: &str) -> Result<Task, ModelError> {
        let user = self.role_mut(role)?;
        let index = user
            .tasks
            .iter()
            .position(|t| t.name == task)
            .ok_or_else(|| ModelError::TaskNotFound {
                role: role.to_string(),
                task: task.to_string(),
            })?;
        Ok(user.tasks.remove(index))
    }

    /// Add a hazard record to a task.
    ///
    /// Returns `Ok(false)` when the same (name, cause) pair is already
    /// recorded for the task.
    pub fn add_hazard(
        &mut self,
        role: &str,
        task: &str,
        record: HazardRecord,
    ) -> Result<bool, ModelError> {
        if record.hazard_name.trim().is_empty() {
            return Err(ModelError::EmptyName { kind: "Hazard" });
        }
        if record.hazard_name.contains(HAZARD_SEPARATOR) {
            return Err(ModelError::SeparatorInHazardName(record.hazard_name));
        }
        let added = self.task_mut(role, task)?.add_hazard(record);
        debug!(role = %role, task = %task, added, "add hazard");
        Ok(added)
    }

    /// Add a hazard from its combined "name - cause" text
    pub fn add_hazard_text(&mut self, role: &str, task: &str, text: &str) -> Result<bool, ModelError> {
        self.add_hazard(role, task, HazardRecord::from_text(text))
    }

    /// Add several catalog hazards at once; returns how many were new
    pub fn add_catalog_hazards(
        &mut self,
        role: &str,
        task: &str,
        templates: &[HazardTemplate],
    ) -> Result<usize, ModelError> {
        let target = self.task_mut(role, task)?;
        let added = templates
            .iter()
            .filter(|t| target.add_hazard(HazardRecord::new(t.name, t.typical_cause)))
            .count();
        Ok(added)
    }

    pub fn remove_hazard(
        &mut self,
        role: &str,
        task: &str,
        record: &HazardRecord,
    ) -> Result<HazardRecord, ModelError> {
        let target = self.task_mut(role, task)?;
        let index = target
            .hazards
            .iter()
            .position(|h| h == record)
            .ok_or_else(|| ModelError::HazardNotFound {
                role: role.to_string(),
                task: task.to_string(),
                hazard: record.text(),
            })?;
        Ok(target.hazards.remove(index))
    }

    /// Every (role, task, hazard) triple in tree order
    pub fn hazard_refs(&self) -> Vec<HazardRef> {
        self.users
            .iter()
            .flat_map(|u| {
                u.tasks.iter().flat_map(move |t| {
                    t.hazards
                        .iter()
                        .map(move |h| HazardRef::new(u.name.clone(), t.name.clone(), h.clone()))
                })
            })
            .collect()
    }

    /// Whether a reference still points at a hazard in the tree
    pub fn resolve_ref(&self, hazard_ref: &HazardRef) -> bool {
        self.task(&hazard_ref.role, &hazard_ref.task)
            .map(|t| t.has_hazard(&hazard_ref.hazard))
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Regeneration
    // ------------------------------------------------------------------

    /// Rebuild the risk table from the hazard tree.
    ///
    /// Rows are numbered from 1 in traversal order. A row whose triple already
    /// had an entry keeps its category, scores and measures; new rows start
    /// at Serious/Likely. Rows for triples no longer in the tree are dropped.
    pub fn refresh_risk_entries(&mut self) {
        let mut previous: HashMap<HazardRef, RiskEntry> = self
            .risk_entries
            .drain(..)
            .map(|e| (e.hazard_ref(), e))
            .collect();

        let mut entries = Vec::new();
        let mut item_id = 1;
        for hazard_ref in self.hazard_refs() {
            let entry = match previous.remove(&hazard_ref) {
                Some(mut kept) => {
                    kept.item_id = item_id;
                    kept
                }
                None => {
                    let category = if hazard_ref.hazard.has_cause() {
                        infer_category(&hazard_ref.hazard.hazard_name)
                    } else {
                        HazardCategory::Other
                    };
                    RiskEntry::new(
                        item_id,
                        hazard_ref.role.clone(),
                        hazard_ref.task.clone(),
                        category,
                        &hazard_ref.hazard,
                    )
                }
            };
            entries.push(entry);
            item_id += 1;
        }

        info!(
            rows = entries.len(),
            dropped = previous.len(),
            "refreshed risk entries"
        );
        self.risk_entries = entries;
    }

    /// Replace the control-system table with one default row per risk entry
    pub fn auto_populate_control_entries(&mut self) {
        self.control_entries = self
            .risk_entries
            .iter()
            .filter(|e| e.is_complete_triple())
            .map(|e| {
                let required = SafetyCategory::required_for(e.residual_risk());
                ControlSystemEntry {
                    safety_function: format!("Control for {}", e.hazard_name),
                    associated_hazard: Some(e.hazard_ref()),
                    initial_risk: Some(e.initial_risk()),
                    final_risk: Some(e.residual_risk()),
                    required_category: required,
                    actual_category: required,
                    control_type: ControlType::Interlock,
                    verification: String::new(),
                }
            })
            .collect();
        info!(rows = self.control_entries.len(), "populated control entries");
    }

    /// Replace the alternative method table with one default row per risk entry
    pub fn auto_populate_alt_method_entries(&mut self) {
        self.alt_method_entries = self
            .risk_entries
            .iter()
            .filter(|e| e.is_complete_triple())
            .map(|e| AlternativeMethodEntry {
                task: e.task.clone(),
                associated_hazard: Some(e.hazard_ref()),
                risk_assessment_complete: AssessmentStatus::Yes,
                justification: AlternativeMethodEntry::default_justification(
                    &e.task,
                    &e.hazard_name,
                ),
                ..Default::default()
            })
            .collect();
        info!(
            rows = self.alt_method_entries.len(),
            "populated alternative method entries"
        );
    }

    // ------------------------------------------------------------------
    // Row editing
    // ------------------------------------------------------------------

    pub fn risk_entry_mut(&mut self, item_id: u32) -> Result<&mut RiskEntry, ModelError> {
        self.risk_entries
            .iter_mut()
            .find(|e| e.item_id == item_id)
            .ok_or(ModelError::RiskEntryNotFound(item_id))
    }

    pub fn set_initial(
        &mut self,
        item_id: u32,
        severity: SeverityLevel,
        probability: ProbabilityLevel,
    ) -> Result<(), ModelError> {
        let entry = self.risk_entry_mut(item_id)?;
        entry.initial_severity = severity;
        entry.initial_probability = probability;
        Ok(())
    }

    pub fn set_residual(
        &mut self,
        item_id: u32,
        severity: SeverityLevel,
        probability: ProbabilityLevel,
    ) -> Result<(), ModelError> {
        let entry = self.risk_entry_mut(item_id)?;
        entry.residual_severity = severity;
        entry.residual_probability = probability;
        Ok(())
    }

    pub fn set_measures(&mut self, item_id: u32, measures: &str) -> Result<(), ModelError> {
        self.risk_entry_mut(item_id)?.risk_reduction_measures = measures.to_string();
        Ok(())
    }

    pub fn add_control_entry(&mut self, entry: ControlSystemEntry) -> usize {
        self.control_entries.push(entry);
        self.control_entries.len()
    }

    /// Mutable access by 1-based row number
    pub fn control_entry_mut(&mut self, row: usize) -> Result<&mut ControlSystemEntry, ModelError> {
        let len = self.control_entries.len();
        row.checked_sub(1)
            .and_then(|i| self.control_entries.get_mut(i))
            .ok_or(ModelError::RowOutOfRange {
                table: "control system",
                row,
                len,
            })
    }

    pub fn remove_control_entry(&mut self, row: usize) -> Result<ControlSystemEntry, ModelError> {
        self.control_entry_mut(row)?;
        Ok(self.control_entries.remove(row - 1))
    }

    pub fn add_alt_method_entry(&mut self, entry: AlternativeMethodEntry) -> usize {
        self.alt_method_entries.push(entry);
        self.alt_method_entries.len()
    }

    /// Mutable access by 1-based row number
    pub fn alt_method_entry_mut(
        &mut self,
        row: usize,
    ) -> Result<&mut AlternativeMethodEntry, ModelError> {
        let len = self.alt_method_entries.len();
        row.checked_sub(1)
            .and_then(|i| self.alt_method_entries.get_mut(i))
            .ok_or(ModelError::RowOutOfRange {
                table: "alternative method",
                row,
                len,
            })
    }

    pub fn remove_alt_method_entry(
        &mut self,
        row: usize,
    ) -> Result<AlternativeMethodEntry, ModelError> {
        self.alt_method_entry_mut(row)?;
        Ok(self.alt_method_entries.remove(row - 1))
    }
}
