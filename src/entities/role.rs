//! User roles, tasks and hazard records
//!
//! The hazard tree is owned top-down: a role owns its tasks, a task owns its
//! hazard records. Removing a parent drops everything beneath it.

use serde::{Deserialize, Serialize};

/// Separator between hazard name and cause in the combined text form
pub const HAZARD_SEPARATOR: &str = " - ";

/// A hazard identified for a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HazardRecord {
    pub hazard_name: String,
    pub cause: String,
}

impl HazardRecord {
    pub fn new(hazard_name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            hazard_name: hazard_name.into(),
            cause: cause.into(),
        }
    }

    /// Parse the combined "name - cause" text.
    ///
    /// Only the first separator splits; without one the whole text is the
    /// name and the cause is empty.
    pub fn from_text(text: &str) -> Self {
        match text.split_once(HAZARD_SEPARATOR) {
            Some((name, cause)) => Self::new(name, cause),
            None => Self::new(text, ""),
        }
    }

    /// Combined text form as stored in the hazard tree
    pub fn text(&self) -> String {
        if self.cause.is_empty() {
            self.hazard_name.clone()
        } else {
            format!("{}{}{}", self.hazard_name, HAZARD_SEPARATOR, self.cause)
        }
    }

    /// Whether the stored text carried a cause
    pub fn has_cause(&self) -> bool {
        !self.cause.is_empty()
    }
}

/// A task performed by a role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub hazards: Vec<HazardRecord>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hazards: Vec::new(),
        }
    }

    pub fn has_hazard(&self, record: &HazardRecord) -> bool {
        self.hazards.contains(record)
    }

    /// Add a hazard unless the same (name, cause) pair is already present.
    /// Returns true when the record was inserted.
    pub fn add_hazard(&mut self, record: HazardRecord) -> bool {
        if self.has_hazard(&record) {
            return false;
        }
        self.hazards.push(record);
        true
    }
}

/// A user or role exposed to hazards (operator, maintenance tech...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl UserRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn task_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.name == name)
    }

    /// Number of hazard records under this role
    pub fn hazard_count(&self) -> usize {
        self.tasks.iter().map(|t| t.hazards.len()).sum()
    }
}

/// Non-owning reference to a (role, task, hazard) triple.
///
/// Control-system and alternative-method rows point at hazards through this
/// key. It never keeps anything alive; a key whose triple was deleted simply
/// stops resolving.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HazardRef {
    pub role: String,
    pub task: String,
    pub hazard: HazardRecord,
}

impl HazardRef {
    pub fn new(role: impl Into<String>, task: impl Into<String>, hazard: HazardRecord) -> Self {
        Self {
            role: role.into(),
            task: task.into(),
            hazard,
        }
    }

    /// Presentation label: "role - task - hazard text"
    pub fn label(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.role,
            self.task,
            self.hazard.text(),
            sep = HAZARD_SEPARATOR
        )
    }

    /// Best-effort parse of a label without a tree to resolve against:
    /// role and task are taken up to the first two separators.
    pub fn from_label(label: &str) -> Option<Self> {
        let (role, rest) = label.split_once(HAZARD_SEPARATOR)?;
        let (task, hazard) = rest.split_once(HAZARD_SEPARATOR)?;
        Some(Self::new(role, task, HazardRecord::from_text(hazard)))
    }
}

impl std::fmt::Display for HazardRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
