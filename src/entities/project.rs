//! Project information - header data of an assessment

use serde::{Deserialize, Serialize};

use crate::persist::format::null_as_default;

/// Descriptive metadata for the machine under assessment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    /// Assessment name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Free-text description of the assessment scope
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    /// Company name
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,

    /// Facility location
    #[serde(deserialize_with = "null_as_default")]
    pub facility: String,

    /// Machine or product identifier
    #[serde(deserialize_with = "null_as_default")]
    pub machine_id: String,

    /// Lifecycle stage (design, commissioning, modification...)
    #[serde(deserialize_with = "null_as_default")]
    pub lifecycle_stage: String,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Title used by reports, falling back to "N/A" like the report header
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "N/A"
        } else {
            &self.name
        }
    }
}
