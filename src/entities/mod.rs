//! Entity type definitions

pub mod alt_method;
pub mod control;
pub mod project;
pub mod risk;
pub mod role;

pub use alt_method::{AlternativeMethodEntry, AssessmentStatus};
pub use control::{ControlSystemEntry, ControlType, SafetyCategory};
pub use project::ProjectInfo;
pub use risk::RiskEntry;
pub use role::{HazardRecord, HazardRef, Task, UserRole};
