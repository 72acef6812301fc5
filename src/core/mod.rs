//! Core module - scoring, catalogs, the document model and its checks

pub mod catalog;
pub mod compliance;
pub mod config;
pub mod document;
pub mod matrix;
pub mod methods;

pub use catalog::{infer_category, CategoryView, HazardCategory, HazardTemplate};
pub use compliance::{validate, validate_document, ValidationOutcome, ValidationReport};
pub use config::{Config, ConfigError};
pub use document::{AssessmentDocument, ModelError};
pub use matrix::{evaluate, ProbabilityLevel, RiskBand, SeverityLevel};
pub use methods::MethodError;
