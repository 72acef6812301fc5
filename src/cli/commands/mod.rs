//! CLI command implementations

pub mod alt;
pub mod catalog;
pub mod completions;
pub mod control;
pub mod hazard;
pub mod info;
pub mod matrix;
pub mod new;
pub mod report;
pub mod risk;
pub mod role;
pub mod task;
pub mod validate;
