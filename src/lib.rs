//! MRT: Machine Risk Toolkit
//!
//! Machine safety risk assessment per ANSI B11.0, with control system
//! categories and ANSI Z244.1 alternative methods to lockout/tagout. An
//! assessment is a single JSON document edited through the `mrt` CLI.

pub mod cli;
pub mod core;
pub mod entities;
pub mod persist;
pub mod report;
