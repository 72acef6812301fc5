//! Document persistence - JSON load/save

pub mod diagnostics;
pub mod format;
pub mod parser;
pub mod writer;

pub use diagnostics::{JsonSyntaxError, PersistError};
pub use format::{
    alt_method_cells, control_cells, from_record, risk_cells, to_record, DocumentRecord,
    ALT_METHOD_HEADERS, CONTROL_HEADERS, RISK_HEADERS,
};
pub use parser::{load, parse_document};
pub use writer::{save, to_json_string, write_atomic};
