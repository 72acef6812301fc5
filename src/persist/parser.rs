//! Document loading

use std::path::Path;
use tracing::info;

use crate::core::document::AssessmentDocument;
use crate::persist::diagnostics::{JsonSyntaxError, PersistError};
use crate::persist::format::{from_record, DocumentRecord};

/// Parse document JSON. `filename` only labels diagnostics.
pub fn parse_document(content: &str, filename: &str) -> Result<AssessmentDocument, PersistError> {
    let record: DocumentRecord = serde_json::from_str(content).map_err(|e| {
        PersistError::Syntax(Box::new(JsonSyntaxError::from_serde_error(
            &e, content, filename,
        )))
    })?;
    Ok(from_record(record))
}

/// Load a document from disk
pub fn load(path: &Path) -> Result<AssessmentDocument, PersistError> {
    let content = std::fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
    let doc = parse_document(&content, &path.display().to_string())?;
    info!(
        path = %path.display(),
        roles = doc.users.len(),
        risk_rows = doc.risk_entries.len(),
        "loaded assessment"
    );
    Ok(doc)
}
