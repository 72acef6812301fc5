//! Document saving and atomic file replacement

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use crate::core::document::AssessmentDocument;
use crate::persist::diagnostics::PersistError;
use crate::persist::format::to_record;

/// Pretty-printed document JSON
pub fn to_json_string(doc: &AssessmentDocument) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&to_record(doc))?)
}

/// Write `bytes` to `path` through a temp file in the same directory.
///
/// The target is either fully replaced or left untouched; the temp file is
/// removed when anything fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistError::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| PersistError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PersistError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| PersistError::io(path, e.error))?;
    Ok(())
}

/// Save a document as JSON
pub fn save(path: &Path, doc: &AssessmentDocument) -> Result<(), PersistError> {
    let json = to_json_string(doc)?;
    write_atomic(path, json.as_bytes())?;
    info!(
        path = %path.display(),
        risk_rows = doc.risk_entries.len(),
        "saved assessment"
    );
    Ok(())
}
