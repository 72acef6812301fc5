//! Load/save errors with source-annotated diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// A document file that is not valid JSON, or not a JSON object
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid assessment file: {message}")]
#[diagnostic(
    code(mrt::persist::syntax),
    help("The file must be a JSON object as written by `mrt`; fix the marked position or restore a backup")
)]
pub struct JsonSyntaxError {
    #[source_code]
    pub src: NamedSource<String>,

    #[label("{message}")]
    pub span: SourceSpan,

    pub message: String,
}

impl JsonSyntaxError {
    /// Build a diagnostic pointing at the position serde_json reported
    pub fn from_serde_error(err: &serde_json::Error, content: &str, filename: &str) -> Self {
        let offset = byte_offset(content, err.line(), err.column());
        let len = content[offset..].chars().next().map_or(0, char::len_utf8);
        Self {
            src: NamedSource::new(filename, content.to_string()),
            span: SourceSpan::new(offset.into(), len),
            message: strip_position(&err.to_string()),
        }
    }
}

/// Convert serde_json's 1-based line/column into a byte offset, clamped to
/// the content and to a char boundary
fn byte_offset(content: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return content.len();
    }
    let line_start: usize = content
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// serde_json appends " at line L column C"; the span already shows that
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum PersistError {
    #[error("Failed to access {path}: {source}")]
    #[diagnostic(code(mrt::persist::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(Box<JsonSyntaxError>),

    #[error("Failed to serialize assessment: {0}")]
    #[diagnostic(code(mrt::persist::serialize))]
    Serialize(#[from] serde_json::Error),
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, PersistError::Syntax(_))
    }
}
