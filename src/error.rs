//! Structured error types for the Tabula table engine.
//!
//! Every error is raised at the point of misuse and propagates straight to
//! the caller. Nothing is retried and partially rendered documents are not
//! rolled back.

use thiserror::Error;

/// The unified error type returned by all public Tabula API functions.
#[derive(Debug, Error)]
pub enum TableError {
    /// A row or column index lies outside the current grid.
    #[error("Cell ({row}, {col}) is out of range for a {rows}x{columns} table")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        columns: usize,
    },

    /// A merge was requested with its start after its end.
    #[error(
        "Invalid merge range ({start_row}, {start_col})..=({end_row}, {end_col}): start must not be after end"
    )]
    InvalidRange {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    },

    /// A custom font payload could not be decoded or parsed.
    #[error("Invalid font data: {0}")]
    InvalidFontData(String),

    /// An image payload is not a decodable PNG.
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// Negative coordinates were passed to an embedding operation.
    #[error("Invalid coordinates ({x}, {y}): embedding coordinates must not be negative")]
    InvalidCoordinate { x: f64, y: f64 },

    /// Table merging needs at least two input tables.
    #[error("At least two tables are required for merging, got {0}")]
    NotEnoughTables(usize),

    /// A template was requested by a name that was never registered.
    #[error("Template \"{0}\" not found")]
    TemplateNotFound(String),

    /// A template is structurally unusable (for example it has no name).
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// JSON input failed to parse.
    #[error("Failed to parse JSON: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Serializing the document failed.
    #[error("Render error: {0}")]
    Render(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        TableError::Parse { source: e, hint }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;
