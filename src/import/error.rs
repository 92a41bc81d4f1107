//! Error types for the import workflow

use thiserror::Error;

/// Failures surfaced by the import workflow.
///
/// Every variant is recovered by the controller and rendered as a one-line
/// error status; the `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// File name does not end in `.json`; rejected before reading
    #[error("Please select a JSON file.")]
    UnsupportedFormat { file_name: String },

    /// The file handle could not produce its text content
    #[error("Failed to process file: {0}")]
    Unreadable(String),

    /// Content is not valid JSON
    #[error("Failed to process file: {0}")]
    MalformedPayload(String),

    /// Valid JSON, but no usable `sessions` array
    #[error("Failed to process file: Invalid file format: {0}")]
    InvalidSchema(String),

    /// Submit was requested with nothing loaded
    #[error("No file selected")]
    NoFileSelected,

    /// The gateway rejected the import or could not be reached
    #[error("Import failed: {0}")]
    GatewayFailure(String),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::MalformedPayload(err.to_string())
    }
}
