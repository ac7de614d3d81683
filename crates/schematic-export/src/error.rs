use thiserror::Error;

use schematic_core::ProtectionError;

/// Error types for exporting and reporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem failure while writing or reading an export, log, or report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The text is not a well-formed export envelope, or its content hash
    /// does not match its body.
    #[error("Malformed export: {0}")]
    Format(String),

    /// A required field was left empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Failure inside the protection engines.
    #[error(transparent)]
    Core(#[from] ProtectionError),
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialization(e.to_string())
    }
}
