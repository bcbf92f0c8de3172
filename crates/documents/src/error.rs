//! Document error types.

use thiserror::Error;

/// Errors that can occur while producing invoice documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Writing the rendered document failed.
    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),

    /// The layout produced no pages.
    #[error("Document has no pages")]
    NoPages,
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
