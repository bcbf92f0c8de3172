//! Projection error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building read-side views.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// A date range whose start is after its end.
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
