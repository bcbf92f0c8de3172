//! Session and backend error types.

use common::InvoiceId;
use thiserror::Error;

/// Shown when the backend could not be reached.
pub const NETWORK_FAILURE_MESSAGE: &str =
    "Could not reach the server. Please check your connection and try again.";

/// Shown when the backend rejected a request without explaining why.
pub const GENERIC_FAILURE_MESSAGE: &str = "The request failed. Please try again.";

/// Shown when the session must be re-established.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// A request rejected locally, before anything is sent to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a table first")]
    NoTableSelected,

    #[error("Please add items to the order")]
    EmptyCart,

    /// The cart belongs to a saved table order, which is finalised with `complete`.
    #[error("Order {0} is already saved for this table; complete it instead")]
    PendingOrderLoaded(InvoiceId),
}

/// Failures reported by a [`PosBackend`](crate::PosBackend).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The request did not reach the backend or the backend failed internally.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend refused the request on business grounds.
    #[error("Request rejected ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Conflict { status: u16, detail: Option<String> },

    /// Missing, expired or insufficient credentials.
    #[error("Not authorized: {}", .detail.as_deref().unwrap_or("session expired"))]
    Auth { detail: Option<String> },

    /// The backend answered with something that could not be understood.
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Returns true if re-authentication is required.
    pub fn is_auth(&self) -> bool {
        matches!(self, BackendError::Auth { .. })
    }

    /// Caller-visible text: backend detail verbatim when present, else a generic prompt.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Network(_) => NETWORK_FAILURE_MESSAGE.to_string(),
            BackendError::Conflict { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            BackendError::Auth { detail } => detail
                .clone()
                .unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            BackendError::Decode(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Errors returned by [`OrderSession`](crate::OrderSession) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Another save or checkout for this session has not finished.
    #[error("A submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl SessionError {
    /// Returns true if re-authentication is required.
    pub fn is_auth(&self) -> bool {
        matches!(self, SessionError::Backend(e) if e.is_auth())
    }

    /// Text suitable for showing to the operator.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation(e) => e.to_string(),
            SessionError::InFlight => self.to_string(),
            SessionError::Backend(e) => e.user_message(),
        }
    }

    /// Short label used in metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            SessionError::Validation(ValidationError::NoTableSelected) => "no_table",
            SessionError::Validation(ValidationError::EmptyCart) => "empty_cart",
            SessionError::Validation(ValidationError::PendingOrderLoaded(_)) => "pending_order",
            SessionError::InFlight => "in_flight",
            SessionError::Backend(BackendError::Network(_)) => "network",
            SessionError::Backend(BackendError::Conflict { .. }) => "conflict",
            SessionError::Backend(BackendError::Auth { .. }) => "auth",
            SessionError::Backend(BackendError::Decode(_)) => "decode",
        }
    }
}

/// Convenience type alias for session results.
pub type Result<T> = std::result::Result<T, SessionError>;
