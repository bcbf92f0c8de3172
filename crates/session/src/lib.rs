//! Order session coordination for the point-of-sale client.
//!
//! This crate ties the cart to a table context and to the backend of record:
//! 1. Select a table (its pending order, if any, is loaded into the cart)
//! 2. Edit the cart
//! 3. Save it as the table's pending order, or check out directly
//! 4. Complete pending orders with customer details
//!
//! Submissions are guarded so a double-click cannot create duplicate invoices.

pub mod backend;
pub mod error;
pub mod session;
pub mod state;
pub mod tables;

pub use backend::{InMemoryBackend, PosBackend, SubmissionGate};
pub use error::{BackendError, Result, SessionError, ValidationError};
pub use session::OrderSession;
pub use state::SessionState;
pub use tables::{TableBoard, TableStatus};
