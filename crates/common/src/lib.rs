//! Shared identifier types for the point-of-sale workspace.

mod types;

pub use types::{InvoiceId, ItemId, TableNumber};
