//! Read side of the point-of-sale client.
//!
//! This crate turns carts and backend invoices into display-ready data:
//! - [`InvoiceProjection`] snapshots built by an [`InvoiceProjector`]
//! - injected [`Clock`] and [`InvoiceSequence`] services for "now" and local numbering
//! - [`ReadModel`] views over fetched invoices: history search and sales summary

pub mod clock;
pub mod error;
pub mod invoice;
pub mod read_model;
pub mod sequence;
pub mod views;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ProjectionError, Result};
pub use invoice::{InvoiceProjection, InvoiceProjector, ProjectedItem, ProjectionSource};
pub use read_model::ReadModel;
pub use sequence::{InvoiceSequence, LOCAL_INVOICE_PREFIX, LocalInvoiceSequence, format_invoice_number};
pub use views::{HistoryFilter, InvoiceHistoryView, SalesSummary};
