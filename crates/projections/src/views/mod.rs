//! Read model views over backend invoices.

pub mod history;
pub mod sales_summary;

pub use history::{HistoryFilter, InvoiceHistoryView};
pub use sales_summary::SalesSummary;
