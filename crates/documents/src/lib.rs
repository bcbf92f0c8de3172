//! Invoice documents for the point-of-sale client.
//!
//! Everything here consumes an [`InvoiceProjection`](projections::InvoiceProjection):
//! - [`InvoiceLayout`] lays out an A4 invoice as drawing operations
//! - [`render_pdf`] serialises a layout to PDF bytes
//! - [`share_message`] and [`whatsapp_link`] build the customer share action

pub mod error;
pub mod layout;
pub mod link;
pub mod message;
pub mod pdf;
pub mod style;

pub use error::{DocumentError, Result};
pub use layout::{DrawOp, ITEMS_UNAVAILABLE, InvoiceLayout, PAID_MARKER, Page, UNPAID_MARKER};
pub use link::{document_file_name, normalize_phone, whatsapp_link};
pub use message::{first_name, share_message};
pub use pdf::{render_pdf, write_pdf};
pub use style::{DocumentStyle, VALUED_CUSTOMER, WALK_IN_CUSTOMER};

use projections::InvoiceProjection;
use url::Url;

/// Lays out and serialises `invoice` in one step.
pub fn invoice_pdf(invoice: &InvoiceProjection, style: &DocumentStyle) -> Result<Vec<u8>> {
    render_pdf(&InvoiceLayout::build(invoice, style))
}

/// The share message and, when the customer phone is usable, its link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareAction {
    pub message: String,
    pub link: Option<Url>,
}

impl ShareAction {
    pub fn for_invoice(invoice: &InvoiceProjection, style: &DocumentStyle) -> Self {
        let message = share_message(invoice, style);
        let link = whatsapp_link(invoice.customer_phone(), &message);
        Self { message, link }
    }

    /// Returns true if the action can open a conversation.
    pub fn is_enabled(&self) -> bool {
        self.link.is_some()
    }
}
