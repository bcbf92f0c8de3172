//! Local invoice numbering for documents produced before the backend confirms.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of locally generated invoice numbers.
pub const LOCAL_INVOICE_PREFIX: &str = "INV-";

/// Zero-padded width of the numeric part.
const SEQUENCE_WIDTH: usize = 5;

/// Issues invoice numbers.
pub trait InvoiceSequence: Send + Sync {
    /// Returns the next invoice number; numbers strictly increase.
    fn next_number(&self) -> String;

    /// Returns the last issued sequence value (0 when none yet).
    fn last_issued(&self) -> u64;
}

/// Process-scoped monotonically increasing sequence (`INV-00001`, `INV-00002`, ...).
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct LocalInvoiceSequence {
    last: Arc<AtomicU64>,
}

impl LocalInvoiceSequence {
    /// Creates a sequence whose first number is `INV-00001`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sequence that continues after `last_issued`.
    pub fn starting_after(last_issued: u64) -> Self {
        Self {
            last: Arc::new(AtomicU64::new(last_issued)),
        }
    }
}

/// Formats a sequence value as an invoice number.
pub fn format_invoice_number(value: u64) -> String {
    format!("{LOCAL_INVOICE_PREFIX}{value:0width$}", width = SEQUENCE_WIDTH)
}

impl InvoiceSequence for LocalInvoiceSequence {
    fn next_number(&self) -> String {
        let value = self.last.fetch_add(1, Ordering::SeqCst) + 1;
        format_invoice_number(value)
    }

    fn last_issued(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

impl<S: InvoiceSequence + ?Sized> InvoiceSequence for Arc<S> {
    fn next_number(&self) -> String {
        (**self).next_number()
    }

    fn last_issued(&self) -> u64 {
        (**self).last_issued()
    }
}
