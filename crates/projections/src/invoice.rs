//! Render-ready invoice snapshots.
//!
//! An [`InvoiceProjection`] is built either from an uncommitted [`Cart`]
//! (numbered locally, stamped with the injected clock) or from an invoice the
//! backend already confirmed (copied verbatim). It owns its data and never
//! points back into the cart it came from.

use chrono::{DateTime, Utc};
use common::TableNumber;
use domain::{
    Cart, CustomerDetails, DEFAULT_PAYMENT_MODE, InvoiceItemRecord, InvoiceRecord, InvoiceStatus,
    Money,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::sequence::{InvoiceSequence, LocalInvoiceSequence};

/// Decimal places kept in a derived tax percentage.
const LABEL_PLACES: u32 = 2;

/// Where a projection's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionSource {
    /// Built from the local cart before the backend confirmed anything.
    Local,
    /// Copied from a backend invoice.
    Server,
}

/// One line of a projected invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedItem {
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub tax_amount: Option<Money>,
}

impl ProjectedItem {
    /// Returns `unit_price * quantity`, ignoring any pre-supplied total.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

impl From<&InvoiceItemRecord> for ProjectedItem {
    fn from(row: &InvoiceItemRecord) -> Self {
        Self {
            item_name: row.item_name.clone(),
            quantity: row.quantity,
            unit_price: row.unit_price,
            tax_amount: row.tax_amount,
        }
    }
}

/// Immutable, display-ready snapshot of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceProjection {
    invoice_number: String,
    created_at: DateTime<Utc>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    table_number: Option<TableNumber>,
    status: InvoiceStatus,
    items: Vec<ProjectedItem>,
    total_amount: Money,
    payment_mode: String,
    source: ProjectionSource,
}

impl InvoiceProjection {
    /// Copies a backend invoice verbatim; the server total stays authoritative.
    pub fn from_server_invoice(invoice: &InvoiceRecord) -> Self {
        Self {
            invoice_number: invoice.invoice_number.clone(),
            created_at: invoice.created_at,
            customer_name: invoice.customer_name.clone(),
            customer_phone: invoice.customer_phone.clone(),
            table_number: invoice.table_number,
            status: invoice.status,
            items: invoice.items.iter().map(ProjectedItem::from).collect(),
            total_amount: invoice.total_amount,
            payment_mode: payment_mode_or_default(Some(invoice.payment_mode.as_str())),
            source: ProjectionSource::Server,
        }
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Customer name as stored; display fallbacks are applied by renderers.
    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn customer_phone(&self) -> Option<&str> {
        self.customer_phone.as_deref()
    }

    pub fn table_number(&self) -> Option<TableNumber> {
        self.table_number
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Returns true once the invoice has been billed.
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Completed
    }

    pub fn items(&self) -> &[ProjectedItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn payment_mode(&self) -> &str {
        &self.payment_mode
    }

    pub fn source(&self) -> ProjectionSource {
        self.source
    }

    /// Sum of recomputed line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(ProjectedItem::line_total).sum()
    }

    /// Difference between the authoritative total and the recomputed subtotal.
    pub fn tax_total(&self) -> Money {
        self.total_amount - self.subtotal()
    }

    /// Effective tax percentage over the subtotal, if any tax applies.
    pub fn tax_percent(&self) -> Option<Decimal> {
        let subtotal = self.subtotal();
        let tax = self.tax_total();
        if !subtotal.is_positive() || !tax.is_positive() {
            return None;
        }
        let percent = tax.amount() * Decimal::ONE_HUNDRED / subtotal.amount();
        Some(
            percent
                .round_dp_with_strategy(LABEL_PLACES, RoundingStrategy::MidpointAwayFromZero)
                .normalize(),
        )
    }

    /// Summary label for the tax line, e.g. `Tax (10%)`, or `Tax` when untaxed.
    pub fn tax_label(&self) -> String {
        match self.tax_percent() {
            Some(percent) => format!("Tax ({percent}%)"),
            None => "Tax".to_string(),
        }
    }
}

fn payment_mode_or_default(mode: Option<&str>) -> String {
    mode.map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_PAYMENT_MODE)
        .to_string()
}

/// Builds projections from carts using injected numbering and time.
#[derive(Debug, Clone, Default)]
pub struct InvoiceProjector<S = LocalInvoiceSequence, C = SystemClock> {
    sequence: S,
    clock: C,
}

impl<S: InvoiceSequence, C: Clock> InvoiceProjector<S, C> {
    pub fn new(sequence: S, clock: C) -> Self {
        Self { sequence, clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sequence(&self) -> &S {
        &self.sequence
    }

    /// Snapshots `cart` under a fresh local invoice number.
    ///
    /// The total is the cart's grand total at this instant; later cart edits do
    /// not affect the returned projection.
    pub fn project(
        &self,
        cart: &Cart,
        customer: CustomerDetails,
        payment_mode: Option<&str>,
    ) -> InvoiceProjection {
        let items = cart
            .items()
            .iter()
            .map(|line| ProjectedItem {
                item_name: line.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                tax_amount: Some(line.tax_amount()),
            })
            .collect();

        InvoiceProjection {
            invoice_number: self.sequence.next_number(),
            created_at: self.clock.now(),
            customer_name: customer.name,
            customer_phone: customer.phone,
            table_number: None,
            status: InvoiceStatus::Pending,
            items,
            total_amount: cart.grand_total(),
            payment_mode: payment_mode_or_default(payment_mode),
            source: ProjectionSource::Local,
        }
    }

    /// Same as [`project`](Self::project), tagged with the table the cart belongs to.
    pub fn project_for_table(
        &self,
        cart: &Cart,
        table: TableNumber,
        customer: CustomerDetails,
        payment_mode: Option<&str>,
    ) -> InvoiceProjection {
        let mut projection = self.project(cart, customer, payment_mode);
        projection.table_number = Some(table);
        projection
    }

    /// Wraps a backend invoice.
    pub fn project_from_server_invoice(&self, invoice: &InvoiceRecord) -> InvoiceProjection {
        InvoiceProjection::from_server_invoice(invoice)
    }
}
