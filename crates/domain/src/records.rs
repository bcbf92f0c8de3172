//! Backend record and payload shapes.
//!
//! These mirror the JSON the point-of-sale backend exchanges on `/invoices`
//! and `/settings`. Fields the backend only sometimes sends are optional with
//! a documented default instead of being tolerated implicitly.

use chrono::{DateTime, Utc};
use common::{InvoiceId, ItemId, TableNumber};
use serde::{Deserialize, Serialize};

use crate::cart::Money;

/// Payment mode used when none is given.
pub const DEFAULT_PAYMENT_MODE: &str = "Cash";

/// Number of tables assumed when settings don't say.
pub const DEFAULT_TABLE_COUNT: u32 = 10;

fn default_payment_mode() -> String {
    DEFAULT_PAYMENT_MODE.to_string()
}

/// Lifecycle of an invoice on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Saved against a table, not yet billed.
    Pending,

    /// Billed.
    #[default]
    Completed,
}

impl InvoiceStatus {
    /// Returns the status name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An invoice line as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemRecord {
    /// Catalog product, absent when the product has since been deleted.
    #[serde(default)]
    pub item_id: Option<ItemId>,

    /// Name snapshot at billing time.
    pub item_name: String,

    pub quantity: u32,

    /// Price snapshot at billing time.
    pub unit_price: Money,

    #[serde(default)]
    pub tax_amount: Option<Money>,

    /// Backend's `unit_price * quantity + tax_amount`.
    #[serde(default)]
    pub total_price: Option<Money>,
}

/// An invoice (committed or pending) as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: InvoiceId,

    /// Server-assigned invoice number.
    pub invoice_number: String,

    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub customer_phone: Option<String>,

    #[serde(default)]
    pub table_number: Option<TableNumber>,

    #[serde(default)]
    pub status: InvoiceStatus,

    /// Authoritative grand total.
    pub total_amount: Money,

    #[serde(default = "default_payment_mode")]
    pub payment_mode: String,

    #[serde(default)]
    pub items: Vec<InvoiceItemRecord>,
}

impl InvoiceRecord {
    /// Returns true if this is a pending table order.
    pub fn is_pending(&self) -> bool {
        self.status == InvoiceStatus::Pending
    }
}

/// An invoice line in a create/update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemPayload {
    pub item_id: Option<ItemId>,
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub tax_amount: Money,
}

/// Body of `POST /invoices/` and `PUT /invoices/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePayload {
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<TableNumber>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,

    pub payment_mode: String,
    pub items: Vec<InvoiceItemPayload>,
}

/// Optional customer contact details attached to an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl CustomerDetails {
    /// Creates customer details; blank strings become absent.
    pub fn new(name: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            name: non_blank(name),
            phone: non_blank(phone),
        }
    }

    /// Returns details with neither name nor phone.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parameters of `PUT /invoices/{id}/complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub payment_mode: String,
    pub customer: CustomerDetails,
}

impl Completion {
    /// Creates a completion paid in the default payment mode.
    pub fn new(customer: CustomerDetails) -> Self {
        Self {
            payment_mode: default_payment_mode(),
            customer,
        }
    }

    /// Sets the payment mode.
    pub fn with_payment_mode(mut self, payment_mode: impl Into<String>) -> Self {
        self.payment_mode = payment_mode.into();
        self
    }
}

/// Business profile and table configuration from `GET /settings/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSettings {
    #[serde(default)]
    pub hotel_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub upi_id: Option<String>,
    #[serde(default)]
    pub total_tables: Option<u32>,
}

impl BusinessSettings {
    /// Returns the configured table count, falling back to the default when unset or zero.
    pub fn table_count(&self) -> u32 {
        self.total_tables
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_TABLE_COUNT)
    }
}
