//! Domain layer for the point-of-sale client.
//!
//! This crate provides the core domain types including:
//! - `Money` and `TaxRate` value objects
//! - The `Cart` aggregate with derived subtotal, tax and grand totals
//! - The product catalog and its browsing helpers
//! - Backend record and payload shapes for invoices and settings

pub mod cart;
pub mod catalog;
pub mod records;
pub mod timestamp;

pub use cart::{CURRENCY_SYMBOL, Cart, CartChange, CartError, CartProduct, LineItem, Money, TaxRate};
pub use catalog::{Catalog, CatalogItem};
pub use records::{
    BusinessSettings, Completion, CustomerDetails, DEFAULT_PAYMENT_MODE, InvoiceItemPayload,
    InvoiceItemRecord, InvoicePayload, InvoiceRecord, InvoiceStatus,
};
