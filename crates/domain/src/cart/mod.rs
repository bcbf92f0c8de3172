//! Cart aggregate and related types.

mod aggregate;
mod changes;
mod value_objects;

pub use aggregate::Cart;
pub use changes::CartChange;
pub use value_objects::{CURRENCY_SYMBOL, CartProduct, LineItem, Money, TaxRate};

use common::ItemId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when building cart values.
///
/// Cart mutations themselves never fail; these cover malformed inputs.
#[derive(Debug, Error)]
pub enum CartError {
    /// Tax rate outside the `[0, 1]` fraction range.
    #[error("Invalid tax rate: {rate} (must be between 0 and 1)")]
    InvalidTaxRate { rate: Decimal },

    /// Unit prices cannot be negative.
    #[error("Invalid price for item {id}: {price} (must not be negative)")]
    NegativePrice { id: ItemId, price: Decimal },
}
