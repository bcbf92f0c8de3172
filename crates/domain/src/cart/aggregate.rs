//! Cart aggregate implementation.

use common::ItemId;
use serde::Serialize;

use crate::records::{InvoiceItemPayload, InvoiceItemRecord, InvoiceRecord};

use super::{CartChange, CartProduct, LineItem, Money, TaxRate};

/// The in-progress order: an ordered list of line items.
///
/// Lines keep the order they were first added in; re-adding a known product
/// bumps its quantity in place. Totals are derived from the lines on every
/// read and never stored.
///
/// Carts are only built through their mutation methods, so there is no
/// `Deserialize` that could bypass the line invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<LineItem>,
}

// Query methods
impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the line for a product.
    pub fn get_item(&self, id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == Some(id))
    }

    /// Returns the number of lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `Σ unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Returns `Σ unit_price × quantity × tax_rate`.
    pub fn tax_total(&self) -> Money {
        self.items.iter().map(LineItem::tax_amount).sum()
    }

    /// Returns `subtotal + tax_total`.
    pub fn grand_total(&self) -> Money {
        self.subtotal() + self.tax_total()
    }

    /// Returns the lines in the shape the backend expects in invoice requests.
    pub fn payload_items(&self) -> Vec<InvoiceItemPayload> {
        self.items
            .iter()
            .map(|item| InvoiceItemPayload {
                item_id: item.id,
                item_name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                tax_amount: item.tax_amount(),
            })
            .collect()
    }
}

// Mutation methods
impl Cart {
    /// Adds one unit of a product.
    ///
    /// A known product has its quantity incremented; an unknown one is
    /// appended with quantity 1. A known line without a tax rate takes the
    /// product's rate.
    pub fn add(&mut self, product: CartProduct) -> CartChange {
        let id = product.id();
        if let Some(existing) = self.position(id).and_then(|idx| self.items.get_mut(idx)) {
            existing.quantity = existing.quantity.saturating_add(1);
            if existing.tax_rate.is_none() {
                existing.tax_rate = product.tax_rate();
            }
            return CartChange::Incremented {
                id,
                quantity: existing.quantity,
            };
        }

        self.items.push(LineItem::from(product));
        CartChange::Added { id }
    }

    /// Removes the line for a product; unknown ids are ignored.
    pub fn remove(&mut self, id: ItemId) -> CartChange {
        match self.position(id) {
            Some(idx) => {
                self.items.remove(idx);
                CartChange::Removed { id }
            }
            None => CartChange::Unchanged,
        }
    }

    /// Sets a line's quantity; zero or negative removes the line.
    ///
    /// Unknown ids are ignored.
    pub fn set_quantity(&mut self, id: ItemId, quantity: i64) -> CartChange {
        if quantity <= 0 {
            return self.remove(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(existing) = self.position(id).and_then(|idx| self.items.get_mut(idx)) else {
            return CartChange::Unchanged;
        };

        if existing.quantity == quantity {
            return CartChange::Unchanged;
        }

        let from = existing.quantity;
        existing.quantity = quantity;
        CartChange::QuantityChanged {
            id,
            from,
            to: quantity,
        }
    }

    /// Discards all lines and repopulates them from an invoice.
    ///
    /// Each line's tax rate is recovered from the row's stored tax amount, so
    /// re-saving the cart reproduces the invoice's tax. Rows without a usable
    /// amount get no rate. Zero-quantity rows are skipped and repeated product
    /// ids are merged so the cart invariants hold.
    pub fn replace_from_invoice(&mut self, invoice: &InvoiceRecord) -> CartChange {
        self.items.clear();

        for row in invoice.items.iter().filter(|row| row.quantity > 0) {
            let known = row.item_id.and_then(|id| self.position(id));
            if let Some(existing) = known.and_then(|idx| self.items.get_mut(idx)) {
                existing.quantity = existing.quantity.saturating_add(row.quantity);
                if existing.tax_rate.is_none() {
                    existing.tax_rate = implied_tax_rate(row);
                }
                continue;
            }

            self.items.push(LineItem::new(
                row.item_id,
                row.item_name.clone(),
                row.unit_price,
                row.quantity,
                implied_tax_rate(row),
            ));
        }

        CartChange::Replaced {
            lines: self.items.len(),
        }
    }

    /// Discards all lines.
    pub fn clear(&mut self) -> CartChange {
        if self.items.is_empty() {
            return CartChange::Unchanged;
        }
        self.items.clear();
        CartChange::Cleared
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == Some(id))
    }
}

fn implied_tax_rate(row: &InvoiceItemRecord) -> Option<TaxRate> {
    let tax = row.tax_amount?;
    TaxRate::implied_by(row.unit_price.multiply(row.quantity), tax)
}
