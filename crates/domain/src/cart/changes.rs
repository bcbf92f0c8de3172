//! Outcomes of cart mutations.

use common::ItemId;
use serde::{Deserialize, Serialize};

/// What a cart mutation did to the line items.
///
/// Returned by every mutating operation so callers can log or react to the
/// effect without diffing the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CartChange {
    /// A new line was appended with quantity 1.
    Added { id: ItemId },

    /// An existing line's quantity went up by one.
    Incremented { id: ItemId, quantity: u32 },

    /// An existing line's quantity was set.
    QuantityChanged { id: ItemId, from: u32, to: u32 },

    /// A line was deleted.
    Removed { id: ItemId },

    /// All lines were replaced from an invoice.
    Replaced { lines: usize },

    /// All lines were discarded.
    Cleared,

    /// Nothing changed (unknown id, same quantity).
    Unchanged,
}

impl CartChange {
    /// Returns true if the mutation altered the cart.
    pub fn is_change(&self) -> bool {
        !matches!(self, CartChange::Unchanged)
    }

    /// Returns the change name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartChange::Added { .. } => "Added",
            CartChange::Incremented { .. } => "Incremented",
            CartChange::QuantityChanged { .. } => "QuantityChanged",
            CartChange::Removed { .. } => "Removed",
            CartChange::Replaced { .. } => "Replaced",
            CartChange::Cleared => "Cleared",
            CartChange::Unchanged => "Unchanged",
        }
    }
}

impl std::fmt::Display for CartChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
