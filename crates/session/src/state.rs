//! Order session state machine.

use serde::{Deserialize, Serialize};

/// The state of an order session.
///
/// State transitions:
/// ```text
///                    select_table (no pending order)
/// NoTableSelected ──────────────────────────────► TableSelectedEmpty ──┐
///       ▲  │         select_table (pending order)                        │ add / remove /
///       │  └────────────────────────────► TableSelectedWithPendingOrder ─┤ set_quantity
///       │                                                                ▼
///       └──────────── save / deselect_table ◄──────────────── TableSelectedDirty
/// ```
///
/// Selecting another table from any state replaces the cart wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionState {
    /// Idle; no table context.
    #[default]
    NoTableSelected,

    /// A table with no pending order is selected; the cart started empty.
    TableSelectedEmpty,

    /// A table's pending order has been loaded into the cart.
    TableSelectedWithPendingOrder,

    /// The cart diverges from what was last loaded or saved for the table.
    TableSelectedDirty,
}

impl SessionState {
    /// Returns true if a table is selected.
    pub fn has_table(&self) -> bool {
        !matches!(self, SessionState::NoTableSelected)
    }

    /// Returns true if the cart holds edits that have not been saved.
    pub fn is_dirty(&self) -> bool {
        matches!(self, SessionState::TableSelectedDirty)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::NoTableSelected => "NoTableSelected",
            SessionState::TableSelectedEmpty => "TableSelectedEmpty",
            SessionState::TableSelectedWithPendingOrder => "TableSelectedWithPendingOrder",
            SessionState::TableSelectedDirty => "TableSelectedDirty",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
