//! Table board: which tables have a pending order.

use common::{InvoiceId, TableNumber};
use domain::{BusinessSettings, InvoiceRecord};
use serde::{Deserialize, Serialize};

/// One table on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStatus {
    pub table: TableNumber,
    /// The pending order saved for this table, if any.
    pub pending_order: Option<InvoiceId>,
}

impl TableStatus {
    /// Returns true if a pending order exists for the table.
    pub fn is_active(&self) -> bool {
        self.pending_order.is_some()
    }

    /// `Table 3` or `Table 3 (Active)`.
    pub fn label(&self) -> String {
        if self.is_active() {
            format!("Table {} (Active)", self.table)
        } else {
            format!("Table {}", self.table)
        }
    }
}

/// Tables `1..=n` with their pending-order flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBoard {
    tables: Vec<TableStatus>,
}

impl TableBoard {
    /// Builds a board of `total_tables` tables from the pending order list.
    pub fn new(total_tables: u32, pending: &[InvoiceRecord]) -> Self {
        let tables = (1..=total_tables)
            .map(TableNumber::new)
            .map(|table| TableStatus {
                table,
                pending_order: pending
                    .iter()
                    .find(|order| order.is_pending() && order.table_number == Some(table))
                    .map(|order| order.id),
            })
            .collect();
        Self { tables }
    }

    /// Builds a board sized by the business settings (10 tables when unset).
    pub fn from_settings(settings: &BusinessSettings, pending: &[InvoiceRecord]) -> Self {
        Self::new(settings.table_count(), pending)
    }

    pub fn tables(&self) -> &[TableStatus] {
        &self.tables
    }

    pub fn get(&self, table: TableNumber) -> Option<&TableStatus> {
        self.tables.iter().find(|t| t.table == table)
    }

    /// Number of tables with a pending order.
    pub fn active_count(&self) -> usize {
        self.tables.iter().filter(|t| t.is_active()).count()
    }
}
