//! Dashboard sales figures.

use chrono::NaiveDate;
use domain::{InvoiceRecord, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;

/// Revenue and order counts over a set of invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub total_revenue: Money,
    pub order_count: usize,
    pub average_order_value: Money,
    pub today: NaiveDate,
    pub today_revenue: Money,
    pub today_order_count: usize,
}

impl SalesSummary {
    /// Computes the summary; "today" is the UTC calendar day of `clock.now()`.
    pub fn compute<C: Clock + ?Sized>(invoices: &[InvoiceRecord], clock: &C) -> Self {
        let today = clock.now().date_naive();

        let total_revenue: Money = invoices.iter().map(|i| i.total_amount).sum();
        let order_count = invoices.len();

        let todays: Vec<&InvoiceRecord> = invoices
            .iter()
            .filter(|i| i.created_at.date_naive() == today)
            .collect();

        Self {
            total_revenue,
            order_count,
            average_order_value: average(total_revenue, order_count),
            today,
            today_revenue: todays.iter().map(|i| i.total_amount).sum(),
            today_order_count: todays.len(),
        }
    }
}

fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        return Money::zero();
    }
    Money::from_decimal(total.amount() / Decimal::from(count)).rounded()
}
