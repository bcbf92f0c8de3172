//! Invoice history read model with search and date filtering.

use std::sync::Arc;

use chrono::NaiveDate;
use domain::InvoiceRecord;
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::read_model::ReadModel;
use crate::views::SalesSummary;
use crate::{ProjectionError, Result};

/// Criteria for narrowing the invoice history.
///
/// `search` matches the invoice number or customer name case-insensitively.
/// `from` and `to` are inclusive calendar dates (UTC).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    search: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl HistoryFilter {
    /// A filter that matches every invoice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to invoices whose number or customer name contains `term`.
    pub fn with_search(mut self, term: &str) -> Self {
        let term = term.trim().to_lowercase();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    /// Restricts to invoices created within `from..=to`; either end may be open.
    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ProjectionError::InvalidDateRange { from, to });
            }
        }
        self.from = from;
        self.to = to;
        Ok(self)
    }

    /// Returns true if `invoice` satisfies every criterion.
    pub fn matches(&self, invoice: &InvoiceRecord) -> bool {
        let day = invoice.created_at.date_naive();
        if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
            return false;
        }

        match &self.search {
            None => true,
            Some(term) => {
                invoice.invoice_number.to_lowercase().contains(term)
                    || invoice
                        .customer_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(term))
            }
        }
    }
}

/// Read model holding the most recently fetched invoice list.
#[derive(Clone, Default)]
pub struct InvoiceHistoryView {
    invoices: Arc<RwLock<Vec<InvoiceRecord>>>,
}

impl InvoiceHistoryView {
    /// Creates an empty history view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held invoices, newest first.
    pub async fn load(&self, mut invoices: Vec<InvoiceRecord>) {
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!(count = invoices.len(), "Loaded invoice history");
        *self.invoices.write().await = invoices;
    }

    /// Gets all invoices, newest first.
    pub async fn get_all(&self) -> Vec<InvoiceRecord> {
        self.invoices.read().await.clone()
    }

    /// Gets an invoice by its human-facing number.
    pub async fn get_by_number(&self, invoice_number: &str) -> Option<InvoiceRecord> {
        self.invoices
            .read()
            .await
            .iter()
            .find(|i| i.invoice_number == invoice_number)
            .cloned()
    }

    /// Gets invoices matching `filter`, newest first.
    pub async fn filter(&self, filter: &HistoryFilter) -> Vec<InvoiceRecord> {
        self.invoices
            .read()
            .await
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect()
    }

    /// Computes sales figures over the held invoices.
    pub async fn summary<C: Clock + ?Sized>(&self, clock: &C) -> SalesSummary {
        SalesSummary::compute(&self.invoices.read().await, clock)
    }
}

impl ReadModel for InvoiceHistoryView {
    fn name(&self) -> &'static str {
        "InvoiceHistoryView"
    }

    fn count(&self) -> usize {
        self.invoices.try_read().map(|i| i.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use common::InvoiceId;
    use domain::{InvoiceStatus, Money};

    use super::*;
    use crate::clock::FixedClock;

    fn invoice(id: i64, number: &str, customer: Option<&str>, at: DateTime<Utc>) -> InvoiceRecord {
        InvoiceRecord {
            id: InvoiceId::new(id),
            invoice_number: number.to_string(),
            created_at: at,
            customer_name: customer.map(str::to_string),
            customer_phone: None,
            table_number: None,
            status: InvoiceStatus::Completed,
            total_amount: Money::from_major(100),
            payment_mode: "Cash".to_string(),
            items: vec![],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded_view() -> InvoiceHistoryView {
        let view = InvoiceHistoryView::new();
        view.load(vec![
            invoice(1, "INV-0001", Some("Asha Rao"), Utc.with_ymd_and_hms(2025, 1, 3, 9, 0, 0).unwrap()),
            invoice(2, "INV-0002", None, Utc.with_ymd_and_hms(2025, 1, 4, 9, 0, 0).unwrap()),
            invoice(3, "INV-0003", Some("Ravi"), Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap()),
        ])
        .await;
        view
    }

    #[tokio::test]
    async fn test_load_orders_newest_first() {
        let view = seeded_view().await;
        let all = view.get_all().await;
        assert_eq!(all[0].invoice_number, "INV-0003");
        assert_eq!(all[2].invoice_number, "INV-0001");
        assert_eq!(view.count(), 3);
        assert_eq!(view.name(), "InvoiceHistoryView");
    }

    #[tokio::test]
    async fn test_search_matches_number_or_customer() {
        let view = seeded_view().await;

        let by_name = view.filter(&HistoryFilter::new().with_search("ASHA")).await;
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, InvoiceId::new(1));

        let by_number = view.filter(&HistoryFilter::new().with_search("0002")).await;
        assert_eq!(by_number.len(), 1);

        let blank = view.filter(&HistoryFilter::new().with_search("   ")).await;
        assert_eq!(blank.len(), 3);
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let view = seeded_view().await;
        let filter = HistoryFilter::new()
            .with_date_range(Some(date(2025, 1, 4)), Some(date(2025, 1, 5)))
            .unwrap();
        let hits = view.filter(&filter).await;
        assert_eq!(hits.len(), 2);

        let open_start = HistoryFilter::new()
            .with_date_range(None, Some(date(2025, 1, 3)))
            .unwrap();
        assert_eq!(view.filter(&open_start).await.len(), 1);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = HistoryFilter::new()
            .with_date_range(Some(date(2025, 1, 5)), Some(date(2025, 1, 4)))
            .unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidDateRange { .. }));
    }

    #[tokio::test]
    async fn test_get_by_number_and_summary() {
        let view = seeded_view().await;
        assert!(view.get_by_number("INV-0003").await.is_some());
        assert!(view.get_by_number("INV-9999").await.is_none());

        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 5, 18, 0, 0).unwrap());
        let summary = view.summary(&clock).await;
        assert_eq!(summary.order_count, 3);
        assert_eq!(summary.today_order_count, 1);
    }
}
