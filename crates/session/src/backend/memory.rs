//! In-memory backend for tests and offline demos.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use common::{InvoiceId, ItemId};
use domain::{
    BusinessSettings, CatalogItem, Completion, InvoiceItemRecord, InvoicePayload, InvoiceRecord,
    InvoiceStatus, Money,
};
use tokio::sync::Notify;

use super::PosBackend;
use crate::error::BackendError;

/// Lets a test hold create/update requests inside the backend.
///
/// Each held request signals [`entered`](Self::entered) and then waits for
/// one [`release`](Self::release).
#[derive(Debug, Default)]
pub struct SubmissionGate {
    entered: Notify,
    release: Notify,
}

impl SubmissionGate {
    /// Waits until a submission is being held.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Lets one held submission proceed.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Debug, Default)]
struct InMemoryBackendState {
    items: Vec<CatalogItem>,
    invoices: Vec<InvoiceRecord>,
    settings: BusinessSettings,
    next_id: i64,
    calls: HashMap<&'static str, usize>,
    fail_with: Option<BackendError>,
    gate: Option<Arc<SubmissionGate>>,
}

/// In-memory backend that mimics the invoice rules of the real service.
///
/// Stock-limited catalog items are checked and deducted on create, mirroring
/// the backend's insufficient-stock rejection. Items outside the seeded
/// catalog are accepted without a stock check.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<InMemoryBackendState>>,
}

impl InMemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend serving the given catalog.
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        let backend = Self::new();
        backend.write().items = items;
        backend
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryBackendState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryBackendState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the business settings.
    pub fn set_settings(&self, settings: BusinessSettings) {
        self.write().settings = settings;
    }

    /// Seeds an existing invoice (e.g. a pending table order).
    pub fn insert_invoice(&self, invoice: InvoiceRecord) {
        let mut state = self.write();
        state.next_id = state.next_id.max(invoice.id.as_i64());
        state.invoices.push(invoice);
    }

    /// Makes every subsequent call fail with `error`; `None` restores normal service.
    pub fn set_failure(&self, error: Option<BackendError>) {
        self.write().fail_with = error;
    }

    /// Holds create/update requests at the returned gate until released.
    pub fn hold_submissions(&self) -> Arc<SubmissionGate> {
        let gate = Arc::new(SubmissionGate::default());
        self.write().gate = Some(gate.clone());
        gate
    }

    /// Number of calls made to the named operation (e.g. `"create_invoice"`).
    pub fn call_count(&self, operation: &str) -> usize {
        self.read().calls.get(operation).copied().unwrap_or(0)
    }

    /// Number of create and update requests received.
    pub fn submission_count(&self) -> usize {
        self.call_count("create_invoice") + self.call_count("update_invoice")
    }

    /// Total number of calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.read().calls.values().sum()
    }

    /// Returns a stored invoice.
    pub fn invoice(&self, id: InvoiceId) -> Option<InvoiceRecord> {
        self.read().invoices.iter().find(|i| i.id == id).cloned()
    }

    /// Current stock for a catalog item.
    pub fn stock_of(&self, id: ItemId) -> Option<i64> {
        self.read()
            .items
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.stock_quantity)
    }

    /// Records the call and returns the configured failure, if any.
    fn enter(&self, operation: &'static str) -> Result<(), BackendError> {
        let mut state = self.write();
        *state.calls.entry(operation).or_default() += 1;
        match &state.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn pass_gate(&self) {
        let gate = self.read().gate.clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }
}

fn not_found(id: InvoiceId) -> BackendError {
    BackendError::Conflict {
        status: 404,
        detail: Some(format!("Invoice {id} not found")),
    }
}

fn build_rows(payload: &InvoicePayload) -> (Vec<InvoiceItemRecord>, Money) {
    let rows: Vec<InvoiceItemRecord> = payload
        .items
        .iter()
        .map(|item| {
            let row_total = item.unit_price.multiply(item.quantity) + item.tax_amount;
            InvoiceItemRecord {
                item_id: item.item_id,
                item_name: item.item_name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                tax_amount: Some(item.tax_amount),
                total_price: Some(row_total),
            }
        })
        .collect();
    let total = rows.iter().filter_map(|r| r.total_price).sum();
    (rows, total)
}

fn deduct_stock(items: &mut [CatalogItem], payload: &InvoicePayload) -> Result<(), BackendError> {
    let mut requested: HashMap<ItemId, i64> = HashMap::new();
    for row in &payload.items {
        if let Some(id) = row.item_id {
            *requested.entry(id).or_default() += i64::from(row.quantity);
        }
    }

    for item in items.iter().filter(|i| i.limit_stock) {
        let Some(quantity) = requested.get(&item.id) else {
            continue;
        };
        if item.stock_quantity < *quantity {
            return Err(BackendError::Conflict {
                status: 400,
                detail: Some(format!(
                    "Insufficient stock for {}. Available: {}, Requested: {}",
                    item.name, item.stock_quantity, quantity
                )),
            });
        }
    }

    for item in items.iter_mut().filter(|i| i.limit_stock) {
        if let Some(quantity) = requested.get(&item.id) {
            item.stock_quantity -= quantity;
        }
    }
    Ok(())
}

#[async_trait]
impl PosBackend for InMemoryBackend {
    async fn list_items(&self) -> Result<Vec<CatalogItem>, BackendError> {
        self.enter("list_items")?;
        Ok(self.read().items.clone())
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceRecord>, BackendError> {
        self.enter("list_invoices")?;
        Ok(self.read().invoices.clone())
    }

    async fn list_pending_orders(&self) -> Result<Vec<InvoiceRecord>, BackendError> {
        self.enter("list_pending_orders")?;
        Ok(self
            .read()
            .invoices
            .iter()
            .filter(|i| i.is_pending())
            .cloned()
            .collect())
    }

    async fn create_invoice(&self, payload: &InvoicePayload) -> Result<InvoiceRecord, BackendError> {
        self.enter("create_invoice")?;
        self.pass_gate().await;

        let mut state = self.write();
        deduct_stock(&mut state.items, payload)?;

        state.next_id += 1;
        let id = InvoiceId::new(state.next_id);
        let created_at = Utc::now();
        let (items, total_amount) = build_rows(payload);
        let invoice = InvoiceRecord {
            id,
            invoice_number: format!("INV-{}-{:08X}", created_at.format("%Y%m%d"), id.as_i64()),
            created_at,
            customer_name: payload.customer_name.clone(),
            customer_phone: payload.customer_phone.clone(),
            table_number: payload.table_number,
            status: payload.status.unwrap_or_default(),
            total_amount,
            payment_mode: payload.payment_mode.clone(),
            items,
        };
        state.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn update_invoice(
        &self,
        id: InvoiceId,
        payload: &InvoicePayload,
    ) -> Result<InvoiceRecord, BackendError> {
        self.enter("update_invoice")?;
        self.pass_gate().await;

        let mut state = self.write();
        let invoice = state
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found(id))?;
        let (items, total_amount) = build_rows(payload);
        invoice.items = items;
        invoice.total_amount = total_amount;
        invoice.customer_name = payload.customer_name.clone();
        invoice.customer_phone = payload.customer_phone.clone();
        invoice.table_number = payload.table_number.or(invoice.table_number);
        if let Some(status) = payload.status {
            invoice.status = status;
        }
        invoice.payment_mode = payload.payment_mode.clone();
        Ok(invoice.clone())
    }

    async fn complete_invoice(
        &self,
        id: InvoiceId,
        completion: &Completion,
    ) -> Result<InvoiceRecord, BackendError> {
        self.enter("complete_invoice")?;

        let mut state = self.write();
        let invoice = state
            .invoices
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| not_found(id))?;
        invoice.status = InvoiceStatus::Completed;
        invoice.payment_mode = completion.payment_mode.clone();
        if let Some(name) = &completion.customer.name {
            invoice.customer_name = Some(name.clone());
        }
        if let Some(phone) = &completion.customer.phone {
            invoice.customer_phone = Some(phone.clone());
        }
        Ok(invoice.clone())
    }

    async fn settings(&self) -> Result<BusinessSettings, BackendError> {
        self.enter("settings")?;
        Ok(self.read().settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use common::TableNumber;
    use domain::{CustomerDetails, InvoiceItemPayload};

    use super::*;

    fn catalog() -> Vec<CatalogItem> {
        vec![CatalogItem {
            id: ItemId::new(1),
            name: "Tea".to_string(),
            category: Some("drinks".to_string()),
            price: Money::from_major(10),
            tax_rate: None,
            stock_quantity: 5,
            limit_stock: true,
        }]
    }

    fn payload(quantity: u32, status: Option<InvoiceStatus>) -> InvoicePayload {
        InvoicePayload {
            customer_name: Some("Table 2".to_string()),
            customer_phone: None,
            table_number: Some(TableNumber::new(2)),
            status,
            payment_mode: "Cash".to_string(),
            items: vec![InvoiceItemPayload {
                item_id: Some(ItemId::new(1)),
                item_name: "Tea".to_string(),
                quantity,
                unit_price: Money::from_major(10),
                tax_amount: Money::from_major(1),
            }],
        }
    }

    #[tokio::test]
    async fn test_create_computes_total_and_deducts_stock() {
        let backend = InMemoryBackend::with_items(catalog());
        let invoice = backend
            .create_invoice(&payload(2, Some(InvoiceStatus::Pending)))
            .await
            .unwrap();

        assert_eq!(invoice.total_amount, Money::from_major(21));
        assert!(invoice.is_pending());
        assert!(invoice.invoice_number.starts_with("INV-"));
        assert_eq!(backend.stock_of(ItemId::new(1)), Some(3));
        assert_eq!(backend.list_pending_orders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_conflict() {
        let backend = InMemoryBackend::with_items(catalog());
        let err = backend.create_invoice(&payload(6, None)).await.unwrap_err();
        assert_eq!(
            err,
            BackendError::Conflict {
                status: 400,
                detail: Some("Insufficient stock for Tea. Available: 5, Requested: 6".to_string()),
            }
        );
        assert_eq!(backend.stock_of(ItemId::new(1)), Some(5));
    }

    #[tokio::test]
    async fn test_complete_marks_invoice_completed() {
        let backend = InMemoryBackend::with_items(catalog());
        let created = backend
            .create_invoice(&payload(1, Some(InvoiceStatus::Pending)))
            .await
            .unwrap();

        let completion = Completion::new(CustomerDetails::new(Some("Asha"), Some("9876543210")))
            .with_payment_mode("UPI");
        let completed = backend.complete_invoice(created.id, &completion).await.unwrap();

        assert_eq!(completed.status, InvoiceStatus::Completed);
        assert_eq!(completed.payment_mode, "UPI");
        assert_eq!(completed.customer_name.as_deref(), Some("Asha"));
        assert!(backend.list_pending_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_invoice_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend
            .update_invoice(InvoiceId::new(99), &payload(1, None))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Conflict { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_configured_failure_and_call_counts() {
        let backend = InMemoryBackend::new();
        backend.set_failure(Some(BackendError::Network("connection refused".to_string())));

        assert!(backend.list_items().await.is_err());
        assert!(backend.settings().await.is_err());
        assert_eq!(backend.call_count("list_items"), 1);
        assert_eq!(backend.total_calls(), 2);

        backend.set_failure(None);
        assert!(backend.list_items().await.is_ok());
    }
}
