//! Backend-of-record abstraction.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use common::InvoiceId;
use domain::{BusinessSettings, CatalogItem, Completion, InvoicePayload, InvoiceRecord};

use crate::error::BackendError;

pub use memory::{InMemoryBackend, SubmissionGate};

/// Operations the point-of-sale client needs from its backend.
///
/// Implementations do not retry; every failure is reported to the caller.
#[async_trait]
pub trait PosBackend: Send + Sync {
    /// `GET /items/`
    async fn list_items(&self) -> Result<Vec<CatalogItem>, BackendError>;

    /// `GET /invoices/`
    async fn list_invoices(&self) -> Result<Vec<InvoiceRecord>, BackendError>;

    /// `GET /invoices/pending`
    async fn list_pending_orders(&self) -> Result<Vec<InvoiceRecord>, BackendError>;

    /// `POST /invoices/`
    async fn create_invoice(&self, payload: &InvoicePayload) -> Result<InvoiceRecord, BackendError>;

    /// `PUT /invoices/{id}`
    async fn update_invoice(
        &self,
        id: InvoiceId,
        payload: &InvoicePayload,
    ) -> Result<InvoiceRecord, BackendError>;

    /// `PUT /invoices/{id}/complete`
    async fn complete_invoice(
        &self,
        id: InvoiceId,
        completion: &Completion,
    ) -> Result<InvoiceRecord, BackendError>;

    /// `GET /settings/`
    async fn settings(&self) -> Result<BusinessSettings, BackendError>;
}

#[async_trait]
impl<B: PosBackend + ?Sized> PosBackend for Arc<B> {
    async fn list_items(&self) -> Result<Vec<CatalogItem>, BackendError> {
        (**self).list_items().await
    }

    async fn list_invoices(&self) -> Result<Vec<InvoiceRecord>, BackendError> {
        (**self).list_invoices().await
    }

    async fn list_pending_orders(&self) -> Result<Vec<InvoiceRecord>, BackendError> {
        (**self).list_pending_orders().await
    }

    async fn create_invoice(&self, payload: &InvoicePayload) -> Result<InvoiceRecord, BackendError> {
        (**self).create_invoice(payload).await
    }

    async fn update_invoice(
        &self,
        id: InvoiceId,
        payload: &InvoicePayload,
    ) -> Result<InvoiceRecord, BackendError> {
        (**self).update_invoice(id, payload).await
    }

    async fn complete_invoice(
        &self,
        id: InvoiceId,
        completion: &Completion,
    ) -> Result<InvoiceRecord, BackendError> {
        (**self).complete_invoice(id, completion).await
    }

    async fn settings(&self) -> Result<BusinessSettings, BackendError> {
        (**self).settings().await
    }
}
