use std::sync::Arc;

use client::{Config, HttpBackend};
use documents::DocumentStyle;
use domain::Catalog;
use projections::{InvoiceHistoryView, InvoiceProjection, InvoiceProjector, LocalInvoiceSequence, SystemClock};
use session::{BackendError, OrderSession, PosBackend, SessionError};

/// What every subcommand needs: configuration and a backend connection.
pub(crate) struct Context {
    pub(crate) config: Config,
    pub(crate) backend: Arc<HttpBackend>,
}

impl Context {
    pub(crate) fn new(config: Config) -> Result<Self, String> {
        let backend = HttpBackend::new(&config).map_err(|error| error.to_string())?;
        Ok(Self {
            config,
            backend: Arc::new(backend),
        })
    }

    /// A fresh order session numbering local previews after the configured start.
    pub(crate) fn session(&self) -> OrderSession<Arc<HttpBackend>> {
        let sequence = LocalInvoiceSequence::starting_after(self.config.invoice_sequence_start);
        OrderSession::new(self.backend.clone(), InvoiceProjector::new(sequence, SystemClock))
    }

    pub(crate) async fn style(&self) -> Result<DocumentStyle, String> {
        let settings = self.backend.settings().await.map_err(|e| describe(&e))?;
        Ok(self.config.document_style(&settings))
    }

    pub(crate) async fn catalog(&self) -> Result<Catalog, String> {
        let items = self.backend.list_items().await.map_err(|e| describe(&e))?;
        Ok(Catalog::new(items))
    }

    pub(crate) async fn history(&self) -> Result<InvoiceHistoryView, String> {
        let invoices = self.backend.list_invoices().await.map_err(|e| describe(&e))?;
        let view = InvoiceHistoryView::new();
        view.load(invoices).await;
        Ok(view)
    }

    pub(crate) async fn find_invoice(&self, invoice_number: &str) -> Result<InvoiceProjection, String> {
        self.history()
            .await?
            .get_by_number(invoice_number)
            .await
            .map(|invoice| InvoiceProjection::from_server_invoice(&invoice))
            .ok_or_else(|| format!("Invoice {invoice_number} not found"))
    }
}

pub(crate) fn describe(error: &BackendError) -> String {
    if error.is_auth() {
        format!("{} Run `pos login`.", error.user_message())
    } else {
        error.user_message()
    }
}

pub(crate) fn describe_session(error: &SessionError) -> String {
    match error {
        SessionError::Backend(error) => describe(error),
        other => other.user_message(),
    }
}
