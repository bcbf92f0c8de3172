//! `reqwest` implementation of the backend of record.

use std::sync::{PoisonError, RwLock};
use std::time::Instant;

use async_trait::async_trait;
use common::InvoiceId;
use domain::{BusinessSettings, CatalogItem, Completion, InvoicePayload, InvoiceRecord};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use session::{BackendError, PosBackend};

use crate::config::Config;
use crate::error::{ConfigError, error_from_status, error_from_transport};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// HTTP client for the point-of-sale backend.
///
/// Holds the bearer token in memory. A 401 or 403 on any call drops it; the
/// caller decides whether to [`login`](Self::login) again.
pub struct HttpBackend {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    /// Creates a client for `config.api_url`, starting with `config.api_token` if set.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: RwLock::new(config.api_token.clone()),
        })
    }

    /// Returns the current bearer token.
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Exchanges credentials for a bearer token and keeps it for later calls.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        let request = self
            .http
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)]);
        let response: TokenResponse = self.execute("login", request).await?;
        self.set_token(Some(response.access_token.clone()));
        tracing::info!("Signed in");
        Ok(response.access_token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(self.http.get(self.url(path)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, BackendError> {
        let started = Instant::now();
        let result = Self::send(request).await;

        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::histogram!(
            "pos_backend_request_duration_seconds",
            "operation" => operation,
            "outcome" => outcome
        )
        .record(started.elapsed().as_secs_f64());

        if let Err(error) = &result {
            if error.is_auth() {
                self.set_token(None);
            }
            tracing::warn!(operation, error = %error, "Backend request failed");
        }
        result
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, BackendError> {
        let response = request.send().await.map_err(error_from_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, &body));
        }
        response.json().await.map_err(error_from_transport)
    }
}

#[async_trait]
impl PosBackend for HttpBackend {
    #[tracing::instrument(skip(self))]
    async fn list_items(&self) -> Result<Vec<CatalogItem>, BackendError> {
        self.execute("list_items", self.get("/items/")).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_invoices(&self) -> Result<Vec<InvoiceRecord>, BackendError> {
        self.execute("list_invoices", self.get("/invoices/")).await
    }

    #[tracing::instrument(skip(self))]
    async fn list_pending_orders(&self) -> Result<Vec<InvoiceRecord>, BackendError> {
        self.execute("list_pending_orders", self.get("/invoices/pending"))
            .await
    }

    #[tracing::instrument(skip(self, payload))]
    async fn create_invoice(&self, payload: &InvoicePayload) -> Result<InvoiceRecord, BackendError> {
        let request = self
            .authorized(self.http.post(self.url("/invoices/")))
            .json(payload);
        self.execute("create_invoice", request).await
    }

    #[tracing::instrument(skip(self, payload))]
    async fn update_invoice(
        &self,
        id: InvoiceId,
        payload: &InvoicePayload,
    ) -> Result<InvoiceRecord, BackendError> {
        let request = self
            .authorized(self.http.put(self.url(&format!("/invoices/{id}"))))
            .json(payload);
        self.execute("update_invoice", request).await
    }

    #[tracing::instrument(skip(self, completion))]
    async fn complete_invoice(
        &self,
        id: InvoiceId,
        completion: &Completion,
    ) -> Result<InvoiceRecord, BackendError> {
        let mut query = vec![("payment_mode", completion.payment_mode.as_str())];
        if let Some(name) = completion.customer.name.as_deref() {
            query.push(("customer_name", name));
        }
        if let Some(phone) = completion.customer.phone.as_deref() {
            query.push(("customer_phone", phone));
        }
        let request = self
            .authorized(self.http.put(self.url(&format!("/invoices/{id}/complete"))))
            .query(&query);
        self.execute("complete_invoice", request).await
    }

    #[tracing::instrument(skip(self))]
    async fn settings(&self) -> Result<BusinessSettings, BackendError> {
        self.execute("settings", self.get("/settings/")).await
    }
}
