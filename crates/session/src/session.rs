//! Order session: one table context and its cart.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use common::{InvoiceId, ItemId, TableNumber};
use domain::{
    BusinessSettings, Cart, CartChange, CartProduct, Completion, CustomerDetails,
    DEFAULT_PAYMENT_MODE, InvoicePayload, InvoiceRecord, InvoiceStatus, Money,
};
use projections::{
    Clock, InvoiceProjection, InvoiceProjector, InvoiceSequence, LocalInvoiceSequence, SystemClock,
};

use crate::backend::PosBackend;
use crate::error::{BackendError, Result, SessionError, ValidationError};
use crate::state::SessionState;
use crate::tables::TableBoard;

#[derive(Debug, Default)]
struct SessionInner {
    state: SessionState,
    table: Option<TableNumber>,
    order_id: Option<InvoiceId>,
    cart: Cart,
    pending: Vec<InvoiceRecord>,
}

impl SessionInner {
    /// Returns to the idle state with an empty cart.
    fn reset(&mut self) {
        self.cart.clear();
        self.table = None;
        self.order_id = None;
        self.state = SessionState::NoTableSelected;
    }

    /// True while the session still shows the table and order a submission
    /// was taken from.
    fn is_context_of(&self, table: Option<TableNumber>, order_id: Option<InvoiceId>) -> bool {
        self.table == table && self.order_id == order_id
    }

    fn upsert_pending(&mut self, invoice: InvoiceRecord) {
        self.pending.retain(|order| order.id != invoice.id);
        if invoice.is_pending() {
            self.pending.push(invoice);
        }
    }
}

/// What `save` sent, compared against the session once the backend answers.
struct SaveSnapshot {
    table: TableNumber,
    order_id: Option<InvoiceId>,
    cart: Cart,
}

/// Clears the in-flight flag when a submission ends, however it ends.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Coordinates the cart with a table context and the backend.
///
/// Cart edits are synchronous and never wait on the network. `save` and
/// `checkout` share an in-flight flag: while one is outstanding, further
/// submissions are rejected locally instead of being queued or sent.
pub struct OrderSession<B, S = LocalInvoiceSequence, C = SystemClock> {
    backend: B,
    projector: InvoiceProjector<S, C>,
    inner: Mutex<SessionInner>,
    in_flight: AtomicBool,
}

impl<B: PosBackend> OrderSession<B> {
    /// Creates a session with a fresh local sequence and the system clock.
    pub fn with_backend(backend: B) -> Self {
        Self::new(backend, InvoiceProjector::default())
    }
}

impl<B, S, C> OrderSession<B, S, C>
where
    B: PosBackend,
    S: InvoiceSequence,
    C: Clock,
{
    /// Creates an idle session.
    pub fn new(backend: B, projector: InvoiceProjector<S, C>) -> Self {
        Self {
            backend,
            projector,
            inner: Mutex::new(SessionInner::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn projector(&self) -> &InvoiceProjector<S, C> {
        &self.projector
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn selected_table(&self) -> Option<TableNumber> {
        self.lock().table
    }

    /// The pending order the cart was loaded from, if any.
    pub fn current_order_id(&self) -> Option<InvoiceId> {
        self.lock().order_id
    }

    /// A copy of the cart as it is now.
    pub fn cart(&self) -> Cart {
        self.lock().cart.clone()
    }

    pub fn grand_total(&self) -> Money {
        self.lock().cart.grand_total()
    }

    /// Returns true while a save or checkout is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The pending orders the session currently knows about.
    pub fn pending_orders(&self) -> Vec<InvoiceRecord> {
        self.lock().pending.clone()
    }

    /// Replaces the known pending orders (non-pending records are ignored).
    pub fn set_pending_orders(&self, orders: Vec<InvoiceRecord>) {
        let mut inner = self.lock();
        inner.pending = orders.into_iter().filter(InvoiceRecord::is_pending).collect();
    }

    /// Fetches pending orders from the backend; returns how many there are.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_pending(&self) -> Result<usize> {
        let orders = self
            .backend
            .list_pending_orders()
            .await
            .map_err(|e| self.failed("refresh_pending", e))?;
        self.set_pending_orders(orders);
        let count = self.lock().pending.len();
        tracing::debug!(count, "Refreshed pending orders");
        Ok(count)
    }

    /// Board of tables `1..=n` marking those with a pending order.
    pub fn table_board(&self, settings: &BusinessSettings) -> TableBoard {
        TableBoard::from_settings(settings, &self.lock().pending)
    }

    /// Selects `table`, loading its pending order into the cart if one exists.
    ///
    /// The previous cart is discarded either way.
    pub fn select_table(&self, table: TableNumber) -> SessionState {
        let mut inner = self.lock();
        let existing = inner
            .pending
            .iter()
            .find(|order| order.table_number == Some(table))
            .cloned();

        inner.table = Some(table);
        match existing {
            Some(order) => {
                inner.cart.replace_from_invoice(&order);
                inner.order_id = Some(order.id);
                inner.state = SessionState::TableSelectedWithPendingOrder;
                tracing::info!(%table, order_id = %order.id, lines = inner.cart.item_count(), "Loaded pending order");
            }
            None => {
                inner.cart.clear();
                inner.order_id = None;
                inner.state = SessionState::TableSelectedEmpty;
                tracing::info!(%table, "Selected empty table");
            }
        }
        inner.state
    }

    /// Drops the table context and empties the cart.
    pub fn deselect_table(&self) -> SessionState {
        let mut inner = self.lock();
        inner.reset();
        tracing::info!("Deselected table");
        inner.state
    }

    pub fn add_item(&self, product: CartProduct) -> CartChange {
        self.mutate(|cart| cart.add(product))
    }

    pub fn remove_item(&self, id: ItemId) -> CartChange {
        self.mutate(|cart| cart.remove(id))
    }

    /// Sets a line's quantity; zero or less removes the line.
    pub fn set_quantity(&self, id: ItemId, quantity: i64) -> CartChange {
        self.mutate(|cart| cart.set_quantity(id, quantity))
    }

    pub fn clear_cart(&self) -> CartChange {
        self.mutate(Cart::clear)
    }

    fn mutate(&self, apply: impl FnOnce(&mut Cart) -> CartChange) -> CartChange {
        let mut inner = self.lock();
        let change = apply(&mut inner.cart);
        if change.is_change() && inner.state.has_table() {
            inner.state = SessionState::TableSelectedDirty;
        }
        tracing::debug!(change = %change, state = %inner.state, "Cart mutated");
        change
    }

    /// Projects the current cart under a local invoice number; no network call.
    pub fn preview(&self, customer: CustomerDetails, payment_mode: Option<&str>) -> InvoiceProjection {
        let inner = self.lock();
        match inner.table {
            Some(table) => {
                self.projector
                    .project_for_table(&inner.cart, table, customer, payment_mode)
            }
            None => self.projector.project(&inner.cart, customer, payment_mode),
        }
    }

    /// Saves the cart as the selected table's pending order.
    ///
    /// Updates the table's existing order when one was loaded, otherwise
    /// creates one. Without a table or with an empty cart nothing is sent.
    ///
    /// On success the session returns to `NoTableSelected` if it still holds
    /// exactly what was sent. Edits made to the same table while the request
    /// was outstanding are kept and now target the saved order. A session
    /// that moved to another table is left alone.
    #[tracing::instrument(skip(self))]
    pub async fn save(&self) -> Result<InvoiceRecord> {
        let (snapshot, payload) = self.prepare_save().map_err(|e| self.rejected("save", e))?;
        let _submission = self.begin_submission().map_err(|e| self.rejected("save", e))?;

        let result = match snapshot.order_id {
            Some(id) => self.backend.update_invoice(id, &payload).await,
            None => self.backend.create_invoice(&payload).await,
        };
        let saved = result.map_err(|e| self.failed("save", e))?;
        let table = snapshot.table;

        {
            let mut inner = self.lock();
            inner.upsert_pending(saved.clone());
            if inner.is_context_of(Some(table), snapshot.order_id) {
                if inner.cart == snapshot.cart {
                    inner.reset();
                } else {
                    inner.order_id = Some(saved.id);
                    tracing::info!(%table, invoice_id = %saved.id, "Kept edits made during save");
                }
            } else {
                tracing::info!(%table, invoice_id = %saved.id, "Session moved on during save");
            }
        }

        let operation = if snapshot.order_id.is_some() { "update" } else { "create" };
        metrics::counter!("pos_orders_saved_total", "operation" => operation).increment(1);
        tracing::info!(%table, invoice_id = %saved.id, operation, "Order saved");
        Ok(saved)
    }

    fn prepare_save(&self) -> Result<(SaveSnapshot, InvoicePayload)> {
        let inner = self.lock();
        let table = inner.table.ok_or(ValidationError::NoTableSelected)?;
        if inner.cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let payload = InvoicePayload {
            customer_name: Some(format!("Table {table}")),
            customer_phone: None,
            table_number: Some(table),
            status: Some(InvoiceStatus::Pending),
            payment_mode: DEFAULT_PAYMENT_MODE.to_string(),
            items: inner.cart.payload_items(),
        };
        let snapshot = SaveSnapshot {
            table,
            order_id: inner.order_id,
            cart: inner.cart.clone(),
        };
        Ok((snapshot, payload))
    }

    /// Bills the cart directly as a completed invoice.
    ///
    /// The cart is cleared only once the backend confirms, and only if the
    /// session is still on the table it was billed from. A cart loaded from
    /// a saved table order must be finalised with [`complete`](Self::complete).
    #[tracing::instrument(skip(self, customer))]
    pub async fn checkout(
        &self,
        customer: CustomerDetails,
        payment_mode: Option<&str>,
    ) -> Result<InvoiceProjection> {
        let payload = self
            .prepare_checkout(customer, payment_mode)
            .map_err(|e| self.rejected("checkout", e))?;
        let _submission = self.begin_submission().map_err(|e| self.rejected("checkout", e))?;

        let invoice = self
            .backend
            .create_invoice(&payload)
            .await
            .map_err(|e| self.failed("checkout", e))?;

        {
            let mut inner = self.lock();
            if inner.is_context_of(payload.table_number, None) {
                inner.reset();
            }
        }

        metrics::counter!("pos_checkouts_total").increment(1);
        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = %invoice.total_amount,
            "Checkout completed"
        );
        Ok(self.projector.project_from_server_invoice(&invoice))
    }

    fn prepare_checkout(
        &self,
        customer: CustomerDetails,
        payment_mode: Option<&str>,
    ) -> Result<InvoicePayload> {
        let inner = self.lock();
        if let Some(order_id) = inner.order_id {
            return Err(ValidationError::PendingOrderLoaded(order_id).into());
        }
        if inner.cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let customer = CustomerDetails::new(customer.name.as_deref(), customer.phone.as_deref());
        Ok(InvoicePayload {
            customer_name: customer.name,
            customer_phone: customer.phone,
            table_number: inner.table,
            status: None,
            payment_mode: payment_mode
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_PAYMENT_MODE)
                .to_string(),
            items: inner.cart.payload_items(),
        })
    }

    /// Finalises a pending order with customer details.
    ///
    /// The order need not be the one loaded in the cart; if it is, the session
    /// returns to `NoTableSelected`.
    #[tracing::instrument(skip(self, completion))]
    pub async fn complete(
        &self,
        order_id: InvoiceId,
        completion: Completion,
    ) -> Result<InvoiceProjection> {
        let invoice = self
            .backend
            .complete_invoice(order_id, &completion)
            .await
            .map_err(|e| self.failed("complete", e))?;

        {
            let mut inner = self.lock();
            inner.pending.retain(|order| order.id != order_id);
            if inner.order_id == Some(order_id) {
                inner.reset();
            }
        }

        metrics::counter!("pos_orders_completed_total").increment(1);
        tracing::info!(%order_id, payment_mode = %completion.payment_mode, "Order completed");
        Ok(self.projector.project_from_server_invoice(&invoice))
    }

    fn begin_submission(&self) -> Result<SubmissionGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::InFlight)?;
        Ok(SubmissionGuard {
            flag: &self.in_flight,
        })
    }

    fn rejected(&self, operation: &'static str, error: SessionError) -> SessionError {
        metrics::counter!("pos_session_rejections_total", "reason" => error.reason()).increment(1);
        tracing::warn!(operation, reason = error.reason(), error = %error, "Rejected locally");
        error
    }

    fn failed(&self, operation: &'static str, error: BackendError) -> SessionError {
        let error = SessionError::from(error);
        tracing::warn!(operation, reason = error.reason(), error = %error, "Backend request failed");
        error
    }
}
