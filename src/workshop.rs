//! The workshop facade: one object owning stores, gate, bus and config
//!
//! Every dashboard screen talks to a [`Workshop`]. Apart from
//! [`login`](Workshop::login) and [`logout`](Workshop::logout), every
//! operation takes the `&Session` the login returned and is refused with
//! `SessionExpired` once that session stops being the live one.
//!
//! Mutations publish [`WorkshopEvent`]s on the internal bus. Order events
//! that map to a notification toggle (new order, status change, completion)
//! are published only when their toggle is on; everything else is published
//! unconditionally.

use crate::config::AppConfig;
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::{EntityError, OficinaResult};
use crate::core::events::{CustomerEvent, EventBus, EventEnvelope, OrderEvent, WorkshopEvent};
use crate::core::ids::OrderId;
use crate::core::status::OrderStatus;
use crate::entities::customer::{Customer, CustomerDraft};
use crate::entities::order::{OrderDraft, ServiceOrder, StatusChange};
use crate::metrics::{self, DashboardStats, WeeklyComparison};
use crate::render::OrderDocumentRenderer;
use crate::session::{CredentialVerifier, Session, SessionGate, StaticCredentialVerifier};
use crate::storage::{CustomerStore, OrderStore};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Builder assembling a [`Workshop`] from its parts
pub struct WorkshopBuilder {
    config: AppConfig,
    verifier: Option<Arc<dyn CredentialVerifier>>,
    clock: Option<Arc<dyn Clock>>,
}

impl WorkshopBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default_config(),
            verifier: None,
            clock: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Plug in a credential verifier other than the demo account
    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Pin the clock (tests)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> OficinaResult<Workshop> {
        let verifier = self
            .verifier
            .unwrap_or_else(|| Arc::new(StaticCredentialVerifier::demo()));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let renderer = OrderDocumentRenderer::new(self.config.business_name.clone())?;
        let gate = SessionGate::new(verifier)
            .with_timeout(self.config.login_timeout())
            .with_clock(clock.clone());

        Ok(Workshop {
            config: self.config,
            clock,
            customers: CustomerStore::new(),
            orders: OrderStore::new(),
            events: EventBus::default(),
            gate,
            renderer,
        })
    }
}

impl Default for WorkshopBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The session-scoped dashboard core
pub struct Workshop {
    config: AppConfig,
    clock: Arc<dyn Clock>,
    customers: CustomerStore,
    orders: OrderStore,
    events: EventBus,
    gate: SessionGate,
    renderer: OrderDocumentRenderer,
}

impl Workshop {
    /// Start building a workshop
    pub fn builder() -> WorkshopBuilder {
        WorkshopBuilder::new()
    }

    /// A workshop with the given config, demo verifier and system clock
    pub fn new(config: AppConfig) -> OficinaResult<Self> {
        Self::builder().with_config(config).build()
    }

    /// The active configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Subscribe to the event bus
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    // === Session ===

    /// Verify credentials and establish the session
    pub async fn login(&self, email: &str, password: &str) -> OficinaResult<Session> {
        self.gate.login(email, password).await
    }

    /// Destroy the current session
    pub fn logout(&self, session: &Session) -> OficinaResult<()> {
        self.gate.logout(session)
    }

    // === Customers ===

    /// Register a new customer
    pub fn register_customer(
        &self,
        session: &Session,
        draft: CustomerDraft,
    ) -> OficinaResult<Customer> {
        self.gate.guard(session)?;
        let customer = self.customers.register(draft, self.clock.now())?;

        tracing::info!(customer_id = %customer.id, name = %customer.name, "customer registered");
        self.events
            .publish(WorkshopEvent::Customer(CustomerEvent::Registered {
                customer_id: customer.id,
                name: customer.name.clone(),
            }));

        Ok(customer)
    }

    /// Get one customer
    pub fn get_customer(&self, session: &Session, id: &Uuid) -> OficinaResult<Customer> {
        self.gate.guard(session)?;
        self.customers
            .get(id)?
            .ok_or_else(|| EntityError::CustomerNotFound { id: *id }.into())
    }

    /// All customers in registration order
    pub fn list_customers(&self, session: &Session) -> OficinaResult<Vec<Customer>> {
        self.gate.guard(session)?;
        self.customers.list()
    }

    /// Customers matching the quick-search query
    pub fn search_customers(&self, session: &Session, query: &str) -> OficinaResult<Vec<Customer>> {
        self.gate.guard(session)?;
        self.customers.search(query)
    }

    /// Update a customer's contact data
    ///
    /// Orders opened earlier keep the name they were opened with.
    pub fn update_customer(
        &self,
        session: &Session,
        id: &Uuid,
        draft: CustomerDraft,
    ) -> OficinaResult<Customer> {
        self.gate.guard(session)?;
        let customer = self.customers.update_contact(id, draft)?;

        self.events
            .publish(WorkshopEvent::Customer(CustomerEvent::Updated {
                customer_id: customer.id,
            }));

        Ok(customer)
    }

    /// Delete a customer without open orders
    ///
    /// Refused with `CustomerHasOpenOrders` while any of the customer's
    /// orders still counts as open work. Closed orders survive the deletion
    /// and keep showing the cached customer name.
    pub fn delete_customer(&self, session: &Session, id: &Uuid) -> OficinaResult<Customer> {
        self.gate.guard(session)?;

        let open = self.orders.open_count_for(id)?;
        if open > 0 {
            return Err(EntityError::CustomerHasOpenOrders { id: *id, open }.into());
        }

        let customer = self.customers.remove(id)?;

        tracing::info!(customer_id = %customer.id, "customer deleted");
        self.events
            .publish(WorkshopEvent::Customer(CustomerEvent::Deleted {
                customer_id: customer.id,
            }));

        Ok(customer)
    }

    /// How many of a customer's orders still count as open work
    pub fn open_orders_for(&self, session: &Session, customer_id: &Uuid) -> OficinaResult<usize> {
        self.gate.guard(session)?;
        self.orders.open_count_for(customer_id)
    }

    // === Orders ===

    /// Validate an intake draft and open a new order
    pub fn open_order(&self, session: &Session, draft: OrderDraft) -> OficinaResult<ServiceOrder> {
        self.gate.guard(session)?;

        let customer = self
            .customers
            .get(&draft.customer_id)?
            .ok_or(EntityError::UnknownCustomer {
                id: draft.customer_id,
            })?;

        let order = self.orders.intake(draft, &customer, self.clock.now())?;

        tracing::info!(order_id = %order.id, customer = %order.customer_name, "service order opened");
        if self.config.notifications.new_order {
            self.events.publish(WorkshopEvent::Order(OrderEvent::Created {
                order_id: order.id,
                customer_id: order.customer_id,
                service: order.service.clone(),
            }));
        }

        Ok(order)
    }

    /// Get one order
    pub fn get_order(&self, session: &Session, id: &OrderId) -> OficinaResult<ServiceOrder> {
        self.gate.guard(session)?;
        self.orders
            .get(id)?
            .ok_or_else(|| EntityError::OrderNotFound { id: *id }.into())
    }

    /// All orders in intake order
    pub fn list_orders(&self, session: &Session) -> OficinaResult<Vec<ServiceOrder>> {
        self.gate.guard(session)?;
        self.orders.list()
    }

    /// Orders matching the quick-search query
    pub fn search_orders(
        &self,
        session: &Session,
        query: &str,
    ) -> OficinaResult<Vec<ServiceOrder>> {
        self.gate.guard(session)?;
        self.orders.search(query)
    }

    /// All orders belonging to one customer
    pub fn orders_for_customer(
        &self,
        session: &Session,
        customer_id: &Uuid,
    ) -> OficinaResult<Vec<ServiceOrder>> {
        self.gate.guard(session)?;
        self.orders.for_customer(customer_id)
    }

    /// The `n` most recently opened orders, newest first
    pub fn recent_orders(&self, session: &Session, n: usize) -> OficinaResult<Vec<ServiceOrder>> {
        self.gate.guard(session)?;
        self.orders.recent(n)
    }

    /// Update an order's workbench details (not its status)
    pub fn update_order(
        &self,
        session: &Session,
        id: &OrderId,
        draft: OrderDraft,
    ) -> OficinaResult<ServiceOrder> {
        self.gate.guard(session)?;
        self.orders.update_details(id, draft)
    }

    /// Move an order to the status named by `status_text`
    ///
    /// The text is parsed against the closed status set; anything else is
    /// `InvalidStatus`. Events go out only when the status actually changed,
    /// and only when the matching notification toggle is on: completion has
    /// its own toggle, every other change uses the status-change toggle.
    pub fn change_order_status(
        &self,
        session: &Session,
        id: &OrderId,
        status_text: &str,
    ) -> OficinaResult<StatusChange> {
        self.gate.guard(session)?;

        let new_status = OrderStatus::parse(status_text)?;
        let outcome = self.orders.change_status(id, new_status, self.clock.now())?;

        if outcome.changed {
            tracing::info!(
                order_id = %outcome.order.id,
                from = %outcome.previous,
                to = %outcome.order.status,
                "order status changed"
            );

            let completed = new_status == OrderStatus::Completed;
            let wanted = if completed {
                self.config.notifications.order_completed
            } else {
                self.config.notifications.status_change
            };
            if wanted {
                self.events
                    .publish(WorkshopEvent::Order(OrderEvent::StatusChanged {
                        order_id: outcome.order.id,
                        from: outcome.previous,
                        to: outcome.order.status,
                        completed_at: completed.then_some(outcome.order.completed_at).flatten(),
                    }));
            }
        }

        Ok(outcome)
    }

    /// Delete an order
    pub fn delete_order(&self, session: &Session, id: &OrderId) -> OficinaResult<ServiceOrder> {
        self.gate.guard(session)?;
        let order = self.orders.remove(id)?;

        tracing::info!(order_id = %order.id, "service order deleted");
        self.events
            .publish(WorkshopEvent::Order(OrderEvent::Deleted { order_id: order.id }));

        Ok(order)
    }

    /// Insert an order that already has an id (seed data, restores)
    pub fn import_order(&self, session: &Session, order: ServiceOrder) -> OficinaResult<()> {
        self.gate.guard(session)?;
        self.orders.import(order)
    }

    // === Dashboard ===

    /// The four headline numbers
    pub fn dashboard(&self, session: &Session) -> OficinaResult<DashboardStats> {
        self.gate.guard(session)?;
        let orders = self.orders.list()?;
        Ok(metrics::dashboard_stats(&orders, self.clock.now()))
    }

    /// Current-vs-previous week money figures
    pub fn weekly_summary(&self, session: &Session) -> OficinaResult<WeeklyComparison> {
        self.gate.guard(session)?;
        let orders = self.orders.list()?;
        Ok(metrics::weekly_comparison(&orders))
    }

    // === Documents ===

    /// Render an order as a printable HTML document
    pub fn print_order(&self, session: &Session, id: &OrderId) -> OficinaResult<String> {
        self.gate.guard(session)?;
        let order = self
            .orders
            .get(id)?
            .ok_or(EntityError::OrderNotFound { id: *id })?;

        tracing::debug!(order_id = %order.id, "rendering order document");
        self.renderer.render(&order, self.clock.now())
    }
}
