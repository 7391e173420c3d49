//! In-memory service order store

use crate::core::error::{EntityError, OficinaResult};
use crate::core::ids::{OrderId, OrderSequence};
use crate::core::search;
use crate::core::status::OrderStatus;
use crate::entities::customer::Customer;
use crate::entities::order::{OrderDraft, ServiceOrder, StatusChange};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Thread-safe order book
///
/// Orders are kept in intake order (`IndexMap`), and ids come from a
/// monotonic sequence: removing an order never frees its number.
#[derive(Clone)]
pub struct OrderStore {
    orders: Arc<RwLock<IndexMap<OrderId, ServiceOrder>>>,
    sequence: Arc<OrderSequence>,
}

impl OrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(IndexMap::new())),
            sequence: Arc::new(OrderSequence::new()),
        }
    }

    /// Validate an intake draft and open a new order for `customer`
    ///
    /// The customer's name is cached on the order so the order survives a
    /// later deletion of the customer record.
    pub fn intake(
        &self,
        draft: OrderDraft,
        customer: &Customer,
        now: DateTime<Utc>,
    ) -> OficinaResult<ServiceOrder> {
        draft.validate()?;

        let order = ServiceOrder::from_draft(draft, self.sequence.next_id(), &customer.name, now);

        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        orders.insert(order.id, order.clone());

        Ok(order)
    }

    /// Insert an order that already has an id (seed data, restores)
    ///
    /// The sequence is advanced past the imported id so subsequent intakes
    /// never collide with it.
    pub fn import(&self, order: ServiceOrder) -> OficinaResult<()> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if orders.contains_key(&order.id) {
            return Err(anyhow!("order {} already present", order.id).into());
        }

        self.sequence.observe(order.id);
        orders.insert(order.id, order);

        Ok(())
    }

    /// Get an order by id
    pub fn get(&self, id: &OrderId) -> OficinaResult<Option<ServiceOrder>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.get(id).cloned())
    }

    /// List all orders in intake order
    pub fn list(&self) -> OficinaResult<Vec<ServiceOrder>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.values().cloned().collect())
    }

    /// All orders belonging to one customer, in intake order
    pub fn for_customer(&self, customer_id: &Uuid) -> OficinaResult<Vec<ServiceOrder>> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders
            .values()
            .filter(|o| &o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    /// How many of a customer's orders still count as open work
    pub fn open_count_for(&self, customer_id: &Uuid) -> OficinaResult<usize> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders
            .values()
            .filter(|o| &o.customer_id == customer_id && o.is_open())
            .count())
    }

    /// The `n` most recently opened orders, newest first
    pub fn recent(&self, n: usize) -> OficinaResult<Vec<ServiceOrder>> {
        let mut all = self.list()?;
        // Stable sort: same-instant orders keep their intake order
        all.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        all.truncate(n);
        Ok(all)
    }

    /// Update an order's workbench details
    ///
    /// The owning customer is fixed at intake; `draft.customer_id` is
    /// ignored here, as are status, dates and the cached customer name.
    pub fn update_details(&self, id: &OrderId, draft: OrderDraft) -> OficinaResult<ServiceOrder> {
        draft.validate()?;

        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let order = orders
            .get_mut(id)
            .ok_or(EntityError::OrderNotFound { id: *id })?;

        order.service = draft.service;
        order.defect = draft.defect;
        order.budget = draft.budget;
        order.cost = draft.cost;
        order.cost_description = draft.cost_description;
        order.notes = draft.notes;
        order.week = draft.week;

        Ok(order.clone())
    }

    /// Move an order to `new_status`
    ///
    /// Completion stamping follows the order's own rule: stamped on entry
    /// into Completed, never cleared. The returned outcome says whether the
    /// status actually changed.
    pub fn change_status(
        &self,
        id: &OrderId,
        new_status: OrderStatus,
        now: DateTime<Utc>,
    ) -> OficinaResult<StatusChange> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let order = orders
            .get(id)
            .ok_or(EntityError::OrderNotFound { id: *id })?
            .clone();

        let outcome = order.apply_status(new_status, now);
        orders.insert(*id, outcome.order.clone());

        Ok(outcome)
    }

    /// Remove an order, returning the removed record
    pub fn remove(&self, id: &OrderId) -> OficinaResult<ServiceOrder> {
        let mut orders = self
            .orders
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        orders
            .shift_remove(id)
            .ok_or_else(|| EntityError::OrderNotFound { id: *id }.into())
    }

    /// Filter orders by the quick-search query
    pub fn search(&self, query: &str) -> OficinaResult<Vec<ServiceOrder>> {
        Ok(search::filter(self.list()?, query))
    }

    /// Number of orders on the book
    pub fn count(&self) -> OficinaResult<usize> {
        let orders = self
            .orders
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(orders.len())
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::OficinaError;
    use crate::entities::customer::CustomerDraft;
    use chrono::TimeZone;

    fn customer(name: &str) -> Customer {
        Customer::from_draft(
            CustomerDraft::new(name, "(11) 99999-1111", "contact@email.com", "Rua A, 1"),
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    fn draft(customer_id: Uuid, service: &str) -> OrderDraft {
        OrderDraft::new(customer_id, service, "does not power on").with_budget("100.00")
    }

    #[test]
    fn test_intake_allocates_sequential_ids() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");

        let first = store
            .intake(draft(maria.id, "Notebook repair"), &maria, Utc::now())
            .unwrap();
        let second = store
            .intake(draft(maria.id, "Phone screen"), &maria, Utc::now())
            .unwrap();

        assert_eq!(first.id.to_string(), "OS-001");
        assert_eq!(second.id.to_string(), "OS-002");
        assert_eq!(first.customer_name, "Maria Santos");
        assert_eq!(first.status, OrderStatus::Open);
    }

    #[test]
    fn test_intake_rejects_invalid_draft() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");

        let bad = OrderDraft::new(maria.id, "", "");
        assert!(store.intake(bad, &maria, Utc::now()).is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");

        let first = store
            .intake(draft(maria.id, "Repair A"), &maria, Utc::now())
            .unwrap();
        store
            .intake(draft(maria.id, "Repair B"), &maria, Utc::now())
            .unwrap();

        store.remove(&first.id).unwrap();

        let third = store
            .intake(draft(maria.id, "Repair C"), &maria, Utc::now())
            .unwrap();
        assert_eq!(third.id.to_string(), "OS-003");
    }

    #[test]
    fn test_import_advances_the_sequence() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");

        let seeded = ServiceOrder::from_draft(
            draft(maria.id, "Seeded repair"),
            OrderId::from_sequence(41),
            &maria.name,
            Utc::now(),
        );
        store.import(seeded.clone()).unwrap();

        // Importing the same id twice is refused
        assert!(store.import(seeded).is_err());

        let next = store
            .intake(draft(maria.id, "Fresh repair"), &maria, Utc::now())
            .unwrap();
        assert_eq!(next.id.to_string(), "OS-042");
    }

    #[test]
    fn test_change_status_stamps_completion() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");
        let order = store
            .intake(draft(maria.id, "Notebook repair"), &maria, Utc::now())
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 0, 0).unwrap();
        let outcome = store
            .change_status(&order.id, OrderStatus::Completed, now)
            .unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.order.completed_at, Some(now));

        // The stored record reflects the change
        let stored = store.get(&order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Completed);
        assert_eq!(stored.completed_at, Some(now));
    }

    #[test]
    fn test_change_status_on_missing_order_fails() {
        let store = OrderStore::new();
        let result = store.change_status(
            &OrderId::from_sequence(99),
            OrderStatus::Cancelled,
            Utc::now(),
        );
        assert!(matches!(
            result,
            Err(OficinaError::Entity(EntityError::OrderNotFound { .. }))
        ));
    }

    #[test]
    fn test_for_customer_and_open_count() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");
        let joao = customer("João Silva");

        let a = store
            .intake(draft(maria.id, "Repair A"), &maria, Utc::now())
            .unwrap();
        store
            .intake(draft(maria.id, "Repair B"), &maria, Utc::now())
            .unwrap();
        store
            .intake(draft(joao.id, "Repair C"), &joao, Utc::now())
            .unwrap();

        assert_eq!(store.for_customer(&maria.id).unwrap().len(), 2);
        assert_eq!(store.open_count_for(&maria.id).unwrap(), 2);

        store
            .change_status(&a.id, OrderStatus::Completed, Utc::now())
            .unwrap();
        assert_eq!(store.open_count_for(&maria.id).unwrap(), 1);

        store
            .change_status(&a.id, OrderStatus::Cancelled, Utc::now())
            .unwrap();
        assert_eq!(store.open_count_for(&maria.id).unwrap(), 1);
    }

    #[test]
    fn test_update_details_preserves_lifecycle_fields() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");
        let order = store
            .intake(draft(maria.id, "Notebook repair"), &maria, Utc::now())
            .unwrap();
        let completed = store
            .change_status(&order.id, OrderStatus::Completed, Utc::now())
            .unwrap()
            .order;

        let edit = OrderDraft::new(Uuid::new_v4(), "Notebook repair", "bad RAM")
            .with_budget("120.00")
            .with_cost("35.00", "RAM module");
        let updated = store.update_details(&order.id, edit).unwrap();

        assert_eq!(updated.id, order.id);
        assert_eq!(updated.customer_id, maria.id);
        assert_eq!(updated.customer_name, "Maria Santos");
        assert_eq!(updated.status, OrderStatus::Completed);
        assert_eq!(updated.completed_at, completed.completed_at);
        assert_eq!(updated.defect, "bad RAM");
        assert_eq!(updated.budget, "120.00");
    }

    #[test]
    fn test_recent_returns_newest_first() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");

        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        store.intake(draft(maria.id, "First"), &maria, t1).unwrap();
        store.intake(draft(maria.id, "Second"), &maria, t2).unwrap();
        store.intake(draft(maria.id, "Third"), &maria, t3).unwrap();

        let recent = store.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].service, "Second");
        assert_eq!(recent[1].service, "Third");
    }

    #[test]
    fn test_search_matches_id_name_and_service() {
        let store = OrderStore::new();
        let maria = customer("Maria Santos");
        let joao = customer("João Silva");

        store
            .intake(draft(maria.id, "Screen replacement"), &maria, Utc::now())
            .unwrap();
        store
            .intake(draft(joao.id, "Battery swap"), &joao, Utc::now())
            .unwrap();

        assert_eq!(store.search("os-001").unwrap().len(), 1);
        assert_eq!(store.search("maria").unwrap().len(), 1);
        assert_eq!(store.search("battery").unwrap().len(), 1);
        assert_eq!(store.search("").unwrap().len(), 2);
        assert_eq!(store.search("printer").unwrap().len(), 0);
    }
}
