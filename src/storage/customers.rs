//! In-memory customer store

use crate::core::error::{EntityError, OficinaResult};
use crate::core::search;
use crate::entities::customer::{Customer, CustomerDraft};
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Thread-safe customer registry
///
/// Backed by an `IndexMap` so listings come back in registration order;
/// the quick filter relies on that order being stable.
#[derive(Clone)]
pub struct CustomerStore {
    customers: Arc<RwLock<IndexMap<Uuid, Customer>>>,
}

impl CustomerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            customers: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Validate and register a new customer
    pub fn register(&self, draft: CustomerDraft, now: DateTime<Utc>) -> OficinaResult<Customer> {
        draft.validate()?;

        let customer = Customer::from_draft(draft, Uuid::new_v4(), now);

        let mut customers = self
            .customers
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        customers.insert(customer.id, customer.clone());

        Ok(customer)
    }

    /// Get a customer by id
    pub fn get(&self, id: &Uuid) -> OficinaResult<Option<Customer>> {
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(customers.get(id).cloned())
    }

    /// List all customers in registration order
    pub fn list(&self) -> OficinaResult<Vec<Customer>> {
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(customers.values().cloned().collect())
    }

    /// Update a customer's contact data
    ///
    /// Id and registration date are immutable; everything else comes from
    /// the draft. Orders keep the customer name they were opened with.
    pub fn update_contact(&self, id: &Uuid, draft: CustomerDraft) -> OficinaResult<Customer> {
        draft.validate()?;

        let mut customers = self
            .customers
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let customer = customers
            .get_mut(id)
            .ok_or(EntityError::CustomerNotFound { id: *id })?;

        customer.name = draft.name;
        customer.phone = draft.phone;
        customer.email = draft.email;
        customer.address = draft.address;

        Ok(customer.clone())
    }

    /// Remove a customer, returning the removed record
    ///
    /// The open-order check lives in the workshop facade, which sees both
    /// stores; this method only removes.
    pub fn remove(&self, id: &Uuid) -> OficinaResult<Customer> {
        let mut customers = self
            .customers
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        customers
            .shift_remove(id)
            .ok_or_else(|| EntityError::CustomerNotFound { id: *id }.into())
    }

    /// Filter customers by the quick-search query
    pub fn search(&self, query: &str) -> OficinaResult<Vec<Customer>> {
        Ok(search::filter(self.list()?, query))
    }

    /// Number of registered customers
    pub fn count(&self) -> OficinaResult<usize> {
        let customers = self
            .customers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(customers.len())
    }
}

impl Default for CustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::OficinaError;

    fn draft(name: &str, phone: &str, email: &str) -> CustomerDraft {
        CustomerDraft::new(name, phone, email, "Rua das Flores, 123")
    }

    #[test]
    fn test_register_and_get() {
        let store = CustomerStore::new();
        let customer = store
            .register(
                draft("Maria Santos", "(11) 99999-1111", "maria@email.com"),
                Utc::now(),
            )
            .unwrap();

        let found = store.get(&customer.id).unwrap().unwrap();
        assert_eq!(found.name, "Maria Santos");
        assert_eq!(found, customer);
    }

    #[test]
    fn test_register_rejects_invalid_draft() {
        let store = CustomerStore::new();
        let result = store.register(draft("", "", ""), Utc::now());
        assert!(matches!(result, Err(OficinaError::Validation(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let store = CustomerStore::new();
        for name in ["Maria Santos", "João Silva", "Ana Costa"] {
            store
                .register(
                    draft(name, "(11) 98888-0000", "contact@email.com"),
                    Utc::now(),
                )
                .unwrap();
        }

        let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Maria Santos", "João Silva", "Ana Costa"]);
    }

    #[test]
    fn test_update_contact_preserves_identity() {
        let store = CustomerStore::new();
        let registered_at = Utc::now();
        let customer = store
            .register(
                draft("Maria Santos", "(11) 99999-1111", "maria@email.com"),
                registered_at,
            )
            .unwrap();

        let updated = store
            .update_contact(
                &customer.id,
                draft("Maria S. Oliveira", "(11) 97777-2222", "maria@email.com"),
            )
            .unwrap();

        assert_eq!(updated.id, customer.id);
        assert_eq!(updated.registered_at, registered_at);
        assert_eq!(updated.name, "Maria S. Oliveira");
        assert_eq!(updated.phone, "(11) 97777-2222");
    }

    #[test]
    fn test_update_missing_customer_fails() {
        let store = CustomerStore::new();
        let result = store.update_contact(
            &Uuid::new_v4(),
            draft("Ghost", "(11) 90000-0000", "ghost@email.com"),
        );
        assert!(matches!(
            result,
            Err(OficinaError::Entity(EntityError::CustomerNotFound { .. }))
        ));
    }

    #[test]
    fn test_remove_returns_the_record() {
        let store = CustomerStore::new();
        let customer = store
            .register(
                draft("Maria Santos", "(11) 99999-1111", "maria@email.com"),
                Utc::now(),
            )
            .unwrap();

        let removed = store.remove(&customer.id).unwrap();
        assert_eq!(removed.id, customer.id);
        assert!(store.get(&customer.id).unwrap().is_none());

        let again = store.remove(&customer.id);
        assert!(matches!(
            again,
            Err(OficinaError::Entity(EntityError::CustomerNotFound { .. }))
        ));
    }

    #[test]
    fn test_remove_keeps_order_of_the_rest() {
        let store = CustomerStore::new();
        let mut ids = Vec::new();
        for name in ["A", "B", "C"] {
            ids.push(
                store
                    .register(
                        draft(name, "(11) 98888-0000", "contact@email.com"),
                        Utc::now(),
                    )
                    .unwrap()
                    .id,
            );
        }

        store.remove(&ids[1]).unwrap();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_search_matches_name_email_and_phone() {
        let store = CustomerStore::new();
        store
            .register(
                draft("Maria Santos", "(11) 99999-1111", "maria@email.com"),
                Utc::now(),
            )
            .unwrap();
        store
            .register(
                draft("João Silva", "(11) 98888-2222", "joao@email.com"),
                Utc::now(),
            )
            .unwrap();

        let hits = store.search("maria").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Maria Santos");

        let hits = store.search("joao@").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "João Silva");

        let hits = store.search("99999").unwrap();
        assert_eq!(hits.len(), 1);

        let all = store.search("").unwrap();
        assert_eq!(all.len(), 2);
    }
}
