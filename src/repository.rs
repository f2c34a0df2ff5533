//! Customer Repository
//!
//! The system of record the sample service caches in front of.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{CacheError, Result};
use crate::models::Customer;

/// Persistence contract for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_by_id(&self, id: i32) -> Result<Option<Customer>>;

    /// All customers ordered by id.
    async fn list_all(&self) -> Result<Vec<Customer>>;

    /// Inserts `customer` under a fresh id and returns the stored record.
    async fn add(&self, customer: Customer) -> Result<Customer>;

    /// Overwrites an existing customer; `NotFound` if the id is unknown.
    async fn update(&self, customer: &Customer) -> Result<()>;

    /// Deletes a customer; `NotFound` if the id is unknown.
    async fn delete(&self, id: i32) -> Result<()>;
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i32, Customer>,
    last_id: i32,
}

/// Customer repository held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    table: RwLock<Table>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the three demo customers.
    pub fn seeded() -> Self {
        Self::with_customers(vec![
            Customer::new(1, "Ahmed", "Qaid", 20),
            Customer::new(2, "Ali", "Mohammed", 30),
            Customer::new(3, "Saud", "Alfadhli", 40),
        ])
    }

    pub fn with_customers(customers: Vec<Customer>) -> Self {
        let last_id = customers.iter().map(|c| c.id).max().unwrap_or(0);
        let rows = customers.into_iter().map(|c| (c.id, c)).collect();
        Self {
            table: RwLock::new(Table { rows, last_id }),
        }
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get_by_id(&self, id: i32) -> Result<Option<Customer>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Customer>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn add(&self, mut customer: Customer) -> Result<Customer> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        customer.id = table.last_id;
        table.rows.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: &Customer) -> Result<()> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&customer.id) {
            Some(existing) => {
                *existing = customer.clone();
                Ok(())
            }
            None => Err(CacheError::NotFound(format!("customer {}", customer.id))),
        }
    }

    async fn delete(&self, id: i32) -> Result<()> {
        match self.table.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(format!("customer {}", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_lists_in_id_order() {
        let repo = InMemoryCustomerRepository::seeded();
        let ids: Vec<i32> = repo.list_all().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_add_assigns_next_id() {
        let repo = InMemoryCustomerRepository::seeded();

        let added = repo
            .add(Customer::new(0, "Mona", "Saleh", 55))
            .await
            .unwrap();

        assert_eq!(added.id, 4);
        assert_eq!(repo.get_by_id(4).await.unwrap(), Some(added));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let repo = InMemoryCustomerRepository::new();
        let result = repo.update(&Customer::new(9, "X", "Y", 1)).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryCustomerRepository::seeded();

        repo.delete(2).await.unwrap();

        assert_eq!(repo.get_by_id(2).await.unwrap(), None);
        assert!(matches!(repo.delete(2).await, Err(CacheError::NotFound(_))));
    }
}
