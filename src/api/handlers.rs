//! API Handlers
//!
//! HTTP request handlers for the sample customer service. Reads go through
//! the cache first and fall back to the repository; writes update the
//! repository, the per-customer entry and the customer list entry.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::{CacheEntryOptions, DistributedCache, MemoryCache};
use crate::config::{Config, EntryOptionsSettings};
use crate::error::{CacheError, Result};
use crate::manager::{CacheManager, SortOrder};
use crate::models::{Customer, CustomerCacheKeys, HealthResponse, StatsResponse};
use crate::repository::{CustomerRepository, InMemoryCustomerRepository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Typed cache facade
    pub cache: CacheManager,
    /// The store behind `cache`, kept for cleanup and stats
    pub store: Arc<MemoryCache>,
    /// System of record
    pub repository: Arc<dyn CustomerRepository>,
    /// Expiration applied to every write
    pub entry_options: EntryOptionsSettings,
    /// Cancelled on shutdown; stops the sweep, aborts pending cache reads
    /// and turns away writes that have not touched the repository yet
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Creates a new AppState over the given store and repository.
    pub fn new(
        store: Arc<MemoryCache>,
        repository: Arc<dyn CustomerRepository>,
        entry_options: EntryOptionsSettings,
    ) -> Self {
        Self {
            cache: CacheManager::new(store.clone()),
            store,
            repository,
            entry_options,
            shutdown: CancellationToken::new(),
        }
    }

    /// Creates a new AppState from configuration, with the demo customers seeded.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(MemoryCache::from_config(config)),
            Arc::new(InMemoryCustomerRepository::seeded()),
            config.entry_options.clone(),
        )
    }

    fn options(&self) -> CacheEntryOptions {
        CacheEntryOptions::from_settings(&self.entry_options)
    }

    fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    /// Token for a write request. Fails once shutdown has begun, before the
    /// repository is touched. The returned token is detached from shutdown so
    /// the cache sync after a committed repository write always runs to the end.
    fn write_token(&self) -> Result<CancellationToken> {
        if self.shutdown.is_cancelled() {
            return Err(CacheError::Cancelled);
        }
        Ok(CancellationToken::new())
    }
}

/// Handler for GET /api/customer
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<Customer>>> {
    let token = state.request_token();

    if let Some(customers) = state
        .cache
        .get_async::<Vec<Customer>>(CustomerCacheKeys::LIST, &token)
        .await?
    {
        return Ok(Json(customers));
    }

    debug!("customer list not cached, loading from repository");
    let customers = state.repository.list_all().await?;
    state
        .cache
        .set_async(CustomerCacheKeys::LIST, &customers, &state.options(), &token)
        .await?;

    Ok(Json(customers))
}

/// Handler for GET /api/customer/:id
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Customer>> {
    let token = state.request_token();
    let key = CustomerCacheKeys::item(customer_id);

    if let Some(customer) = state.cache.get_async::<Customer>(&key, &token).await? {
        return Ok(Json(customer));
    }

    let customer = state
        .repository
        .get_by_id(customer_id)
        .await?
        .ok_or_else(|| CacheError::NotFound(format!("customer {}", customer_id)))?;
    state
        .cache
        .set_async(&key, &customer, &state.options(), &token)
        .await?;

    Ok(Json(customer))
}

/// Handler for POST /api/customer
///
/// The new customer is appended to the cached list, which is kept ordered by
/// id, newest first. Nothing is appended if the list is not cached yet.
pub async fn create_customer(
    State(state): State<AppState>,
    Json(customer): Json<Customer>,
) -> Result<Json<Customer>> {
    customer.validate()?;
    let token = state.write_token()?;
    let options = state.options();

    let customer = state.repository.add(customer).await?;
    state
        .cache
        .set_async(&CustomerCacheKeys::item(customer.id), &customer, &options, &token)
        .await?;
    state
        .cache
        .add_to_list_ordered_async(
            CustomerCacheKeys::LIST,
            customer.clone(),
            |c: &Customer| c.id,
            SortOrder::Descending,
            &options,
            &token,
        )
        .await?;

    info!(customer_id = customer.id, "customer created");
    Ok(Json(customer))
}

/// Handler for PUT /api/customer/:id
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    Json(customer): Json<Customer>,
) -> Result<Json<Customer>> {
    if customer.id != customer_id {
        return Err(CacheError::BadRequest(format!(
            "path id {} does not match body id {}",
            customer_id, customer.id
        )));
    }
    customer.validate()?;
    let token = state.write_token()?;
    let options = state.options();

    state.repository.update(&customer).await?;
    state
        .cache
        .set_async(&CustomerCacheKeys::item(customer_id), &customer, &options, &token)
        .await?;
    state
        .cache
        .update_in_list_ordered_async(
            CustomerCacheKeys::LIST,
            |c: &Customer| c.id == customer_id,
            customer.clone(),
            |c: &Customer| c.id,
            SortOrder::Descending,
            &options,
            &token,
        )
        .await?;

    info!(customer_id, "customer updated");
    Ok(Json(customer))
}

/// Handler for DELETE /api/customer/:id
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> Result<StatusCode> {
    if state.repository.get_by_id(customer_id).await?.is_none() {
        return Err(CacheError::NotFound(format!("customer {}", customer_id)));
    }
    let token = state.write_token()?;

    state
        .cache
        .remove_from_list_async(
            CustomerCacheKeys::LIST,
            |c: &Customer| c.id == customer_id,
            &state.options(),
            &token,
        )
        .await?;
    state
        .cache
        .remove_async(&CustomerCacheKeys::item(customer_id), &token)
        .await?;
    state.repository.delete(customer_id).await?;

    info!(customer_id, "customer deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.store.name(), &state.store.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::new(
            Arc::new(MemoryCache::new(100, 64 * 1024)),
            Arc::new(InMemoryCustomerRepository::seeded()),
            EntryOptionsSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_list_customers_populates_cache() {
        let state = test_state();

        let Json(customers) = list_customers(State(state.clone())).await.unwrap();

        assert_eq!(customers.len(), 3);
        let cached = state
            .cache
            .get::<Vec<Customer>>(CustomerCacheKeys::LIST)
            .unwrap();
        assert_eq!(cached, Some(customers));
    }

    #[tokio::test]
    async fn test_get_customer_unknown() {
        let state = test_state();

        let result = get_customer(State(state), Path(99)).await;

        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_customer_served_from_cache() {
        let state = test_state();
        let stale = Customer::new(1, "Cached", "Copy", 1);
        state
            .cache
            .set(&CustomerCacheKeys::item(1), &stale, &state.options())
            .unwrap();

        let Json(customer) = get_customer(State(state), Path(1)).await.unwrap();

        assert_eq!(customer, stale);
    }

    #[tokio::test]
    async fn test_create_adds_to_cached_list_newest_first() {
        let state = test_state();
        list_customers(State(state.clone())).await.unwrap();

        let Json(created) = create_customer(
            State(state.clone()),
            Json(Customer::new(0, "Mona", "Saleh", 55)),
        )
        .await
        .unwrap();

        assert_eq!(created.id, 4);
        let ids: Vec<i32> = state
            .cache
            .get::<Vec<Customer>>(CustomerCacheKeys::LIST)
            .unwrap()
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_create_without_cached_list_leaves_list_absent() {
        let state = test_state();

        create_customer(
            State(state.clone()),
            Json(Customer::new(0, "Mona", "Saleh", 55)),
        )
        .await
        .unwrap();

        assert_eq!(
            state
                .cache
                .get::<Vec<Customer>>(CustomerCacheKeys::LIST)
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_update_id_mismatch() {
        let state = test_state();

        let result = update_customer(
            State(state),
            Path(1),
            Json(Customer::new(2, "Ali", "Mohammed", 30)),
        )
        .await;

        assert!(matches!(result, Err(CacheError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_from_cached_list() {
        let state = test_state();
        list_customers(State(state.clone())).await.unwrap();

        let status = delete_customer(State(state.clone()), Path(2)).await.unwrap();

        assert_eq!(status, StatusCode::NO_CONTENT);
        let ids: Vec<i32> = state
            .cache
            .get::<Vec<Customer>>(CustomerCacheKeys::LIST)
            .unwrap()
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_cache_calls() {
        let state = test_state();
        state.shutdown.cancel();

        let result = list_customers(State(state)).await;

        assert!(matches!(result, Err(CacheError::Cancelled)));
    }

    #[tokio::test]
    async fn test_create_after_shutdown_leaves_repository_unchanged() {
        let state = test_state();
        list_customers(State(state.clone())).await.unwrap();
        state.shutdown.cancel();

        let result = create_customer(
            State(state.clone()),
            Json(Customer::new(0, "Mona", "Saleh", 55)),
        )
        .await;

        assert!(matches!(result, Err(CacheError::Cancelled)));
        assert_eq!(state.repository.list_all().await.unwrap().len(), 3);
        assert!(state.repository.get_by_id(4).await.unwrap().is_none());
        let cached = state
            .cache
            .get::<Vec<Customer>>(CustomerCacheKeys::LIST)
            .unwrap()
            .unwrap();
        assert_eq!(cached.len(), 3);
    }

    #[tokio::test]
    async fn test_update_after_shutdown_leaves_repository_unchanged() {
        let state = test_state();
        state.shutdown.cancel();

        let result = update_customer(
            State(state.clone()),
            Path(2),
            Json(Customer::new(2, "Ali", "Hassan", 35)),
        )
        .await;

        assert!(matches!(result, Err(CacheError::Cancelled)));
        let stored = state.repository.get_by_id(2).await.unwrap().unwrap();
        assert_eq!(stored.last_name.as_deref(), Some("Mohammed"));
    }

    #[tokio::test]
    async fn test_delete_after_shutdown_leaves_repository_unchanged() {
        let state = test_state();
        state.shutdown.cancel();

        let result = delete_customer(State(state.clone()), Path(3)).await;

        assert!(matches!(result, Err(CacheError::Cancelled)));
        assert!(state.repository.get_by_id(3).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_write_token_detached_from_shutdown() {
        let state = test_state();
        let token = state.write_token().unwrap();

        state.shutdown.cancel();

        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
