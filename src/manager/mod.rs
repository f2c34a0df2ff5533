//! Cache Manager Module
//!
//! Typed facade over a [`DistributedCache`]: single JSON-encoded values and
//! ordered lists of values stored as one blob per key.
//!
//! # Concurrency
//! Every list operation is a read-decode-mutate-encode-write sequence against
//! the store with no compare-and-swap or lock. List mutations are therefore
//! **not linearizable**: two overlapping mutations of the same key race and
//! the later write silently replaces the earlier one. Callers that need every
//! mutation to persist must serialize writes to a key themselves.
//!
//! # Cancellation
//! The `_async` variants take a [`CancellationToken`]. Cancellation is
//! observed before each store call and while it is pending; a cancelled call
//! returns [`CacheError::Cancelled`] and a cancelled list mutation never
//! issues its write.

mod codec;
mod list;
mod ordering;


use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cache::{CacheEntryOptions, DistributedCache};
use crate::error::{CacheError, Result};

pub use ordering::SortOrder;

// == Cache Manager ==
/// Typed JSON operations on top of a byte-oriented key-value store.
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn DistributedCache>,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("store", &self.store.name())
            .finish()
    }
}

impl CacheManager {
    // == Constructor ==
    pub fn new(store: Arc<dyn DistributedCache>) -> Self {
        Self { store }
    }

    // == Get ==
    /// Reads and decodes the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored. Bytes that do not decode as
    /// `T` are reported as [`CacheError::Serialization`].
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        validate_key(key)?;
        match self.store.get(key)? {
            Some(bytes) => codec::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    pub async fn get_async<T: DeserializeOwned>(
        &self,
        key: &str,
        token: &CancellationToken,
    ) -> Result<Option<T>> {
        validate_key(key)?;
        match cancellable(token, self.store.get_async(key)).await? {
            Some(bytes) => codec::decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    // == Set ==
    /// Encodes `value` and stores it under `key`, replacing any existing entry.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: &CacheEntryOptions,
    ) -> Result<()> {
        let bytes = prepare_set(key, value, options)?;
        self.store.set(key, bytes, options)?;
        debug!(key, store = self.store.name(), "cached value");
        Ok(())
    }

    pub async fn set_async<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: &CacheEntryOptions,
        token: &CancellationToken,
    ) -> Result<()> {
        let bytes = prepare_set(key, value, options)?;
        cancellable(token, self.store.set_async(key, bytes, options)).await?;
        debug!(key, store = self.store.name(), "cached value");
        Ok(())
    }

    // == Refresh ==
    /// Restarts the sliding expiration of `key` without touching its content.
    pub fn refresh(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.store.refresh(key)
    }

    pub async fn refresh_async(&self, key: &str, token: &CancellationToken) -> Result<()> {
        validate_key(key)?;
        cancellable(token, self.store.refresh_async(key)).await
    }

    // == Remove ==
    /// Deletes the entry under `key`. Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.store.remove(key)
    }

    pub async fn remove_async(&self, key: &str, token: &CancellationToken) -> Result<()> {
        validate_key(key)?;
        cancellable(token, self.store.remove_async(key)).await
    }
}

// == Validation ==
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::invalid_argument("key", "must not be empty"));
    }
    Ok(())
}

fn prepare_set<T: Serialize + ?Sized>(
    key: &str,
    value: &T,
    options: &CacheEntryOptions,
) -> Result<Vec<u8>> {
    validate_key(key)?;
    codec::ensure_present("value", value)?;
    options.validate()?;
    codec::encode(value)
}

/// Runs a store call unless `token` is cancelled first.
async fn cancellable<F, R>(token: &CancellationToken, call: F) -> Result<R>
where
    F: Future<Output = Result<R>>,
{
    if token.is_cancelled() {
        return Err(CacheError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(CacheError::Cancelled),
        result = call => result,
    }
}
