//! In-Memory Store Module
//!
//! A process-local `DistributedCache` backend with absolute and sliding
//! expiration, a capacity bound and a per-value size bound.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheEntryOptions, CacheStats, DistributedCache};
use crate::error::{CacheError, Result};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    total_bytes: usize,
}

impl Inner {
    fn drop_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let removed = self.entries.remove(key);
        if let Some(entry) = &removed {
            self.total_bytes -= entry.size();
        }
        removed
    }

    /// Removes `key` if it has expired, returning whether it did.
    fn expire_if_stale(&mut self, key: &str, now: i64) -> bool {
        let stale = self
            .entries
            .get(key)
            .map(|entry| entry.is_expired(now))
            .unwrap_or(false);
        if stale {
            self.drop_entry(key);
            self.stats.record_expirations(1);
        }
        stale
    }

    /// Evicts the entry that was read or written longest ago.
    fn evict_least_recent(&mut self) -> Option<String> {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone())?;
        self.drop_entry(&oldest);
        self.stats.record_eviction();
        Some(oldest)
    }
}

// == Memory Cache ==
/// In-memory store with LRU eviction and expiration support.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Largest blob accepted, in bytes
    max_value_size: usize,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` blobs of at most
    /// `max_value_size` bytes each.
    pub fn new(max_entries: usize, max_value_size: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_entries,
            max_value_size,
        }
    }

    /// Creates a store sized from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.max_entries, config.max_value_size)
    }

    fn read(&self, key: &str) -> Option<Vec<u8>> {
        let now = current_timestamp_ms();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if inner.expire_if_stale(key, now) {
            trace!(key, "entry expired on read");
        }

        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.touch(now);
                let value = entry.value.clone();
                inner.stats.record_hit();
                Some(value)
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    fn write(&self, key: &str, value: Vec<u8>, options: &CacheEntryOptions) -> Result<()> {
        if value.len() > self.max_value_size {
            return Err(CacheError::ValueTooLarge {
                key: key.to_string(),
                size: value.len(),
                limit: self.max_value_size,
            });
        }

        let now = current_timestamp_ms();
        let mut inner = self.inner.lock();

        let is_overwrite = inner.drop_entry(key).is_some();
        if !is_overwrite && inner.entries.len() >= self.max_entries {
            match inner.evict_least_recent() {
                Some(evicted) => debug!(evicted = %evicted, "evicted entry to make room"),
                None => {
                    return Err(CacheError::StoreUnavailable(
                        "memory cache has no capacity".to_string(),
                    ))
                }
            }
        }

        let entry = CacheEntry::new(value, options, now);
        inner.total_bytes += entry.size();
        inner.entries.insert(key.to_string(), entry);
        inner.stats.record_write();
        Ok(())
    }

    fn touch(&self, key: &str) {
        let now = current_timestamp_ms();
        let mut inner = self.inner.lock();
        if !inner.expire_if_stale(key, now) {
            if let Some(entry) = inner.entries.get_mut(key) {
                entry.touch(now);
            }
        }
    }

    fn delete(&self, key: &str) {
        self.inner.lock().drop_entry(key);
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut inner = self.inner.lock();

        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.drop_entry(key);
        }
        inner.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_totals(inner.entries.len(), inner.total_bytes);
        stats
    }

    /// Number of entries currently held, including ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DistributedCache for MemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read(key))
    }

    fn set(&self, key: &str, value: Vec<u8>, options: &CacheEntryOptions) -> Result<()> {
        self.write(key, value, options)
    }

    fn refresh(&self, key: &str) -> Result<()> {
        self.touch(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.delete(key);
        Ok(())
    }

    async fn get_async(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read(key))
    }

    async fn set_async(
        &self,
        key: &str,
        value: Vec<u8>,
        options: &CacheEntryOptions,
    ) -> Result<()> {
        self.write(key, value, options)
    }

    async fn refresh_async(&self, key: &str) -> Result<()> {
        self.touch(key);
        Ok(())
    }

    async fn remove_async(&self, key: &str) -> Result<()> {
        self.delete(key);
        Ok(())
    }
}
