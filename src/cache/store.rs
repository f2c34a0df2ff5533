//! Store Contract Module
//!
//! The byte-oriented key-value store the cache manager is built on.

use async_trait::async_trait;

use crate::cache::CacheEntryOptions;
use crate::error::Result;

// == Distributed Cache Trait ==
/// A key-value store holding opaque byte blobs with per-entry expiration.
///
/// Implementations own expiration and eviction. A missing key is not an
/// error: `get` returns `Ok(None)` and `refresh`/`remove` do nothing.
/// Transport failures should be reported as `CacheError::StoreUnavailable`.
#[async_trait]
pub trait DistributedCache: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: Vec<u8>, options: &CacheEntryOptions) -> Result<()>;

    /// Resets the sliding expiration of an entry without reading it.
    fn refresh(&self, key: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    async fn get_async(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn set_async(
        &self,
        key: &str,
        value: Vec<u8>,
        options: &CacheEntryOptions,
    ) -> Result<()>;

    async fn refresh_async(&self, key: &str) -> Result<()>;

    async fn remove_async(&self, key: &str) -> Result<()>;
}
