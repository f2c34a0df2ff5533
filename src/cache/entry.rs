//! Cache Entry Module
//!
//! A stored blob and its expiration bookkeeping.

use chrono::Utc;

use crate::cache::CacheEntryOptions;

// == Cache Entry ==
/// Represents a single blob held by the in-memory store.
///
/// All timestamps are Unix milliseconds.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Last read or refresh; the sliding window starts here
    pub last_accessed: i64,
    /// Hard expiration instant, None = no absolute expiration
    pub absolute_expiration: Option<i64>,
    /// Sliding window length in milliseconds, None = no sliding expiration
    pub sliding_expiration: Option<i64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry written at `now` under the given policy.
    pub fn new(value: Vec<u8>, options: &CacheEntryOptions, now: i64) -> Self {
        Self {
            value,
            last_accessed: now,
            absolute_expiration: options.absolute_expiration.map(|at| at.timestamp_millis()),
            sliding_expiration: options
                .sliding_expiration
                .map(|window| i64::try_from(window.as_millis()).unwrap_or(i64::MAX)),
        }
    }

    // == Expires At ==
    /// Returns the instant this entry expires if it is not touched again.
    ///
    /// The sliding window never extends the entry past its absolute expiration.
    pub fn expires_at(&self) -> Option<i64> {
        let sliding = self
            .sliding_expiration
            .map(|window| self.last_accessed.saturating_add(window));

        match (self.absolute_expiration, sliding) {
            (Some(absolute), Some(sliding)) => Some(absolute.min(sliding)),
            (absolute, sliding) => absolute.or(sliding),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its expiration instant.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expires_at() {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Touch ==
    /// Restarts the sliding window.
    pub fn touch(&mut self, now: i64) {
        self.last_accessed = now;
    }

    /// Size of the stored blob in bytes.
    pub fn size(&self) -> usize {
        self.value.len()
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
