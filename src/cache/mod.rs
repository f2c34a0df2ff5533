//! Cache Module
//!
//! The key-value store contract, the expiration policy it consumes, and an
//! in-memory backend.

mod entry;
mod memory;
mod options;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryCache;
pub use options::CacheEntryOptions;
pub use stats::CacheStats;
pub use store::DistributedCache;

// == Public Constants ==
/// Default per-value size bound of the in-memory store (1 MiB)
pub const DEFAULT_MAX_VALUE_SIZE: usize = 1024 * 1024;
