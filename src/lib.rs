//! Distributed Cache - typed values and ordered lists over a key-value cache
//!
//! [`CacheManager`] stores JSON-encoded values and lists of values in any
//! [`DistributedCache`] backend. [`MemoryCache`] is the bundled in-process
//! backend; the `api` module is a sample customer service built on both.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod repository;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheEntryOptions, DistributedCache, MemoryCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use manager::{CacheManager, SortOrder};
pub use tasks::spawn_cleanup_task;
