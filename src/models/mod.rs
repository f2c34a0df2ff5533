//! Domain and response models for the sample customer service
//!
//! This module defines the customer entity, its cache keys, and the DTOs
//! serialized in HTTP responses.

pub mod customer;
pub mod responses;

// Re-export commonly used types
pub use customer::{Customer, CustomerCacheKeys};
pub use responses::{HealthResponse, StatsResponse};
