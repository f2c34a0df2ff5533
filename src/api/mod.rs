//! API Module
//!
//! HTTP handlers and routing for the sample customer service.
//!
//! # Endpoints
//! - `GET|POST /api/customer` - List or create customers
//! - `GET|PUT|DELETE /api/customer/:id` - Read, update or delete a customer
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
