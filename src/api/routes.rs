//! API Routes
//!
//! Configures the Axum router with all sample service endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_customer, delete_customer, get_customer, health_handler, list_customers,
    stats_handler, update_customer, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/customer` - List customers (cache-aside)
/// - `POST /api/customer` - Create a customer
/// - `GET /api/customer/:id` - Fetch a customer (cache-aside)
/// - `PUT /api/customer/:id` - Update a customer
/// - `DELETE /api/customer/:id` - Delete a customer
/// - `GET /stats` - Store statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/customer", get(list_customers).post(create_customer))
        .route(
            "/api/customer/:id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
