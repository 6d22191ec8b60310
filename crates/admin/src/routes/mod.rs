//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /                       - Bulk run form
//! POST /run-bulk               - Trigger a bulk metafield run (JSON or form body)
//! ```

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod bulk;

/// Build the application router with state attached.
pub fn app(state: AppState) -> Router {
    routes().with_state(state)
}

/// All routes, awaiting state.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(bulk::router())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
