//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod extract;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_handler).post(create_handler))
        .route("/timers/start-all", post(start_all_handler))
        .route("/timers/pause-all", post(pause_all_handler))
        .route("/timers/:id", get(get_handler).delete(delete_handler))
        .route("/timers/:id/toggle", post(toggle_handler))
        .route("/timers/:id/start", post(start_handler))
        .route("/timers/:id/pause", post(pause_handler))
        .route("/timers/:id/restart", post(restart_handler))
        .route("/timers/:id/half-alert", put(half_alert_handler))
        .route("/history", get(history_handler))
        .route("/categories", get(categories_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
