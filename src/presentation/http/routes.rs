//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, security_headers, track_http_metrics};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        // Request metrics, then security headers on every response
        .layer(middleware::from_fn(track_http_metrics))
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new().nest("/chat-rooms", chat_room_routes(state))
}

/// Chat room routes (protected; the caller identity comes from the JWT)
fn chat_room_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/personal", post(handlers::chat_room::create_personal_room))
        .route("/group", post(handlers::chat_room::create_group_room))
        .route("/", get(handlers::chat_room::list_rooms))
        .route("/{room_id}", get(handlers::chat_room::get_room_detail))
        .route(
            "/{room_id}/messages",
            get(handlers::chat_room::get_room_messages),
        )
        .route("/{room_id}", patch(handlers::chat_room::edit_room))
        .route("/{room_id}", delete(handlers::chat_room::leave_room))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
