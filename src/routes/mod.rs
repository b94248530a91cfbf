// ============================================================================
// Gateway Routes
// ============================================================================
//
// - mod.rs: router assembly
// - channel_access.rs: POST /channel-access (credential issuer)
// - relay.rs: POST /relay-message (relay dispatcher)
// - health.rs: health check and metrics endpoints
//
// ============================================================================

mod channel_access;
mod health;
mod relay;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;

/// Create the main application router with all routes
pub fn create_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/channel-access", post(channel_access::issue_channel_access))
        .route("/relay-message", post(relay::relay_message))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
