use axum::http::header;
use axum::response::IntoResponse;

use crate::error::GatewayError;

/// GET /health
///
/// The gateway holds no state and no connections of its own; liveness
/// is the whole story. Upstream health is probed by callers retrying.
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /metrics
pub async fn metrics() -> Result<impl IntoResponse, GatewayError> {
    let body = crate::metrics::gather_metrics()
        .map_err(|e| GatewayError::Internal(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
