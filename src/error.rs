use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway error taxonomy.
///
/// Every failure surfaced to a caller is one of these kinds; the calling
/// UI decides between a retry affordance (`UpstreamUnavailable`,
/// `Transport`) and a "join a guild first" affordance (`NoGuild`).
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("player has no guild")]
    NoGuild,

    #[error("membership resolver unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NoGuild => StatusCode::CONFLICT,
            GatewayError::UpstreamUnavailable(_) | GatewayError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "BAD_REQUEST",
            GatewayError::NoGuild => "NO_GUILD",
            GatewayError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            GatewayError::Transport(_) => "TRANSPORT_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a user-friendly error message (without sensitive details)
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::BadRequest(msg) => format!("Bad request: {}", msg),
            GatewayError::NoGuild => "Join a guild before using guild chat".to_string(),
            GatewayError::UpstreamUnavailable(_) => "Membership service unavailable".to_string(),
            GatewayError::Transport(_) => "Chat transport unavailable".to_string(),
            GatewayError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::CONFLICT {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Request rejected by membership state"
            );
        } else {
            tracing::debug!(error = %self, error_code = %code, "Client error occurred");
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let body = json!({
            "error": self.user_message(),
            "error_code": self.error_code(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
