// ============================================================================
// Relay Dispatcher
// ============================================================================
//
// POST /relay-message
//
// Publishes a sender's message into their guild's group. The target
// group is always recomputed from current membership; the request shape
// carries no group field and unknown fields are rejected, so a forged
// group id never reaches dispatch.
//
// ============================================================================

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::GatewayError;
use crate::message::{validate_body, DeliveryAck, RelayMessage, RelayRequest};
use crate::metrics;
use crate::scope::PlayerId;
use crate::utils::log_safe_id;

/// POST /relay-message
///
/// No automatic retry on publish failure: messages are not idempotent
/// and a blind retry could duplicate a visible chat line. Retry policy
/// belongs to the caller.
pub async fn relay_message(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(request) = payload.map_err(|e| GatewayError::BadRequest(e.body_text()))?;

    let sender = PlayerId::parse(&request.sender_id)
        .ok_or_else(|| GatewayError::BadRequest("sender_id must be non-empty".to_string()))?;

    // Validate before any upstream call; a bad body must never reach
    // the resolver or the transport.
    let body = validate_body(&request.body, ctx.config.max_message_chars)?;

    let guild = match ctx.membership.guild_of(&sender).await {
        Ok(guild) => guild,
        Err(e) => {
            metrics::MEMBERSHIP_FAILURES_TOTAL.inc();
            return Err(e);
        }
    };
    let guild = guild.ok_or(GatewayError::NoGuild)?;

    let message = RelayMessage::new(sender, guild, body);
    let payload = message.formatted();

    if let Err(e) = ctx.transport.publish(&message.group_id, &payload).await {
        metrics::TRANSPORT_FAILURES_TOTAL.inc();
        return Err(e);
    }

    metrics::MESSAGES_RELAYED_TOTAL.inc();
    tracing::info!(
        sender_hash = %log_safe_id(message.sender_id.as_str(), &ctx.config.log_hash_salt),
        group = %message.group_id.as_str(),
        chars = message.body.chars().count(),
        "Relayed message to group"
    );

    Ok(Json(DeliveryAck {
        group_id: message.group_id.as_str().to_string(),
        formatted_payload: payload,
    }))
}
