// ============================================================================
// Credential Issuer
// ============================================================================
//
// POST /channel-access
//
// Resolves the caller's current guild, computes the minimal capability
// set (join + send on exactly that group) and returns a signed,
// time-bounded transport credential plus the connection URI.
//
// ============================================================================

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::GatewayError;
use crate::message::{ChannelAccessRequest, ChannelAccessResponse};
use crate::metrics;
use crate::scope::{scope_for, PlayerId};
use crate::utils::log_safe_id;

/// POST /channel-access
///
/// Membership is resolved fresh on every call. A player who was just
/// kicked must not receive rights to the old guild's channel, so a
/// failed resolution is surfaced rather than papered over with any
/// cached value.
pub async fn issue_channel_access(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<ChannelAccessRequest>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(request) = payload.map_err(|e| GatewayError::BadRequest(e.body_text()))?;

    let player = PlayerId::parse(&request.player_id)
        .ok_or_else(|| GatewayError::BadRequest("player_id must be non-empty".to_string()))?;

    let guild = match ctx.membership.guild_of(&player).await {
        Ok(guild) => guild,
        Err(e) => {
            metrics::MEMBERSHIP_FAILURES_TOTAL.inc();
            return Err(e);
        }
    };
    let guild = guild.ok_or(GatewayError::NoGuild)?;

    let scope = scope_for(&player, &guild);

    let issued = match ctx
        .transport
        .issue_credential(&scope, ctx.config.credential_ttl())
        .await
    {
        Ok(issued) => issued,
        Err(e) => {
            metrics::TRANSPORT_FAILURES_TOTAL.inc();
            return Err(e);
        }
    };

    metrics::CREDENTIALS_ISSUED_TOTAL.inc();
    tracing::info!(
        player_hash = %log_safe_id(player.as_str(), &ctx.config.log_hash_salt),
        group = %guild.as_str(),
        ttl_minutes = ctx.config.credential_ttl_minutes,
        "Issued channel credential"
    );

    Ok(Json(ChannelAccessResponse {
        group_id: guild.as_str().to_string(),
        transport_uri: issued.transport_uri,
        credential: issued.token,
        expires_in_minutes: ctx.config.credential_ttl_minutes,
        capabilities: scope.roles(),
    }))
}
