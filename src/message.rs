//! Typed request/response contracts and the ephemeral relay message.
//!
//! Requests reject unknown and missing fields at the boundary; in
//! particular the relay request carries no group field at all, so a
//! client-supplied guild id is a 400 before any dispatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, GatewayResult};
use crate::scope::{GuildId, PlayerId};

/// POST /channel-access request body
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelAccessRequest {
    pub player_id: String,
}

/// POST /channel-access response body
#[derive(Debug, Serialize)]
pub struct ChannelAccessResponse {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(rename = "transportURI")]
    pub transport_uri: String,
    pub credential: String,
    #[serde(rename = "expiresInMinutes")]
    pub expires_in_minutes: i64,
    pub capabilities: Vec<String>,
}

/// POST /relay-message request body
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayRequest {
    pub sender_id: String,
    pub body: String,
}

/// POST /relay-message response body: what was actually relayed, so the
/// sender's UI can echo it without waiting for the pub/sub round trip.
#[derive(Debug, Serialize)]
pub struct DeliveryAck {
    #[serde(rename = "groupId")]
    pub group_id: String,
    #[serde(rename = "formattedPayload")]
    pub formatted_payload: String,
}

/// One chat message in flight. Constructed per request, never stored;
/// `group_id` is always the server-side resolved guild.
#[derive(Debug, Clone)]
pub struct RelayMessage {
    pub sender_id: PlayerId,
    pub group_id: GuildId,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl RelayMessage {
    pub fn new(sender_id: PlayerId, group_id: GuildId, body: String) -> Self {
        Self {
            sender_id,
            group_id,
            body,
            sent_at: Utc::now(),
        }
    }

    /// Display line published to the group. Sender and body stay
    /// separable (single `": "` after the sender id).
    pub fn formatted(&self) -> String {
        format!("{}: {}", self.sender_id.as_str(), self.body)
    }
}

/// Validates and normalizes a relay body: trimmed, non-empty, at most
/// `max_chars` characters.
pub fn validate_body(raw: &str, max_chars: usize) -> GatewayResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::BadRequest(
            "message body must not be empty".to_string(),
        ));
    }
    let chars = trimmed.chars().count();
    if chars > max_chars {
        return Err(GatewayError::BadRequest(format!(
            "message body exceeds maximum of {} characters (got {})",
            max_chars, chars
        )));
    }
    Ok(trimmed.to_string())
}
