//! Membership resolution: the single source of truth for authorization
//! scope. Re-read on every request; the gateway never caches or trusts
//! a caller-supplied guild id.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{GatewayError, GatewayResult};
use crate::scope::{GuildId, PlayerId};

#[async_trait]
pub trait MembershipResolver: Send + Sync {
    /// Current guild of a player, or `None` if the player has no guild.
    async fn guild_of(&self, player: &PlayerId) -> GatewayResult<Option<GuildId>>;
}

/// HTTP client against the external membership service.
///
/// `GET {base}/players/{id}/guild` → `200 {"guild_id": "..."|null}`;
/// `404` also means "no guild". Anything else (timeout, connect error,
/// 5xx) surfaces as `UpstreamUnavailable` so the caller can retry with
/// backoff.
pub struct HttpMembershipResolver {
    client: reqwest::Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct GuildOfResponse {
    guild_id: Option<String>,
}

impl HttpMembershipResolver {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()?;

        let base = Url::parse(base_url).context("invalid membership resolver base URL")?;

        Ok(Self { client, base })
    }

    /// Per-player lookup URL. The player id is an opaque string and
    /// goes in as a single percent-encoded path segment, so a reserved
    /// character (`/`, `?`, `#`, space) cannot misroute the request.
    fn guild_url(&self, player: &PlayerId) -> GatewayResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GatewayError::Internal("membership base URL cannot carry paths".to_string())
            })?
            .pop_if_empty()
            .extend(["players", player.as_str(), "guild"]);
        Ok(url)
    }
}

#[async_trait]
impl MembershipResolver for HttpMembershipResolver {
    async fn guild_of(&self, player: &PlayerId) -> GatewayResult<Option<GuildId>> {
        let url = self.guild_url(player)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::UpstreamUnavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: GuildOfResponse = response
                    .json()
                    .await
                    .map_err(|e| GatewayError::UpstreamUnavailable(e.to_string()))?;
                Ok(body.guild_id.as_deref().and_then(GuildId::parse))
            }
            status => Err(GatewayError::UpstreamUnavailable(format!(
                "membership resolver returned {}",
                status
            ))),
        }
    }
}
