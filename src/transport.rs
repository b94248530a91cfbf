//! Pub/sub transport integration: client credential issuance and group
//! publish. Fan-out, delivery guarantees and credential expiry are the
//! transport's responsibility; the gateway's ends at a signed token and
//! an acknowledged publish.

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::scope::{ChannelScope, GuildId};

/// TTL of the service token attached to REST publish calls.
const SERVICE_TOKEN_TTL_SECS: i64 = 60;

/// A signed, time-bounded bearer credential plus the connection URI the
/// client presents it to. Never persisted server-side.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub token: String,
    pub transport_uri: String,
}

#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Signs a credential granting exactly the given scope for `ttl`.
    async fn issue_credential(
        &self,
        scope: &ChannelScope,
        ttl: Duration,
    ) -> GatewayResult<IssuedCredential>;

    /// Publishes a payload to all current subscribers of a group.
    async fn publish(&self, group: &GuildId, payload: &str) -> GatewayResult<()>;
}

/// Claims carried by a channel credential. The transport verifies these
/// on presentation; `roles` is the capability set from [`ChannelScope`].
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Subject: the player the credential was issued to.
    pub sub: String,
    /// Audience: the client connection URI the token is valid for.
    pub aud: String,
    /// Unique token id.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub roles: Vec<String>,
}

/// Production transport: HS256-signs client credentials with the hub
/// access key and publishes over the transport's REST surface.
pub struct SignedChannelTransport {
    base: Url,
    hub: String,
    encoding_key: EncodingKey,
    client: reqwest::Client,
}

impl SignedChannelTransport {
    pub fn new(
        base_url: &str,
        hub: &str,
        access_key: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base: Url::parse(base_url).context("invalid transport base URL")?,
            hub: hub.to_string(),
            encoding_key: EncodingKey::from_secret(access_key.as_bytes()),
            client,
        })
    }

    /// WebSocket connection URI a client holding a credential connects
    /// to. The group name is an opaque string and goes in as an encoded
    /// query value.
    fn client_uri(&self, group: &GuildId) -> GatewayResult<Url> {
        let mut url = self.base.clone();
        let ws_scheme = match url.scheme() {
            "https" => "wss",
            "http" => "ws",
            other => return Err(GatewayError::Transport(format!(
                "unsupported transport URL scheme {}",
                other
            ))),
        };
        url.set_scheme(ws_scheme)
            .map_err(|_| GatewayError::Transport("transport base URL rejected scheme".to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::Transport("transport base URL cannot carry paths".to_string()))?
            .pop_if_empty()
            .extend(["client", "hubs", self.hub.as_str()]);
        url.query_pairs_mut().append_pair("group", group.as_str());
        Ok(url)
    }

    /// REST publish URL; the group name is one percent-encoded path
    /// segment so reserved characters cannot misroute the call.
    fn publish_url(&self, group: &GuildId) -> GatewayResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Transport("transport base URL cannot carry paths".to_string()))?
            .pop_if_empty()
            .extend([
                "api",
                "hubs",
                self.hub.as_str(),
                "groups",
                group.as_str(),
                ":send",
            ]);
        Ok(url)
    }

    /// Short-lived token authenticating the gateway itself on REST calls.
    fn service_token(&self, audience: &str) -> GatewayResult<String> {
        let now = Utc::now().timestamp();
        let claims = CredentialClaims {
            sub: "guildgate".to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + SERVICE_TOKEN_TTL_SECS,
            roles: vec![],
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }
}

#[async_trait]
impl ChannelTransport for SignedChannelTransport {
    async fn issue_credential(
        &self,
        scope: &ChannelScope,
        ttl: Duration,
    ) -> GatewayResult<IssuedCredential> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| GatewayError::Transport(format!("invalid credential ttl: {}", e)))?;

        let transport_uri = self.client_uri(&scope.group)?.to_string();
        let issued_at = Utc::now();
        let claims = CredentialClaims {
            sub: scope.subject.as_str().to_string(),
            aud: transport_uri.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            roles: scope.roles(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(IssuedCredential {
            token,
            transport_uri,
        })
    }

    async fn publish(&self, group: &GuildId, payload: &str) -> GatewayResult<()> {
        let url = self.publish_url(group)?;
        let token = self.service_token(url.as_str())?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "payload": payload }))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(GatewayError::Transport(format!(
                "publish rejected with {}",
                response.status()
            )))
        }
    }
}
