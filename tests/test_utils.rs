// ============================================================================
// Shared test utilities
// ============================================================================
//
// spawn_app binds the gateway to an ephemeral port with in-memory mock
// collaborators behind the trait seams:
// - MockMembership: mutable player -> guild map, so tests can exercise
//   membership changes between calls (kick, guild switch).
// - MockTransport: signs real HS256 credentials (so tests can decode
//   them) and records every publish.
//
// ============================================================================

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use guildgate::config::Config;
use guildgate::context::AppContext;
use guildgate::error::{GatewayError, GatewayResult};
use guildgate::membership::MembershipResolver;
use guildgate::routes::create_router;
use guildgate::scope::{ChannelScope, GuildId, PlayerId};
use guildgate::transport::{ChannelTransport, CredentialClaims, IssuedCredential};

pub const TEST_ACCESS_KEY: &str = "integration-test-access-key-000000000000";

pub struct MockMembership {
    guilds: Mutex<HashMap<String, String>>,
    unavailable: Mutex<bool>,
}

impl MockMembership {
    pub fn new() -> Self {
        Self {
            guilds: Mutex::new(HashMap::new()),
            unavailable: Mutex::new(false),
        }
    }

    /// Sets or clears a player's guild, as the external membership
    /// system would on join/leave/kick.
    pub fn set_guild(&self, player: &str, guild: Option<&str>) {
        let mut guilds = self.guilds.lock().unwrap();
        match guild {
            Some(g) => {
                guilds.insert(player.to_string(), g.to_string());
            }
            None => {
                guilds.remove(player);
            }
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }
}

#[async_trait]
impl MembershipResolver for MockMembership {
    async fn guild_of(&self, player: &PlayerId) -> GatewayResult<Option<GuildId>> {
        if *self.unavailable.lock().unwrap() {
            return Err(GatewayError::UpstreamUnavailable(
                "mock resolver down".to_string(),
            ));
        }
        Ok(self
            .guilds
            .lock()
            .unwrap()
            .get(player.as_str())
            .and_then(|g| GuildId::parse(g)))
    }
}

pub struct MockTransport {
    encoding_key: EncodingKey,
    published: Mutex<Vec<(String, String)>>,
    fail_issue: Mutex<bool>,
    fail_publish: Mutex<bool>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(TEST_ACCESS_KEY.as_bytes()),
            published: Mutex::new(Vec::new()),
            fail_issue: Mutex::new(false),
            fail_publish: Mutex::new(false),
        }
    }

    /// Every (group, payload) pair the gateway published, in order.
    pub fn published(&self) -> Vec<(String, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn set_fail_issue(&self, fail: bool) {
        *self.fail_issue.lock().unwrap() = fail;
    }

    pub fn set_fail_publish(&self, fail: bool) {
        *self.fail_publish.lock().unwrap() = fail;
    }

    fn client_uri(group: &GuildId) -> String {
        format!(
            "wss://transport.test/client/hubs/guildchat?group={}",
            group.as_str()
        )
    }
}

#[async_trait]
impl ChannelTransport for MockTransport {
    async fn issue_credential(
        &self,
        scope: &ChannelScope,
        ttl: Duration,
    ) -> GatewayResult<IssuedCredential> {
        if *self.fail_issue.lock().unwrap() {
            return Err(GatewayError::Transport("mock signing failure".to_string()));
        }

        let transport_uri = Self::client_uri(&scope.group);
        let now = Utc::now().timestamp();
        let claims = CredentialClaims {
            sub: scope.subject.as_str().to_string(),
            aud: transport_uri.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
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
        if *self.fail_publish.lock().unwrap() {
            return Err(GatewayError::Transport("mock publish failure".to_string()));
        }
        self.published
            .lock()
            .unwrap()
            .push((group.as_str().to_string(), payload.to_string()));
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub membership: Arc<MockMembership>,
    pub transport: Arc<MockTransport>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

fn test_config() -> Config {
    Config {
        port: 0,
        membership_url: "http://membership.test".to_string(),
        transport_url: "https://transport.test".to_string(),
        transport_hub: "guildchat".to_string(),
        transport_access_key: TEST_ACCESS_KEY.to_string(),
        credential_ttl_minutes: 30,
        max_message_chars: 500,
        upstream_timeout_secs: 5,
        log_hash_salt: "test-salt".to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    let membership = Arc::new(MockMembership::new());
    let transport = Arc::new(MockTransport::new());

    let ctx = AppContext::new(
        membership.clone(),
        transport.clone(),
        Arc::new(test_config()),
    );
    let app = create_router(Arc::new(ctx));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test server crashed");
    });

    TestApp {
        address: format!("http://{}", addr),
        membership,
        transport,
    }
}

/// Decodes a credential issued by the mock transport, enforcing the
/// audience it was issued for.
pub fn decode_credential(token: &str, transport_uri: &str) -> CredentialClaims {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[transport_uri]);
    decode::<CredentialClaims>(
        token,
        &DecodingKey::from_secret(TEST_ACCESS_KEY.as_bytes()),
        &validation,
    )
    .expect("credential must decode with the hub access key")
    .claims
}
