use anyhow::{Context, Result};
use std::time::Duration;

// ============================================================================
// Configuration Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8080;

/// Credential lifetime handed to the transport; the transport enforces
/// expiry, the gateway only stamps it.
const DEFAULT_CREDENTIAL_TTL_MINUTES: i64 = 30;

/// Relay body cap in characters (after trimming). Policy knob, not a
/// hard protocol limit.
const DEFAULT_MAX_MESSAGE_CHARS: usize = 500;

/// Deadline for each upstream call (membership resolution, transport
/// publish). A hung upstream must not hang the request.
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

const DEFAULT_TRANSPORT_HUB: &str = "guildchat";

/// Minimum length of the transport access key used to sign credentials.
const MIN_ACCESS_KEY_LEN: usize = 32;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Clone, Debug)]
pub struct Config {
    /// Port the gateway listens on.
    pub port: u16,
    /// Base URL of the membership resolver service.
    pub membership_url: String,
    /// Base URL of the pub/sub transport's REST surface.
    pub transport_url: String,
    /// Transport hub all guild groups live under.
    pub transport_hub: String,
    /// Shared access key used to sign channel credentials.
    pub transport_access_key: String,
    pub credential_ttl_minutes: i64,
    pub max_message_chars: usize,
    pub upstream_timeout_secs: u64,
    /// Salt for hashing player identifiers in logs.
    pub log_hash_salt: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let membership_url = std::env::var("MEMBERSHIP_URL")
            .context("MEMBERSHIP_URL must be set (base URL of the membership resolver)")?;
        let transport_url = std::env::var("TRANSPORT_URL")
            .context("TRANSPORT_URL must be set (base URL of the pub/sub transport)")?;

        let transport_access_key = std::env::var("TRANSPORT_ACCESS_KEY")
            .context("TRANSPORT_ACCESS_KEY must be set (credential signing key)")?;
        validate_access_key(&transport_access_key)?;

        let credential_ttl_minutes =
            env_or("CREDENTIAL_TTL_MINUTES", DEFAULT_CREDENTIAL_TTL_MINUTES)?;
        validate_credential_ttl(credential_ttl_minutes)?;

        Ok(Self {
            port: env_or("GATEWAY_PORT", DEFAULT_PORT)?,
            membership_url: trim_base_url(&membership_url),
            transport_url: trim_base_url(&transport_url),
            transport_hub: std::env::var("TRANSPORT_HUB")
                .unwrap_or_else(|_| DEFAULT_TRANSPORT_HUB.to_string()),
            transport_access_key,
            credential_ttl_minutes,
            max_message_chars: env_or("MAX_MESSAGE_CHARS", DEFAULT_MAX_MESSAGE_CHARS)?,
            upstream_timeout_secs: env_or(
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?,
            log_hash_salt: std::env::var("LOG_HASH_SALT")
                .unwrap_or_else(|_| "guildgate".to_string()),
        })
    }

    pub fn credential_ttl(&self) -> Duration {
        Duration::from_secs((self.credential_ttl_minutes as u64) * 60)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

fn validate_access_key(key: &str) -> Result<()> {
    if key.len() < MIN_ACCESS_KEY_LEN {
        anyhow::bail!(
            "TRANSPORT_ACCESS_KEY must be at least {} characters long; generate one with: openssl rand -base64 32",
            MIN_ACCESS_KEY_LEN
        );
    }
    Ok(())
}

fn validate_credential_ttl(minutes: i64) -> Result<()> {
    if minutes <= 0 {
        anyhow::bail!("CREDENTIAL_TTL_MINUTES must be positive (got {})", minutes);
    }
    Ok(())
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} is invalid: {}", name, e)),
        Err(_) => Ok(default),
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
