use anyhow::Result;
use std::sync::Arc;

pub mod config;
pub mod context;
pub mod error;
pub mod membership;
pub mod message;
pub mod metrics;
pub mod routes;
pub mod scope;
pub mod transport;
pub mod utils;

use config::Config;
use context::AppContext;
use membership::HttpMembershipResolver;
use transport::SignedChannelTransport;

/// Builds the application context from config: one pooled HTTP client
/// per upstream, both bounded by the configured deadline.
pub fn build_context(config: Config) -> Result<AppContext> {
    let timeout = config.upstream_timeout();

    let membership = HttpMembershipResolver::new(&config.membership_url, timeout)?;
    let transport = SignedChannelTransport::new(
        &config.transport_url,
        &config.transport_hub,
        &config.transport_access_key,
        timeout,
    )?;

    Ok(AppContext::new(
        Arc::new(membership),
        Arc::new(transport),
        Arc::new(config),
    ))
}
