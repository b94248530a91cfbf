use std::sync::Arc;

use crate::config::Config;
use crate::membership::MembershipResolver;
use crate::transport::ChannelTransport;

/// Application context containing shared dependencies.
///
/// Holds only immutable clients and config behind `Arc`s: there is no
/// cross-request mutable state in the gateway, so handlers run fully
/// concurrently without locking.
#[derive(Clone)]
pub struct AppContext {
    pub membership: Arc<dyn MembershipResolver>,
    pub transport: Arc<dyn ChannelTransport>,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(
        membership: Arc<dyn MembershipResolver>,
        transport: Arc<dyn ChannelTransport>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            membership,
            transport,
            config,
        }
    }
}
