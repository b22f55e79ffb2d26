//! Proxy-Cheap residential connector: on-demand sticky sessions.
//!
//! A residential "proxy" is a session id the client embeds when it talks to
//! the provider gateway. Sessions are minted locally and exist as soon as
//! they are used, so no operation here calls the provider.

use crate::config::ProxyCheapResidentialConfig;
use crate::connector::{Connector, ConnectorDescriptor, ConnectorGroup};
use crate::error::Result;
use crate::proxy::{ProxyKeyToRemove, ProxyRefreshed, ProxyTransport};
use crate::utils;

use async_trait::async_trait;
use log::debug;
use std::collections::HashSet;

/// Connector type discriminant.
pub const CONNECTOR_PROXY_CHEAP_RESIDENTIAL_TYPE: &str = "proxy-cheap-residential";

/// Most sessions minted by one `create_proxies` call; larger requests are
/// partially fulfilled.
pub const MAX_SESSIONS_PER_CREATE: usize = 10_000;

/// Map a session id to a canonical record. Routing details live in the
/// gateway credentials, so the transport is empty.
pub fn convert_to_proxy(session: &str) -> ProxyRefreshed {
    ProxyRefreshed::started(
        CONNECTOR_PROXY_CHEAP_RESIDENTIAL_TYPE,
        session,
        session,
        ProxyTransport::Empty,
    )
}

/// Connector for Proxy-Cheap residential sessions.
pub struct ProxyCheapResidentialConnector {
    config: ProxyCheapResidentialConfig,
}

impl ProxyCheapResidentialConnector {
    pub fn new(config: ProxyCheapResidentialConfig) -> Self {
        Self { config }
    }
}

impl Default for ProxyCheapResidentialConnector {
    fn default() -> Self {
        Self::new(ProxyCheapResidentialConfig::default())
    }
}

#[async_trait]
impl Connector for ProxyCheapResidentialConnector {
    fn connector_type(&self) -> &'static str {
        CONNECTOR_PROXY_CHEAP_RESIDENTIAL_TYPE
    }

    fn descriptor(&self) -> ConnectorDescriptor {
        ConnectorDescriptor {
            name: "Proxy-Cheap Residential",
            description: "Proxy-Cheap residential network with on-demand sticky sessions",
            url: "https://www.proxy-cheap.com",
            group: ConnectorGroup::ProxiesServiceDynamic,
            can_install: false,
            can_uninstall: false,
            can_replace_proxy: false,
            use_certificate: false,
        }
    }

    async fn get_proxies(&self, keys: &HashSet<String>) -> Result<Vec<ProxyRefreshed>> {
        debug!("get_proxies: {} keys", keys.len());

        Ok(keys.iter().map(|k| convert_to_proxy(k)).collect())
    }

    async fn create_proxies(
        &self,
        count: usize,
        exclude_keys: &HashSet<String>,
    ) -> Result<Vec<ProxyRefreshed>> {
        debug!(
            "create_proxies: count={} exclude={}",
            count,
            exclude_keys.len()
        );

        let count = count.min(MAX_SESSIONS_PER_CREATE);
        let mut minted = HashSet::with_capacity(count);
        let mut proxies = Vec::with_capacity(count);
        while proxies.len() < count {
            let session = utils::random_session_id(self.config.session_length);
            if exclude_keys.contains(&session) || !minted.insert(session.clone()) {
                continue;
            }
            proxies.push(convert_to_proxy(&session));
        }

        Ok(proxies)
    }

    async fn start_proxies(&self, keys: &[String]) -> Result<()> {
        debug!("start_proxies: {} keys", keys.len());

        Ok(())
    }

    async fn remove_proxies(&self, keys: &[ProxyKeyToRemove]) -> Result<Vec<String>> {
        debug!("remove_proxies: {} keys", keys.len());

        // Forced or not, the gateway drops a session once the caller stops using it.
        Ok(keys.iter().map(|k| k.key.clone()).collect())
    }
}
