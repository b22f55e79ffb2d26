//! Hypeproxy connector: a fixed pool of 4G/5G dongle proxies.
//!
//! The account owns a bounded set of physical proxies. "Creating" proxies
//! selects unused ones from that set and removal never deallocates anything
//! provider-side; only forced removals reach the provider, as IP renewals.

mod api;

pub use api::{HypeproxyApi, HypeproxyClient, HypeproxyProxy};

use crate::config::HypeproxyConfig;
use crate::connector::{Connector, ConnectorDescriptor, ConnectorGroup};
use crate::error::{ConnectorError, RenewFailure, Result};
use crate::proxy::{ProxyAddress, ProxyAuth, ProxyKeyToRemove, ProxyRefreshed, ProxyTransport};
use crate::utils;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Connector type discriminant.
pub const CONNECTOR_HYPEPROXY_TYPE: &str = "hypeproxy";

/// Map one listed proxy to a canonical record.
///
/// Returns `None` when the entry lacks anything needed to route traffic,
/// which is what the provider reports for proxies still being provisioned.
pub fn convert_to_proxy(proxy: &HypeproxyProxy) -> Option<ProxyRefreshed> {
    let id = non_empty(&proxy.id)?;
    let hub = non_empty(&proxy.hub)?;
    let port = proxy.http_port.filter(|p| *p != 0)?;
    let user = non_empty(&proxy.user)?;
    let password = non_empty(&proxy.password)?;
    let name = non_empty(&proxy.short_id).unwrap_or(id);

    let config = ProxyTransport::Http {
        address: ProxyAddress {
            hostname: hub.to_string(),
            port,
        },
        auth: Some(ProxyAuth {
            username: user.to_string(),
            password: password.to_string(),
        }),
    };

    Some(ProxyRefreshed::started(
        CONNECTOR_HYPEPROXY_TYPE,
        id,
        name,
        config,
    ))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Connector for one Hypeproxy account.
pub struct HypeproxyConnector {
    api: Arc<dyn HypeproxyClient>,
}

impl HypeproxyConnector {
    /// Create a connector talking to the Hypeproxy API through `client`.
    pub fn new(config: &HypeproxyConfig, client: reqwest::Client) -> Self {
        Self::with_client(Arc::new(HypeproxyApi::new(config, client)))
    }

    /// Create a connector over any `HypeproxyClient` implementation.
    pub fn with_client(api: Arc<dyn HypeproxyClient>) -> Self {
        Self { api }
    }

    /// Fetch the account listing as canonical records, in provider order.
    async fn list(&self) -> Result<Vec<ProxyRefreshed>> {
        let listing = self.api.informations().await?;
        let total = listing.len();

        let mut seen = HashSet::new();
        let proxies: Vec<ProxyRefreshed> = listing
            .iter()
            .filter_map(convert_to_proxy)
            .filter(|p| seen.insert(p.key.clone()))
            .collect();

        if proxies.len() < total {
            debug!(
                "Skipped {} of {} hypeproxy entries (incomplete or duplicate)",
                total - proxies.len(),
                total
            );
        }

        Ok(proxies)
    }
}

#[async_trait]
impl Connector for HypeproxyConnector {
    fn connector_type(&self) -> &'static str {
        CONNECTOR_HYPEPROXY_TYPE
    }

    fn descriptor(&self) -> ConnectorDescriptor {
        ConnectorDescriptor {
            name: "HypeProxy",
            description: "HypeProxy provides mobile 4G/5G proxies backed by physical dongles",
            url: "https://hypeproxy.io",
            group: ConnectorGroup::Hardware,
            can_install: false,
            can_uninstall: false,
            can_replace_proxy: true,
            use_certificate: false,
        }
    }

    async fn get_proxies(&self, keys: &HashSet<String>) -> Result<Vec<ProxyRefreshed>> {
        debug!("get_proxies: {} keys", keys.len());

        let proxies = self
            .list()
            .await?
            .into_iter()
            .filter(|p| keys.contains(&p.key))
            .collect();

        Ok(proxies)
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

        if count == 0 {
            return Ok(Vec::new());
        }

        let proxies: Vec<ProxyRefreshed> = self
            .list()
            .await?
            .into_iter()
            .filter(|p| !exclude_keys.contains(&p.key))
            .take(count)
            .collect();

        if proxies.len() < count {
            debug!(
                "Hypeproxy pool exhausted: {} of {} requested proxies available",
                proxies.len(),
                count
            );
        }

        Ok(proxies)
    }

    async fn start_proxies(&self, keys: &[String]) -> Result<()> {
        debug!("start_proxies: {} keys", keys.len());

        // Dongle proxies are always on once listed.
        Ok(())
    }

    async fn remove_proxies(&self, keys: &[ProxyKeyToRemove]) -> Result<Vec<String>> {
        debug!("remove_proxies: {} keys", keys.len());

        let forced = utils::unique_keys(keys.iter().filter(|k| k.force).map(|k| k.key.as_str()));

        let mut pending: FuturesUnordered<_> = forced
            .iter()
            .map(|key| {
                let api = Arc::clone(&self.api);
                async move { (key, api.direct_renew_ip(key).await) }
            })
            .collect();

        let mut renewed = Vec::new();
        while let Some((key, result)) = pending.next().await {
            match result {
                Ok(()) => {
                    info!("Renewed IP of hypeproxy proxy {}", key);
                    renewed.push(key.clone());
                }
                Err(e) => {
                    warn!("Failed to renew IP of hypeproxy proxy {}: {}", key, e);
                    // Renewals still in flight are dropped, not awaited.
                    let unresolved = forced
                        .iter()
                        .filter(|k| *k != key && !renewed.contains(*k))
                        .cloned()
                        .collect();
                    return Err(ConnectorError::PartialBatchFailure {
                        renewed,
                        failed: vec![RenewFailure {
                            key: key.clone(),
                            error: Box::new(e),
                        }],
                        unresolved,
                    });
                }
            }
        }

        Ok(keys.iter().map(|k| k.key.clone()).collect())
    }
}
