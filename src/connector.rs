//! The connector contract shared by every provider adapter.

use crate::error::Result;
use crate::proxy::{ProxyKeyToRemove, ProxyRefreshed};

use async_trait::async_trait;
use std::collections::HashSet;

/// Family a provider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorGroup {
    CloudProvider,
    ProxiesServiceStatic,
    ProxiesServiceDynamic,
    Hardware,
    Other,
}

/// Static metadata describing a connector type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorDescriptor {
    /// Display name.
    pub name: &'static str,
    pub description: &'static str,
    /// Provider homepage.
    pub url: &'static str,
    pub group: ConnectorGroup,
    /// Whether the connector can install provider-side resources.
    pub can_install: bool,
    /// Whether the connector can uninstall provider-side resources.
    pub can_uninstall: bool,
    /// Whether a forced removal rotates the proxy IP provider-side.
    pub can_replace_proxy: bool,
    /// Whether proxies need a client certificate.
    pub use_certificate: bool,
}

/// Provider adapter exposing the four reconciliation operations.
///
/// Implementations hold no state across calls: every answer comes from the
/// provider account or from the call arguments. An adapter may narrow a
/// capability (e.g. never touch the provider on removal) but must keep the
/// semantics documented on each method.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Discriminant unique per provider.
    fn connector_type(&self) -> &'static str;

    /// Static metadata for this connector type.
    fn descriptor(&self) -> ConnectorDescriptor;

    /// Return the live proxies whose key is in `keys`.
    ///
    /// Keys the provider no longer knows are silently dropped. No ordering.
    async fn get_proxies(&self, keys: &HashSet<String>) -> Result<Vec<ProxyRefreshed>>;

    /// Return at most `count` usable proxies, none keyed in `exclude_keys`.
    ///
    /// Returning fewer than `count` is partial fulfillment, not an error.
    async fn create_proxies(
        &self,
        count: usize,
        exclude_keys: &HashSet<String>,
    ) -> Result<Vec<ProxyRefreshed>>;

    /// Bring the given proxies to `Started`.
    async fn start_proxies(&self, keys: &[String]) -> Result<()>;

    /// Drop keys from the desired set, rotating the IP of forced ones.
    ///
    /// Returns every input key on success. If any forced rotation fails the
    /// whole call fails.
    async fn remove_proxies(&self, keys: &[ProxyKeyToRemove]) -> Result<Vec<String>>;
}
