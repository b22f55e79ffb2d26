//! # proxy-connectors
//!
//! A uniform connector layer over third-party proxy providers.
//!
//! Each provider (a hardware-dongle network, a residential session network,
//! ...) is wrapped in a [`Connector`] exposing the same four operations:
//! list the proxies the caller tracks, create more up to a count, start them,
//! and remove them, optionally forcing an IP rotation. Connectors are
//! stateless; the provider account is the source of truth and every call
//! re-queries it.
//!
//! [`ConnectorRegistry`] dispatches on the connector type and [`reconcile`]
//! runs one convergence pass against a connector.

pub mod config;
pub mod connector;
pub mod error;
pub mod hypeproxy;
pub mod middleware;
pub mod proxy;
pub mod proxy_cheap;
pub mod reconcile;
pub mod registry;
mod utils;

pub use config::{
    HypeproxyConfig, HypeproxyConfigBuilder, ProxyCheapResidentialConfig,
    ProxyCheapResidentialConfigBuilder,
};
pub use connector::{Connector, ConnectorDescriptor, ConnectorGroup};
pub use error::{ConnectorError, RenewFailure, Result};
pub use hypeproxy::{HypeproxyConnector, CONNECTOR_HYPEPROXY_TYPE};
pub use middleware::RateLimitMiddleware;
pub use proxy::{
    ProxyAddress, ProxyAuth, ProxyKeyToRemove, ProxyRefreshed, ProxyStatus, ProxyTransport,
};
pub use proxy_cheap::{ProxyCheapResidentialConnector, CONNECTOR_PROXY_CHEAP_RESIDENTIAL_TYPE};
pub use reconcile::{reconcile, ReconcileOutcome, ReconcilePlan};
pub use registry::ConnectorRegistry;
