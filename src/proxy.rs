//! Canonical proxy records exchanged between connectors and their callers.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a proxy as observed at listing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProxyStatus {
    /// The proxy is being provisioned.
    Starting,
    /// The proxy exists and accepts traffic.
    Started,
    /// The proxy is shutting down.
    Stopping,
    /// The proxy exists but does not accept traffic.
    Stopped,
    /// The provider reports the proxy as broken.
    Error,
}

impl ProxyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyStatus::Starting => "STARTING",
            ProxyStatus::Started => "STARTED",
            ProxyStatus::Stopping => "STOPPING",
            ProxyStatus::Stopped => "STOPPED",
            ProxyStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for ProxyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host and port of an HTTP proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyAddress {
    pub hostname: String,
    pub port: u16,
}

/// Basic credentials for an HTTP proxy endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

/// How a client routes traffic through one specific proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProxyTransport {
    /// A plain HTTP proxy with optional basic auth.
    Http {
        address: ProxyAddress,
        auth: Option<ProxyAuth>,
    },
    /// No per-proxy connection details; addressing is resolved out of band
    /// (for example a residential session id carried in the gateway username).
    Empty,
}

impl ProxyTransport {
    /// Proxy URL without credentials, `None` for `Empty`.
    pub fn url(&self) -> Option<String> {
        match self {
            ProxyTransport::Http { address, .. } => {
                let host = &address.hostname;
                if host.contains(':') && !host.starts_with('[') {
                    Some(format!("http://[{}]:{}", host, address.port))
                } else {
                    Some(format!("http://{}:{}", host, address.port))
                }
            }
            ProxyTransport::Empty => None,
        }
    }

    /// Convert the transport into a `reqwest::Proxy`.
    ///
    /// Returns `Ok(None)` for `Empty`, which carries nothing to route through.
    pub fn to_reqwest_proxy(&self) -> Result<Option<reqwest::Proxy>, reqwest::Error> {
        let auth = match self {
            ProxyTransport::Http { auth, .. } => auth,
            ProxyTransport::Empty => return Ok(None),
        };

        let url = self.url().unwrap_or_default();
        let mut proxy = reqwest::Proxy::all(&url)?;
        if let Some(auth) = auth {
            proxy = proxy.basic_auth(&auth.username, &auth.password);
        }
        Ok(Some(proxy))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ProxyTransport::Empty)
    }
}

/// Normalized proxy record returned by every connector.
///
/// A record is a snapshot taken at call time. It has no identity inside this
/// crate beyond `key`; re-query the connector instead of holding on to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRefreshed {
    /// Connector type that produced the record.
    #[serde(rename = "type")]
    pub kind: String,
    /// Provider-assigned stable identifier, unique per provider.
    pub key: String,
    /// Display label, no identity semantics.
    pub name: String,
    pub status: ProxyStatus,
    pub config: ProxyTransport,
}

impl ProxyRefreshed {
    /// A started proxy with the given transport.
    pub fn started(
        kind: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        config: ProxyTransport,
    ) -> Self {
        Self {
            kind: kind.into(),
            key: key.into(),
            name: name.into(),
            status: ProxyStatus::Started,
            config,
        }
    }
}

/// A key the caller wants dropped from its desired set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyKeyToRemove {
    pub key: String,
    /// Ask the provider to actively rotate the IP behind this key.
    pub force: bool,
}

impl ProxyKeyToRemove {
    pub fn new(key: impl Into<String>, force: bool) -> Self {
        Self {
            key: key.into(),
            force,
        }
    }

    pub fn forced(key: impl Into<String>) -> Self {
        Self::new(key, true)
    }

    pub fn released(key: impl Into<String>) -> Self {
        Self::new(key, false)
    }
}
