//! Configuration for provider connectors.

use crate::error::{ConnectorError, Result};

use std::time::Duration;
use url::Url;

/// Default base URL of the Hypeproxy API.
pub const HYPEPROXY_DEFAULT_BASE_URL: &str = "https://api.hypeproxy.io";

/// Configuration for the Hypeproxy connector.
#[derive(Debug, Clone)]
pub struct HypeproxyConfig {
    /// API token sent as a bearer credential.
    pub token: String,
    /// Base URL of the provider API.
    pub base_url: Url,
    /// Timeout applied to every provider request.
    pub timeout: Duration,
    /// Maximum provider API requests per second.
    pub max_requests_per_second: f64,
}

impl HypeproxyConfig {
    /// Create a new configuration builder.
    pub fn builder() -> HypeproxyConfigBuilder {
        HypeproxyConfigBuilder::new()
    }
}

/// Builder for `HypeproxyConfig`.
pub struct HypeproxyConfigBuilder {
    token: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_requests_per_second: Option<f64>,
}

impl HypeproxyConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            token: None,
            base_url: None,
            timeout: None,
            max_requests_per_second: None,
        }
    }

    /// Set the API token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the provider API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum provider API requests per second.
    pub fn max_requests_per_second(mut self, rps: f64) -> Self {
        self.max_requests_per_second = Some(rps);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<HypeproxyConfig> {
        let token = self
            .token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConnectorError::InvalidConfig("hypeproxy token is required".into()))?;

        let raw_url = self
            .base_url
            .unwrap_or_else(|| HYPEPROXY_DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|e| {
            ConnectorError::InvalidConfig(format!("hypeproxy base url must be a valid URL: {}", e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConnectorError::InvalidConfig(format!(
                "hypeproxy base url must be http or https, got {}",
                base_url.scheme()
            )));
        }

        let max_requests_per_second = self.max_requests_per_second.unwrap_or(5.0);
        if max_requests_per_second.is_nan() || max_requests_per_second <= 0.0 {
            return Err(ConnectorError::InvalidConfig(
                "max_requests_per_second must be positive".into(),
            ));
        }

        Ok(HypeproxyConfig {
            token,
            base_url,
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            max_requests_per_second,
        })
    }
}

impl Default for HypeproxyConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the Proxy-Cheap residential connector.
#[derive(Debug, Clone)]
pub struct ProxyCheapResidentialConfig {
    /// Length of generated session ids.
    pub session_length: usize,
}

impl ProxyCheapResidentialConfig {
    /// Shortest accepted session id.
    pub const MIN_SESSION_LENGTH: usize = 4;

    /// Create a new configuration builder.
    pub fn builder() -> ProxyCheapResidentialConfigBuilder {
        ProxyCheapResidentialConfigBuilder::default()
    }
}

impl Default for ProxyCheapResidentialConfig {
    fn default() -> Self {
        Self { session_length: 8 }
    }
}

/// Builder for `ProxyCheapResidentialConfig`.
#[derive(Default)]
pub struct ProxyCheapResidentialConfigBuilder {
    session_length: Option<usize>,
}

impl ProxyCheapResidentialConfigBuilder {
    /// Set the length of generated session ids.
    pub fn session_length(mut self, length: usize) -> Self {
        self.session_length = Some(length);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ProxyCheapResidentialConfig> {
        let session_length = self
            .session_length
            .unwrap_or(ProxyCheapResidentialConfig::default().session_length);
        if session_length < ProxyCheapResidentialConfig::MIN_SESSION_LENGTH {
            return Err(ConnectorError::InvalidConfig(format!(
                "session_length must be at least {}",
                ProxyCheapResidentialConfig::MIN_SESSION_LENGTH
            )));
        }

        Ok(ProxyCheapResidentialConfig { session_length })
    }
}
