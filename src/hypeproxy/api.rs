//! HTTP client for the Hypeproxy API.

use crate::config::HypeproxyConfig;
use crate::error::{ConnectorError, Result};
use crate::middleware;

use async_trait::async_trait;
use log::warn;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// One proxy as listed by the Hypeproxy API.
///
/// Every field is optional on the wire: proxies still being provisioned come
/// back with holes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypeproxyProxy {
    pub id: Option<String>,
    pub short_id: Option<String>,
    pub hub: Option<String>,
    pub http_port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Remote operations the Hypeproxy connector needs.
#[async_trait]
pub trait HypeproxyClient: Send + Sync {
    /// List every proxy attached to the account.
    async fn informations(&self) -> Result<Vec<HypeproxyProxy>>;

    /// Rotate the IP of one proxy. Resolves once the provider acknowledges it.
    async fn direct_renew_ip(&self, proxy_id: &str) -> Result<()>;
}

/// reqwest-backed `HypeproxyClient`.
pub struct HypeproxyApi {
    client: ClientWithMiddleware,
    base_url: Url,
    token: String,
    timeout: Duration,
}

impl HypeproxyApi {
    /// Build the API client on top of the caller's shared connection pool.
    pub fn new(config: &HypeproxyConfig, client: reqwest::Client) -> Self {
        Self {
            client: middleware::provider_client(client, config.max_requests_per_second),
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            timeout: config.timeout,
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ConnectorError::InvalidConfig(format!("cannot append a path to {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ConnectorError::from_status(status, error_message(&body)))
    }
}

#[async_trait]
impl HypeproxyClient for HypeproxyApi {
    async fn informations(&self) -> Result<Vec<HypeproxyProxy>> {
        let url = self.endpoint(&["Proxy", "Informations"])?;
        let entries: Vec<serde_json::Value> = self.get(url).await?.json().await?;

        let proxies = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(proxy) => Some(proxy),
                Err(e) => {
                    warn!("Skipping undecodable hypeproxy entry: {}", e);
                    None
                }
            })
            .collect();

        Ok(proxies)
    }

    async fn direct_renew_ip(&self, proxy_id: &str) -> Result<()> {
        let url = self.endpoint(&["Utils", "DirectRenewIp", proxy_id])?;
        self.get(url).await?;
        Ok(())
    }
}

/// Extract a readable message from a provider error body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error", "title"] {
            if let Some(message) = value.get(field).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        "empty response".to_string()
    } else {
        body.chars().take(200).collect()
    }
}
