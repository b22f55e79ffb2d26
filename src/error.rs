//! Error types for the proxy-connectors crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by connectors and the reconciliation driver.
///
/// A provider listing entry that cannot be mapped is not an error: the
/// mapper returns `None` and the entry is left out of the result.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Network failure, timeout or gateway error while talking to the provider.
    #[error("Provider unreachable: {0}")]
    ProviderUnreachable(String),

    /// The provider answered with a well-formed error.
    #[error("Provider rejected request ({status}): {message}")]
    ProviderRejected { status: u16, message: String },

    /// The provider answered with a body that could not be decoded.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// A concurrent forced renewal failed. The batch stops at the first
    /// failure; renewals still in flight at that point are `unresolved`.
    #[error(
        "Forced renewal failed for {} of {} proxies",
        .failed.len(),
        .failed.len() + .renewed.len() + .unresolved.len()
    )]
    PartialBatchFailure {
        renewed: Vec<String>,
        failed: Vec<RenewFailure>,
        unresolved: Vec<String>,
    },

    #[error("Unknown connector type: {0}")]
    UnknownConnectorType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A single failed forced renewal inside a batch.
#[derive(Debug)]
pub struct RenewFailure {
    pub key: String,
    pub error: Box<ConnectorError>,
}

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectorError>;

impl ConnectorError {
    /// Build an error from a non-success HTTP status returned by a provider.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                ConnectorError::ProviderUnreachable(format!("{}: {}", status, message))
            }
            _ => ConnectorError::ProviderRejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the caller may retry the same call unchanged, with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConnectorError::ProviderUnreachable(_))
    }

    /// Keys to re-issue after a `PartialBatchFailure`: failed ones first,
    /// then those abandoned before they resolved.
    pub fn failed_keys(&self) -> Vec<&str> {
        match self {
            ConnectorError::PartialBatchFailure {
                failed, unresolved, ..
            } => failed
                .iter()
                .map(|f| f.key.as_str())
                .chain(unresolved.iter().map(String::as_str))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ConnectorError::InvalidResponse(err.to_string());
        }
        if let Some(status) = err.status() {
            return ConnectorError::from_status(status, err.to_string());
        }
        ConnectorError::ProviderUnreachable(err.to_string())
    }
}

impl From<reqwest_middleware::Error> for ConnectorError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => {
                ConnectorError::ProviderUnreachable(e.to_string())
            }
        }
    }
}
