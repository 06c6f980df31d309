//! HTTP transport seam shared by every upstream service.
//!
//! Capabilities only ever talk JSON-over-GET, so the seam is a single
//! method. Production uses [`ReqwestTransport`]; tests script responses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

/// Failure talking to an upstream data service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET `url` with `query` parameters and decode the body as JSON.
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, UpstreamError>;
}

/// Timeout and retry policy for outbound calls.
///
/// The default is a single attempt with no timeout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpPolicy {
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    /// Extra attempts after a transport-level failure. HTTP status and
    /// decode failures are never retried.
    pub retries: u32,
}

/// `reqwest`-backed transport. Makes exactly one attempt per call; wrap it in
/// [`Retrying`] for retries.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str, policy: &HttpPolicy) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = policy.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = policy.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(|e| UpstreamError::Transport {
            url: String::new(),
            message: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self { http })
    }

    /// Build the production transport for `policy`, retries included.
    pub fn with_policy(
        user_agent: &str,
        policy: &HttpPolicy,
    ) -> Result<Arc<dyn HttpTransport>, UpstreamError> {
        let transport: Arc<dyn HttpTransport> = Arc::new(Self::new(user_agent, policy)?);
        Ok(Arc::new(Retrying::new(transport, policy.retries)))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, UpstreamError> {
        debug!(%url, "upstream request");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Shape(format!("invalid JSON from {url}: {e}")))
    }
}

/// Retries transport-level failures of an inner transport. HTTP status and
/// decode failures are returned as-is.
pub struct Retrying {
    inner: Arc<dyn HttpTransport>,
    retries: u32,
}

impl Retrying {
    pub fn new(inner: Arc<dyn HttpTransport>, retries: u32) -> Self {
        Self { inner, retries }
    }
}

#[async_trait]
impl HttpTransport for Retrying {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, UpstreamError> {
        let mut attempt = 0;
        loop {
            match self.inner.get_json(url, query).await {
                Err(UpstreamError::Transport { message, .. }) if attempt < self.retries => {
                    attempt += 1;
                    warn!(%url, attempt, "upstream transport failure, retrying: {message}");
                }
                other => return other,
            }
        }
    }
}
