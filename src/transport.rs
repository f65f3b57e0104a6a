use anyhow::{Context, Result};
use reqwest::Url;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Query parameters of one `/everything` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EverythingRequest {
    pub query: String,
    pub language: &'static str,
    pub sort_by: &'static str,
    pub page_size: u32,
    pub api_key: String,
}

/// A response that made it back over the wire, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// HTTP reason phrase, empty when the status has none.
    pub reason: String,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failure before a complete response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout;
        }
        let is_connect = err.is_connect();
        // the url carries the api key, keep it out of user-facing text
        let reason = err.without_url().to_string();
        if is_connect {
            TransportError::Connect(reason)
        } else {
            TransportError::Other(reason)
        }
    }
}

/// Seam between the search logic and the network.
pub trait NewsTransport: Send + Sync {
    fn get_everything(
        &self,
        request: &EverythingRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// reqwest-backed transport talking to a NewsAPI compatible server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let endpoint = Url::parse(&base)
            .with_context(|| format!("Invalid news API base url: {base_url}"))?
            .join("everything")
            .context("Failed to build /everything endpoint")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl NewsTransport for HttpTransport {
    async fn get_everything(
        &self,
        request: &EverythingRequest,
    ) -> Result<RawResponse, TransportError> {
        log::debug!(
            "GET {} q={:?} language={} sortBy={} pageSize={} apiKey=<redacted>",
            self.endpoint,
            request.query,
            request.language,
            request.sort_by,
            request.page_size
        );

        let page_size = request.page_size.to_string();
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("q", request.query.as_str()),
                ("language", request.language),
                ("sortBy", request.sort_by),
                ("pageSize", page_size.as_str()),
                ("apiKey", request.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        log::debug!("{} responded {} ({} bytes)", self.endpoint, status, body.len());

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
