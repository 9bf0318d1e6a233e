use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;

/// Failure to complete an HTTP exchange (network, DNS, TLS, timeout).
/// Protocol-level outcomes (404, 500) are regular responses, not errors.
#[derive(thiserror::Error, Debug, Clone)]
#[error("http request failed for {url}: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
    pub timeout: bool,
}

impl TransportError {
    fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        Self {
            url: url.to_string(),
            message: source.to_string(),
            timeout: source.is_timeout(),
        }
    }
}

/// Structured result of a GET/HEAD exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Black-box request capability the aggregation core is written against.
/// Production uses [`HttpTransport`]; tests substitute canned responses.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> Result<ApiResponse, TransportError>;

    async fn head(&self, url: &str, timeout: Duration) -> Result<ApiResponse, TransportError>;
}

/// reqwest-backed transport with a per-call timeout cap.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        timeout: Duration,
    ) -> Result<ApiResponse, TransportError> {
        let mut request = self.client.get(url).timeout(timeout);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        let content_type = header_content_type(&response);
        // A body that is not valid JSON degrades to None; callers treat the
        // slot as missing data rather than failing the aggregation.
        let body = response.json::<Value>().await.ok();

        Ok(ApiResponse {
            status,
            content_type,
            body,
        })
    }

    async fn head(&self, url: &str, timeout: Duration) -> Result<ApiResponse, TransportError> {
        let response = self
            .client
            .head(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        Ok(ApiResponse {
            status: response.status().as_u16(),
            content_type: header_content_type(&response),
            body: None,
        })
    }
}

fn header_content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
}
