//! HTTP capability used by the controller, and its reqwest implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tedrag_core::{ApiErrorBody, Error, Result};
use tracing::debug;
use url::Url;

/// Longest server error body kept as diagnostic detail.
const MAX_DETAIL_LEN: usize = 512;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as `T`, also returning it as the backend sent it.
    ///
    /// Non-2xx statuses become [`Error::HttpStatus`], a 2xx `{"error": ...}`
    /// envelope becomes [`Error::Backend`], and any other mismatch
    /// [`Error::Decode`].
    pub fn decode<T: DeserializeOwned>(self) -> Result<(T, Value)> {
        if !self.is_success() {
            return Err(Error::HttpStatus {
                status: self.status,
                detail: error_detail(&self.body),
            });
        }

        if let Some(envelope) = ApiErrorBody::detect(&self.body) {
            return Err(Error::Backend(envelope.error));
        }

        let raw: Value =
            serde_json::from_str(&self.body).map_err(|e| Error::Decode(e.to_string()))?;
        let typed = <T as serde::Deserialize>::deserialize(&raw)
            .map_err(|e| Error::Decode(e.to_string()))?;
        Ok((typed, raw))
    }
}

fn error_detail(body: &str) -> Option<String> {
    if let Some(envelope) = ApiErrorBody::detect(body) {
        return Some(envelope.error);
    }
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    Some(body.chars().take(MAX_DETAIL_LEN).collect())
}

/// Trait for the HTTP capability handed to the controller.
///
/// Implementations return `Ok` for any completed exchange, whatever the
/// status; only transport failures are errors ([`Error::Network`]).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<HttpResponse>;

    async fn post_json(&self, url: &Url, body: &Value) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
///
/// No request timeout is set: a request that never settles keeps the caller
/// waiting.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    async fn finish(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Body read failed: {}", e)))?;
        debug!("HTTP {} ({} bytes)", status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {}", e)))?;
        Self::finish(response).await
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<HttpResponse> {
        debug!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {}", e)))?;
        Self::finish(response).await
    }
}
