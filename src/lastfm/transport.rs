//! HTTP transport used to reach the Last.fm API.
//!
//! The [`Transport`] trait keeps the client independent of any particular HTTP
//! stack so tests can substitute an in-memory implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::{LastfmError, Result};

/// Raw response as handed back by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET to `url` with the given query pairs.
    ///
    /// Only failures that produced no response at all are errors here; a
    /// non-success status is returned as a normal [`HttpResponse`].
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| {
                LastfmError::Configuration(format!("cannot build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, query: &[(String, String)]) -> Result<HttpResponse> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(status, bytes = body.len(), "Received Last.fm response");
        Ok(HttpResponse { status, body })
    }
}

/// Turns a non-success response into a [`LastfmError::Status`].
///
/// Last.fm usually explains failures with a JSON `message`, which is used when
/// present; otherwise the start of the raw body is kept.
pub(crate) fn ensure_success(response: HttpResponse) -> Result<Vec<u8>> {
    if response.is_success() {
        return Ok(response.body);
    }

    let message = serde_json::from_slice::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            String::from_utf8_lossy(&response.body)
                .chars()
                .take(200)
                .collect()
        });

    Err(LastfmError::Status {
        status: response.status,
        message,
    })
}
