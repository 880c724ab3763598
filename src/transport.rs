use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use reqwest::Client;

use crate::error::{Result, RfmError};

/// Raw bytes of a response plus how long the request took, including
/// connection setup.
#[derive(Debug, Clone)]
pub struct Response {
    pub body: Bytes,
    pub elapsed: Duration,
}

/// Abstraction over the HTTP round trips the client performs.
///
/// Implementors execute a single GET or POST against `endpoint` on their
/// base URL with the given query parameters and hand back the raw
/// response bytes. No retries, no internal timeouts; callers wrap the
/// whole future in a deadline if they need one.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response>;

    async fn post(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        body: Bytes,
    ) -> Result<Response>;
}

/// reqwest-backed transport talking to a single base URL
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the given base URL, e.g. `http://printer:80`
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("rrfm/0.2")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("GET {}", url);
        let start = Instant::now();

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RfmError::Http(status.as_u16()));
        }

        let body = response.bytes().await?;
        let elapsed = start.elapsed();
        debug!("GET {} returned {} bytes in {:?}", url, body.len(), elapsed);

        Ok(Response { body, elapsed })
    }

    async fn post(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        body: Bytes,
    ) -> Result<Response> {
        let url = self.url(endpoint);
        debug!("POST {} ({} bytes)", url, body.len());
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .query(query)
            .header("Content-Type", "application/octet-stream")
            .body(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RfmError::Http(status.as_u16()));
        }

        let body = response.bytes().await?;
        let elapsed = start.elapsed();
        debug!("POST {} returned {} bytes in {:?}", url, body.len(), elapsed);

        Ok(Response { body, elapsed })
    }
}
