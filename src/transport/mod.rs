//! Raw HTTP transport seam
//!
//! Provider handlers never talk to the network directly; they go through the
//! [`Transport`] trait, which returns response bytes or a [`SourceError`].
//! Ordinary HTTP-level failures surface as errors rather than panics so the
//! per-unit swallow policy in the handlers applies uniformly. Tests
//! substitute a canned implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::HttpConfig;
use crate::errors::{SourceError, SourceResult};

pub mod encoding;

/// Minimal fetch interface the provider handlers are written against
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url`, with optional extra headers, returning the response body
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> SourceResult<Vec<u8>>;

    /// POST a form-encoded body to `url`, returning the response body
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> SourceResult<Vec<u8>>;
}

/// Default reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &HttpConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn read_body(url: &str, response: reqwest::Response) -> SourceResult<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::transport(e.to_string()))?;
        debug!(url, bytes = body.len(), "fetched provider payload");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> SourceResult<Vec<u8>> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SourceError::transport(e.to_string()))?;
        Self::read_body(url, response).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> SourceResult<Vec<u8>> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| SourceError::transport(e.to_string()))?;
        Self::read_body(url, response).await
    }
}
