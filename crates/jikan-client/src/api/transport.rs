//! Outbound HTTP transport.
//!
//! The governor only needs "issue one GET, return JSON or fail"; the
//! [`Transport`] trait is that seam, so tests can script responses.

use super::error::ApiError;
use super::request::RequestDescriptor;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Issues a single GET described by a [`RequestDescriptor`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &RequestDescriptor) -> Result<Value, ApiError>;
}

/// reqwest-backed transport against a fixed base URL
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Create a transport from the `[jikan]` config section
    pub fn from_config(config: &shared::JikanConfig) -> Result<Self, ApiError> {
        Self::new(
            config.base_url.clone(),
            config.request_timeout(),
            &config.user_agent,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Join base URL and descriptor, percent-encoding query values
pub fn build_url(base_url: &str, request: &RequestDescriptor) -> Result<Url, ApiError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), request.path());
    let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;

    if !request.query().is_empty() {
        url.query_pairs_mut().extend_pairs(request.query());
    }

    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &RequestDescriptor) -> Result<Value, ApiError> {
        let url = build_url(&self.base_url, request)?;

        debug!(url = %url, "Making API request");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data = response.json::<Value>().await?;
        debug!(url = %url, "Request successful");
        Ok(data)
    }
}
