//! HTTP implementation of the backend client

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{AlternativeQuery, AlternativeRecipe, BackendError, ByteStream, GenerateRequest, PlanBackend, RegenerateRequest};
use crate::config::Config;

/// Backend client over HTTP
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct AlternativesResponse {
    #[serde(default)]
    alternatives: Vec<AlternativeRecipe>,
}

impl HttpBackend {
    /// Create a new client for the given base URL
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        debug!(base_url = %config.base_url, timeout_ms = config.request_timeout_ms, "from_config: called");
        Self::new(&config.base_url, Duration::from_millis(config.request_timeout_ms))
    }

    /// POST a JSON body and hand back the raw streaming response body
    async fn open_stream<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<ByteStream, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "open_stream: sending request");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            debug!(status, "open_stream: non-success status");
            return Err(BackendError::Api { status, message });
        }

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(BackendError::Network));
        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl PlanBackend for HttpBackend {
    async fn start_generation(&self, request: &GenerateRequest) -> Result<ByteStream, BackendError> {
        self.open_stream("/api/generate", request).await
    }

    async fn regenerate_meal(&self, request: &RegenerateRequest) -> Result<ByteStream, BackendError> {
        self.open_stream("/api/regenerate-meal", request).await
    }

    async fn alternative_recipes(&self, query: &AlternativeQuery) -> Result<Vec<AlternativeRecipe>, BackendError> {
        let url = format!("{}/api/alternative-recipes", self.base_url);
        debug!(%url, menu = %query.current_menu, "alternative_recipes: sending query");

        let response = self.http.get(&url).query(&query.query_pairs()).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status, message });
        }

        let parsed: AlternativesResponse = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(parsed.alternatives)
    }
}
