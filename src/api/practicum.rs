//! HTTP client for the Practicum homework status endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, Error};
use crate::Result;

use super::StatusSource;

/// Homework status API client using OAuth token authentication.
#[derive(Clone)]
pub struct PracticumClient {
    endpoint: String,
    token: String,
    client: Client,
}

impl PracticumClient {
    /// Create a client for `endpoint` with a bounded request timeout.
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("homework-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            client,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.endpoint.as_str(),
            &config.credentials.practicum_token,
            config.request_timeout,
        )
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            ApiError::Transport {
                endpoint: self.endpoint.clone(),
                source: err,
            }
        } else {
            ApiError::Unclassified {
                endpoint: self.endpoint.clone(),
                source: Box::new(err),
            }
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> std::result::Result<Value, ApiError> {
        debug!("Requesting {} with from_date={}", self.endpoint, from_date);

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = readable_body(response.text().await);
            return Err(ApiError::HttpStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
                from_date,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let payload = serde_json::from_slice(&bytes)?;
        Ok(payload)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Error bodies are diagnostics; a failed read is kept in their place.
fn readable_body<E: std::fmt::Display>(body: std::result::Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}
