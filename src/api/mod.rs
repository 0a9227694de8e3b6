//! Homework status API client.
//!
//! This module provides:
//! - [`StatusSource`] trait, the seam the poll loop fetches through
//! - [`PracticumClient`], the HTTP implementation
//!
//! A source performs exactly one request per [`StatusSource::fetch`] call and
//! never retries; waiting and calling again is the poll loop's job.

pub mod practicum;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;

pub use practicum::PracticumClient;

/// Source of homework status payloads.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch everything that changed since `from_date` (UNIX seconds).
    async fn fetch(&self, from_date: i64) -> Result<Value, ApiError>;

    /// Endpoint description used in logs.
    fn endpoint(&self) -> &str;
}

/// Fake status source for testing.
#[cfg(test)]
pub struct FakeStatusSource {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<Value, ApiError>>>,
    requests: std::sync::Mutex<Vec<i64>>,
}

#[cfg(test)]
impl FakeStatusSource {
    /// Create with queued results, returned in order.
    pub fn new(responses: Vec<Result<Value, ApiError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// `from_date` values of every fetch so far.
    pub fn requests(&self) -> Vec<i64> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl StatusSource for FakeStatusSource {
    async fn fetch(&self, from_date: i64) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(from_date);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ApiError::Unclassified {
                    endpoint: "fake".to_string(),
                    source: "No more fake responses".into(),
                })
            })
    }

    fn endpoint(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fake_status_source() {
        let source = FakeStatusSource::new(vec![Ok(json!({"homeworks": [], "current_date": 1}))]);

        assert!(source.fetch(10).await.is_ok());
        assert!(matches!(
            source.fetch(20).await,
            Err(ApiError::Unclassified { .. })
        ));
        assert_eq!(source.requests(), vec![10, 20]);
    }
}
