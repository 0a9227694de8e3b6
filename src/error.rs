//! Error types for homework-bot

use thiserror::Error;

/// Result type alias for homework-bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in homework-bot
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    ConfigurationMissing(Vec<&'static str>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this failure should be reported to the chat as a diagnostic.
    ///
    /// Connectivity problems with either service are only logged: the chat
    /// recipient can do nothing about them, and a broken delivery path
    /// cannot carry its own report anyway.
    pub fn is_diagnostic(&self) -> bool {
        match self {
            Error::Api(ApiError::HttpStatus { .. }) | Error::Api(ApiError::Transport { .. }) => false,
            Error::Delivery(_) => false,
            _ => true,
        }
    }
}

/// Failures of a single request to the homework status API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Endpoint {endpoint} answered {status} {reason} (from_date={from_date}): {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        reason: String,
        body: String,
        from_date: i64,
    },

    #[error("No access to {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request to {endpoint} failed: {source}")]
    Unclassified {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Structural problems of a decoded API payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("Response is not a JSON object")]
    NotAMapping,

    #[error("Response is empty")]
    EmptyResponse,

    #[error("Key `homeworks` is missing from the response")]
    MissingHomeworksKey,

    #[error("Key `current_date` is missing from the response")]
    MissingCurrentDateKey,

    #[error("Value of `homeworks` is not a list")]
    HomeworksNotAList,

    #[error("Value of `current_date` is not an integer timestamp")]
    CurrentDateNotAnInteger,
}

/// Problems interpreting a single homework record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("Unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("Homework record is not a JSON object")]
    RecordNotAMapping,

    #[error("Homework record has no `{0}` field")]
    MissingField(&'static str),
}

/// A message could not be delivered to the chat.
#[derive(Error, Debug)]
#[error("Failed to send message: {0}")]
pub struct DeliveryError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl From<teloxide::RequestError> for DeliveryError {
    fn from(err: teloxide::RequestError) -> Self {
        DeliveryError(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_missing_lists_names() {
        let err = Error::ConfigurationMissing(vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }

    #[test]
    fn test_diagnostic_classification() {
        let http = Error::Api(ApiError::HttpStatus {
            endpoint: "http://localhost/".to_string(),
            status: 503,
            reason: "Service Unavailable".to_string(),
            body: String::new(),
            from_date: 0,
        });
        assert!(!http.is_diagnostic());

        let delivery = Error::Delivery(DeliveryError("boom".into()));
        assert!(!delivery.is_diagnostic());

        assert!(Error::Response(ResponseError::EmptyResponse).is_diagnostic());
        assert!(Error::Status(StatusError::UnknownStatus("x".into())).is_diagnostic());
    }
}
