//! Configuration management

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Error;
use crate::Result;

/// Environment variable holding the homework API token
pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_TIME: Duration = Duration::from_secs(600);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Secrets required before any network activity.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,

    pub telegram_token: String,

    pub telegram_chat_id: String,
}

impl Credentials {
    /// Resolve all credentials through `lookup`.
    ///
    /// Empty values count as missing. Every missing name is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut fetch = |name: &'static str| {
            match lookup(name).filter(|v| !v.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let practicum_token = fetch(PRACTICUM_TOKEN);
        let telegram_token = fetch(TELEGRAM_TOKEN);
        let telegram_chat_id = fetch(TELEGRAM_CHAT_ID);

        if !missing.is_empty() {
            return Err(Error::ConfigurationMissing(missing));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &mask(&self.practicum_token))
            .field("telegram_token", &mask(&self.telegram_token))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,

    /// Homework status endpoint
    pub endpoint: Url,

    /// Pause between two polling cycles
    pub retry_time: Duration,

    /// Upper bound for a single HTTP call
    pub request_timeout: Duration,

    /// Optional additional log sink
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Build a configuration with default settings around `credentials`.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let endpoint = Url::parse(DEFAULT_ENDPOINT)
            .map_err(|e| Error::Config(format!("Invalid default endpoint: {e}")))?;
        Ok(Self {
            credentials,
            endpoint,
            retry_time: DEFAULT_RETRY_TIME,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_file: None,
        })
    }

    /// Load credentials from the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(Credentials::from_lookup(lookup)?)
    }

    /// Override the endpoint, validating that it is an absolute http(s) URL.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("Invalid endpoint {endpoint:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Endpoint must use http or https, got {:?}",
                url.scheme()
            )));
        }
        self.endpoint = url;
        Ok(self)
    }

    pub fn with_retry_time(mut self, retry_time: Duration) -> Result<Self> {
        if retry_time.is_zero() {
            return Err(Error::Config("Retry time must be positive".to_string()));
        }
        self.retry_time = retry_time;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::Config("Request timeout must be positive".to_string()));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }
}

/// Hide all but the last few characters of a secret.
pub fn mask(secret: &str) -> String {
    let visible = 4;
    let count = secret.chars().count();
    if count <= visible * 2 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - visible).collect();
    format!("{}{}", "*".repeat(count - visible), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_all_credentials_present() {
        let config = Config::from_lookup(lookup(&[
            (PRACTICUM_TOKEN, "practicum"),
            (TELEGRAM_TOKEN, "123:abc"),
            (TELEGRAM_CHAT_ID, "42"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.practicum_token, "practicum");
        assert_eq!(config.credentials.telegram_chat_id, "42");
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.retry_time, Duration::from_secs(600));
    }

    #[test]
    fn test_each_missing_credential_is_fatal() {
        let all = [
            (PRACTICUM_TOKEN, "practicum"),
            (TELEGRAM_TOKEN, "123:abc"),
            (TELEGRAM_CHAT_ID, "42"),
        ];
        for skip in 0..all.len() {
            let pairs: Vec<_> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, p)| *p)
                .collect();

            match Config::from_lookup(lookup(&pairs)) {
                Err(Error::ConfigurationMissing(missing)) => assert_eq!(missing, vec![all[skip].0]),
                other => panic!("expected ConfigurationMissing, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let result = Config::from_lookup(lookup(&[
            (PRACTICUM_TOKEN, "   "),
            (TELEGRAM_TOKEN, "123:abc"),
        ]));
        match result {
            Err(Error::ConfigurationMissing(missing)) => {
                assert_eq!(missing, vec![PRACTICUM_TOKEN, TELEGRAM_CHAT_ID]);
            }
            other => panic!("expected ConfigurationMissing, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials::from_lookup(lookup(&[
            (PRACTICUM_TOKEN, "y0_secret_practicum_token"),
            (TELEGRAM_TOKEN, "123456:telegram-secret"),
            (TELEGRAM_CHAT_ID, "42"),
        ]))
        .unwrap();

        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("oken"));
    }

    #[test]
    fn test_mask_short_secret() {
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("abcdefghij"), "******ghij");
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = Config::from_lookup(lookup(&[
            (PRACTICUM_TOKEN, "p"),
            (TELEGRAM_TOKEN, "t"),
            (TELEGRAM_CHAT_ID, "1"),
        ]))
        .unwrap();

        assert!(config.clone().with_endpoint("ftp://example.com/").is_err());
        assert!(config.clone().with_endpoint("not a url").is_err());
        assert!(config.clone().with_retry_time(Duration::ZERO).is_err());

        let config = config
            .with_endpoint("http://localhost:8080/api/")
            .unwrap()
            .with_retry_time(Duration::from_secs(5))
            .unwrap();
        assert_eq!(config.endpoint.as_str(), "http://localhost:8080/api/");
        assert_eq!(config.retry_time, Duration::from_secs(5));
    }
}
