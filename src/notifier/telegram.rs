//! Telegram notifier using teloxide

use std::time::Duration;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{DeliveryError, Error};
use crate::Result;

use super::Notifier;

/// Sends messages to one Telegram chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat: Recipient,
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id`.
    ///
    /// Numeric ids address a chat directly; anything else is treated as a
    /// channel username such as `@my_channel`.
    pub fn new(token: &str, chat_id: &str, timeout: Duration) -> Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create Telegram client: {e}")))?;

        Ok(Self {
            bot: Bot::with_client(token, client),
            chat: parse_recipient(chat_id),
        })
    }

    /// Create a notifier from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.credentials.telegram_token,
            &config.credentials.telegram_chat_id,
            config.request_timeout,
        )
    }

    /// Point the bot at a different Bot API server.
    pub fn with_api_url(mut self, url: reqwest::Url) -> Self {
        self.bot = self.bot.set_api_url(url);
        self
    }
}

fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> std::result::Result<(), DeliveryError> {
        debug!("Sending message to {:?}", self.chat);
        self.bot
            .send_message(self.chat.clone(), message)
            .await
            .map_err(DeliveryError::from)?;
        info!("Message sent: {}", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_recipient() {
        assert_eq!(parse_recipient("42"), Recipient::Id(ChatId(42)));
        assert_eq!(parse_recipient("-1001234"), Recipient::Id(ChatId(-1001234)));
        assert_eq!(
            parse_recipient(" @homework_feed "),
            Recipient::ChannelUsername("@homework_feed".to_string())
        );
    }

    #[tokio::test]
    async fn test_rejected_delivery_is_a_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = TelegramNotifier::new("123456:test-token", "42", Duration::from_secs(5))
            .unwrap()
            .with_api_url(reqwest::Url::parse(&server.uri()).unwrap());

        let err = notifier.send("hello").await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to send message"));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_a_delivery_error() {
        let notifier = TelegramNotifier::new("123456:test-token", "42", Duration::from_secs(2))
            .unwrap()
            .with_api_url(reqwest::Url::parse("http://127.0.0.1:1/").unwrap());

        assert!(notifier.send("hello").await.is_err());
    }
}
