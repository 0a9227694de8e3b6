//! Notifier module - delivery of chat messages.
//!
//! Each notifier sends exactly one message per [`Notifier::send`] call, with
//! no batching and no retry.

pub mod telegram;

use async_trait::async_trait;

use crate::error::DeliveryError;

pub use telegram::TelegramNotifier;

/// Delivers text messages to a fixed destination.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), DeliveryError>;
}

/// Fake notifier for testing; records every attempted send.
#[cfg(test)]
#[derive(Default)]
pub struct FakeNotifier {
    sent: std::sync::Mutex<Vec<String>>,
    failures: std::sync::Mutex<std::collections::VecDeque<bool>>,
}

#[cfg(test)]
impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next sends according to `plan` (`true` means fail).
    pub fn with_failures(plan: Vec<bool>) -> Self {
        Self {
            sent: std::sync::Mutex::new(Vec::new()),
            failures: std::sync::Mutex::new(plan.into()),
        }
    }

    /// Messages passed to `send`, including failed attempts.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, message: &str) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(message.to_string());
        let fail = self.failures.lock().unwrap().pop_front().unwrap_or(false);
        if fail {
            return Err(DeliveryError("chat not found".into()));
        }
        Ok(())
    }
}
