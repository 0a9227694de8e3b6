//! Poll loop - the status watcher state machine.
//!
//! One cycle fetches changes since the cursor, validates the payload,
//! derives a message from the most recent homework and forwards it when it
//! differs from the last one sent. Every cycle ends with the same fixed
//! sleep, whatever happened during it.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::{debug, error, info, warn};

use crate::api::StatusSource;
use crate::config::Config;
use crate::error::{ApiError, Error};
use crate::homework::{ApiResponse, HomeworkRecord};
use crate::notifier::Notifier;

/// What a single cycle ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered.
    Notified(String),
    /// The derived message equals the last one sent.
    Unchanged,
    /// The response carried no homeworks.
    NoUpdates,
    /// The cycle was aborted; the description is already logged.
    Failed(String),
}

/// Polling state machine owning the cursor and dedup state.
pub struct PollLoop<S: StatusSource, N: Notifier> {
    source: S,
    notifier: N,
    retry_time: Duration,
    cursor: i64,
    last_message: Option<String>,
    last_failure: Option<String>,
}

impl<S: StatusSource, N: Notifier> PollLoop<S, N> {
    /// Create a loop starting at the current time.
    pub fn new(source: S, notifier: N, retry_time: Duration) -> Self {
        Self::with_cursor(source, notifier, retry_time, chrono::Utc::now().timestamp())
    }

    /// Create a loop starting at an explicit cursor.
    pub fn with_cursor(source: S, notifier: N, retry_time: Duration, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            retry_time,
            cursor,
            last_message: None,
            last_failure: None,
        }
    }

    /// Build a loop from a loaded configuration.
    ///
    /// `build` only runs once the configuration is valid, so a missing
    /// secret stops startup before any client exists.
    pub fn start<F>(config: crate::Result<Config>, build: F) -> crate::Result<Self>
    where
        F: FnOnce(&Config) -> crate::Result<(S, N)>,
    {
        let config = config?;
        let (source, notifier) = build(&config)?;
        Ok(Self::new(source, notifier, config.retry_time))
    }

    /// Current `from_date` boundary.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Last status message that was delivered.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Run forever; no single cycle can end the loop.
    pub async fn run(&mut self) {
        info!(
            "Polling {} every {}s starting from {}",
            self.source.endpoint(),
            self.retry_time.as_secs(),
            self.cursor
        );
        loop {
            let outcome = self.tick().await;
            debug!("Cycle finished: {:?}", outcome);
            tokio::time::sleep(self.retry_time).await;
        }
    }

    /// Run one cycle behind the failure boundary.
    ///
    /// Errors and panics raised by the cycle body are logged here and turned
    /// into [`CycleOutcome::Failed`]; the caller always gets an outcome.
    pub async fn tick(&mut self) -> CycleOutcome {
        let result = AssertUnwindSafe(self.cycle()).catch_unwind().await;

        match result {
            Ok(Ok(outcome)) => {
                self.last_failure = None;
                outcome
            }
            Ok(Err(err)) => {
                log_failure(&err, self.source.endpoint());
                let description = err.to_string();
                if err.is_diagnostic() {
                    self.report(&description).await;
                }
                CycleOutcome::Failed(description)
            }
            Err(panic) => {
                let description = panic_message(panic.as_ref());
                error!("Cycle panicked: {}", description);
                self.report(&description).await;
                CycleOutcome::Failed(description)
            }
        }
    }

    async fn cycle(&mut self) -> Result<CycleOutcome, Error> {
        let payload = self.source.fetch(self.cursor).await?;
        let response = ApiResponse::from_value(payload)?;

        let Some(latest) = response.latest() else {
            debug!("No homework updates since {}", self.cursor);
            self.advance(response.current_date);
            return Ok(CycleOutcome::NoUpdates);
        };

        let message = HomeworkRecord::from_value(latest)?.message();

        if self.last_message.as_deref() == Some(message.as_str()) {
            debug!("Status unchanged");
            self.advance(response.current_date);
            return Ok(CycleOutcome::Unchanged);
        }

        self.notifier.send(&message).await?;
        self.last_message = Some(message.clone());
        self.advance(response.current_date);
        Ok(CycleOutcome::Notified(message))
    }

    fn advance(&mut self, current_date: i64) {
        if current_date < self.cursor {
            warn!(
                "Server date {} is behind cursor {}, keeping cursor",
                current_date, self.cursor
            );
            return;
        }
        self.cursor = current_date;
    }

    /// Best-effort diagnostic message to the chat, sent once per distinct failure.
    async fn report(&mut self, description: &str) {
        let text = format!("Сбой в работе программы: {description}");
        if self.last_failure.as_deref() == Some(text.as_str()) {
            debug!("Failure already reported");
            return;
        }
        let delivery = AssertUnwindSafe(self.notifier.send(&text))
            .catch_unwind()
            .await;
        match delivery {
            Ok(Ok(())) => self.last_failure = Some(text),
            Ok(Err(e)) => error!("Failed to report failure to chat: {}", e),
            Err(panic) => error!(
                "Notifier panicked while reporting failure: {}",
                panic_message(panic.as_ref())
            ),
        }
    }
}

fn log_failure(err: &Error, endpoint: &str) {
    match err {
        Error::Api(ApiError::HttpStatus {
            endpoint,
            status,
            reason,
            body,
            from_date,
        }) => warn!(
            %endpoint, status, %reason, from_date,
            "Endpoint returned an error status: {}", body
        ),
        Error::Api(ApiError::Transport { endpoint, source }) => {
            warn!(%endpoint, "Endpoint unreachable: {}", source)
        }
        Error::Api(ApiError::Decode(e)) => warn!(%endpoint, "Response is not valid JSON: {}", e),
        Error::Api(ApiError::Unclassified { endpoint, source }) => {
            warn!(%endpoint, "Unexpected request failure: {}", source)
        }
        Error::Response(e) => error!(%endpoint, "Invalid API response: {}", e),
        Error::Status(e) => error!("Cannot interpret homework: {}", e),
        Error::Delivery(e) => error!("{}", e),
        other => error!("Cycle failed: {}", other),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
