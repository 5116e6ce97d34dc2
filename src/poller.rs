//! The fetch → validate → format → notify loop.
//!
//! One cycle runs at a time. The loop owns the cursor (lower bound of the
//! next fetch window) and the text of the last error it reported, so a
//! failure that repeats every cycle reaches the chat only once.
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::notifier::Notifier;
use crate::practicum::HomeworkSource;
use crate::response::{self, ValidationError};
use crate::status::{self, FormatError};

/// Prefix of the diagnostic sent to the chat when a cycle fails.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы: ";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// What a single cycle ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API could not be read; nothing was sent and the cursor stayed put.
    FetchFailed,
    /// Valid response with no records.
    Idle,
    /// Every record was formatted and handed to the notifier.
    Processed(usize),
    /// Validation or formatting failed. `notified` is false when the same
    /// error had already been reported. A format failure still moves the
    /// cursor past the window.
    Failed { notified: bool },
}

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub struct PollLoop {
    source: Box<dyn HomeworkSource>,
    notifier: Notifier,
    retry_period: Duration,
    clock: Clock,
    cursor: i64,
    last_error: Option<String>,
}

impl PollLoop {
    pub fn new(source: Box<dyn HomeworkSource>, notifier: Notifier, retry_period: Duration) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            clock: Box::new(unix_now),
            cursor: unix_now(),
            last_error: None,
        }
    }

    /// Replace the wall clock; the cursor restarts at the new clock's "now".
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        self.cursor = clock();
        self.clock = Box::new(clock);
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Run cycles until `shutdown` resolves. Shutdown is observed while
    /// sleeping between cycles.
    pub async fn run<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(
            cursor = self.cursor,
            retry_period_secs = self.retry_period.as_secs(),
            chat_id = %self.notifier.chat_id(),
            "homework watcher started"
        );
        loop {
            let outcome = self.run_cycle().await;
            debug!(?outcome, "cycle finished");
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, stopping watcher");
                    break;
                }
                _ = tokio::time::sleep(self.retry_period) => {}
            }
        }
    }

    #[instrument(skip_all, fields(from_date = self.cursor))]
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        info!("requesting homework statuses");
        let payload = match self.source.fetch(self.cursor).await {
            Ok(payload) => payload,
            Err(err) => {
                error!(?err, "fetch failed, retrying next cycle");
                return CycleOutcome::FetchFailed;
            }
        };

        match self.deliver(&payload).await {
            Ok(count) => {
                self.advance(&payload);
                if count == 0 {
                    debug!("no new statuses");
                    CycleOutcome::Idle
                } else {
                    CycleOutcome::Processed(count)
                }
            }
            Err(err) => {
                // a validated window is consumed even when one of its records is bad
                if let CycleError::Format(_) = err {
                    self.advance(&payload);
                }
                let notified = self.report(&err).await;
                CycleOutcome::Failed { notified }
            }
        }
    }

    /// Validate the payload and notify once per record, in response order.
    /// The first record that fails to format aborts the rest of the batch.
    async fn deliver(&self, payload: &Value) -> Result<usize, CycleError> {
        let homeworks = response::validate(payload)?;
        for record in homeworks {
            let message = status::format(record)?;
            // failures are already logged by the notifier
            let _ = self.notifier.notify(&message).await;
        }
        Ok(homeworks.len())
    }

    async fn report(&mut self, err: &CycleError) -> bool {
        let text = err.to_string();
        error!(error = %text, "cycle failed");
        if self.last_error.as_deref() == Some(text.as_str()) {
            debug!("same error as last time, not notifying");
            return false;
        }
        let message = format!("{FAILURE_PREFIX}{text}");
        let _ = self.notifier.notify(&message).await;
        self.last_error = Some(text);
        true
    }

    fn advance(&mut self, payload: &Value) {
        let next = response::current_date(payload).unwrap_or_else(|| (self.clock)());
        debug!(from = self.cursor, to = next, "cursor advanced");
        self.cursor = next;
    }
}
