//! Retry/backoff wrapper around streaming operations.
//!
//! Cancellation and authorization failures propagate immediately; every
//! other error class is retried with bounded exponential backoff. Once
//! attempts are exhausted the triggering error is surfaced unmodified.

use sensei_core::{Result, SenseiError};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Retry configuration with the documented defaults.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Total attempts, including the first.
    pub max_retries: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Upper bound on any single backoff delay.
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            backoff_multiplier: 2.0,
        }
    }
}

/// Callback invoked before each backoff wait with the number of the attempt
/// that failed and the error that triggered the retry.
pub type RetryObserver = Box<dyn Fn(u32, &SenseiError) + Send + Sync>;

/// Executes a caller-supplied streaming operation with retry-on-transient-
/// failure semantics and explicit cancellation.
pub struct ConnectionManager {
    config: ConnectionConfig,
    cancel: CancellationToken,
    on_retry: Option<RetryObserver>,
}

impl ConnectionManager {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            on_retry: None,
        }
    }

    pub fn with_retry_observer(mut self, observer: RetryObserver) -> Self {
        self.on_retry = Some(observer);
        self
    }

    /// The token handed to in-flight attempts; cancelled by [`abort`].
    ///
    /// [`abort`]: ConnectionManager::abort
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels the in-flight attempt. No new attempt starts afterwards.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    /// Runs `operation` until it succeeds, a non-retryable error occurs, or
    /// attempts are exhausted.
    ///
    /// The operation receives a child of the manager's cancellation token so
    /// an `abort` reaches into the current attempt.
    pub async fn execute<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt: u32 = 1;
        loop {
            if self.cancel.is_cancelled() {
                return Err(SenseiError::Cancelled);
            }

            match operation(self.cancel.child_token()).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if err.is_cancelled() || err.is_authorization() {
                        return Err(err);
                    }
                    if attempt >= self.config.max_retries.max(1) {
                        return Err(err);
                    }

                    if let Some(observer) = &self.on_retry {
                        observer(attempt, &err);
                    }
                    let delay = self.delay_before(attempt + 1);
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient failure; backing off before retry"
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => return Err(SenseiError::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
            }
        }
    }

    /// Delay before attempt `n` (n ≥ 2): `base * multiplier^(n-2)`, capped
    /// at `max_delay`.
    fn delay_before(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(2);
        let millis = self.config.base_delay.as_millis() as f64
            * self.config.backoff_multiplier.powi(exponent as i32);
        Duration::from_millis(millis.min(self.config.max_delay.as_millis() as f64) as u64)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(ConnectionConfig::default())
    }
}
