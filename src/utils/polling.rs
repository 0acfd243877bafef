/// Polling utilities for waiting on conditions with timeout
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Configuration for polling operations
pub struct PollingConfig {
    pub timeout: Duration,
    pub interval: Duration,
    pub initial_delay: Duration,
    pub description: String,
}

impl PollingConfig {
    /// Create a new polling configuration
    pub fn new(timeout_secs: u64, interval_secs: u64, description: impl Into<String>) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
            interval: Duration::from_secs(interval_secs),
            initial_delay: Duration::ZERO,
            description: description.into(),
        }
    }

    /// Sleep this long before the first check
    pub fn with_initial_delay(mut self, initial_delay_secs: u64) -> Self {
        self.initial_delay = Duration::from_secs(initial_delay_secs);
        self
    }

    /// Poll until condition is met or timeout
    ///
    /// The condition function should return:
    /// - Ok(Some(T)) when condition is met (returns T)
    /// - Ok(None) when condition is not yet met (continues polling)
    /// - Err(e) when an error occurs (stops polling and returns error)
    ///
    /// The timeout clock starts after the initial delay.
    pub async fn poll<F, Fut, T>(&self, condition: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        info!("{}...", self.description);

        if !self.initial_delay.is_zero() {
            tokio::time::sleep(self.initial_delay).await;
        }

        let start = Instant::now();

        loop {
            if let Some(value) = condition().await? {
                info!("✓ {}", self.description);
                return Ok(value);
            }

            if start.elapsed() > self.timeout {
                return Err(Error::Timeout {
                    secs: self.timeout.as_secs(),
                    description: self.description.clone(),
                });
            }

            debug!(
                "{}: not yet, retrying in {}s",
                self.description,
                self.interval.as_secs()
            );
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Poll until condition returns Ok(true) or timeout
    ///
    /// Simplified version for boolean conditions
    pub async fn poll_until<F, Fut>(&self, condition: F) -> Result<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        self.poll(|| async {
            match condition().await {
                Ok(true) => Ok(Some(())),
                Ok(false) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }
}
