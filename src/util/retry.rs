use std::{future::Future, time::Duration};

use rand::Rng;
use tracing::warn;

use crate::Status;

/// Retries a transport call on `Status::Unavailable`, sleeping a random
/// interval before every attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    attempts: u32,
    min_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        RetryPolicy {
            attempts: attempts.max(1),
            min_delay,
            max_delay: max_delay.max(min_delay),
        }
    }

    /// Single attempt without delay.
    pub fn once() -> Self {
        RetryPolicy::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, Status>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Status>>,
    {
        let mut attempt = 1;
        loop {
            let delay = self.jitter();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            match op().await {
                Ok(value) => return Ok(value),
                Err(status) if status.is_retryable() && attempt < self.attempts => {
                    warn!(
                        "{label}: attempt {attempt}/{} failed: {status}",
                        self.attempts
                    );
                    attempt += 1;
                }
                Err(status) => return Err(status),
            }
        }
    }

    fn jitter(&self) -> Duration {
        if self.max_delay.is_zero() {
            return Duration::ZERO;
        }
        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}
