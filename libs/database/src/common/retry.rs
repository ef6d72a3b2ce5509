use std::fmt::Display;
use std::future::Future;
use std::hash::BuildHasher;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Exponential backoff schedule for startup connections.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempts after the first one
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: u32,
    /// Scale each delay into 50-100% of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.backoff_multiplier)
            .min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2,
            use_jitter: true,
        }
    }
}

/// Run `operation` until it succeeds or `config.max_retries` retries fail.
///
/// The last error is returned unchanged.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0u32;
    let mut delay = config.initial_delay;

    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(retries = attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if attempt >= config.max_retries {
            warn!(attempts = attempt + 1, error = %err, "Giving up");
            return Err(err);
        }
        attempt += 1;

        let wait = if config.use_jitter { jitter(delay) } else { delay };
        warn!(
            attempt,
            max_retries = config.max_retries,
            error = %err,
            "Operation failed, retrying in {:?}",
            wait
        );
        tokio::time::sleep(wait).await;

        delay = config.next_delay(delay);
    }
}

fn jitter(delay: Duration) -> Duration {
    let seed = std::collections::hash_map::RandomState::new().hash_one(SystemTime::now());
    let percent = 50 + (seed % 51) as u32;
    delay * percent / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::default()
            .with_initial_delay(Duration::from_millis(5))
            .without_jitter()
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));

        let result = retry_with_backoff(
            || {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("connection refused")
                    } else {
                        Ok("connected")
                    }
                }
            },
            fast(),
        )
        .await;

        assert_eq!(result, Ok("connected"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_budget_exhausted() {
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = retry_with_backoff(
            || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("still down")
                }
            },
            fast().with_max_retries(2),
        )
        .await;

        assert_eq!(result, Err("still down"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig::default().with_max_delay(Duration::from_millis(300));
        assert_eq!(
            config.next_delay(Duration::from_millis(200)),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn test_jitter_stays_within_half_to_full() {
        let delay = Duration::from_millis(1000);
        for _ in 0..20 {
            let wait = jitter(delay);
            assert!(wait >= Duration::from_millis(500));
            assert!(wait <= delay);
        }
    }
}
