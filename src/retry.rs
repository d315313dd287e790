use std::time::Duration;

use eyre::Result;
use log::debug;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    /// Returns the last error on exhaustion.
    pub async fn run<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;
        for attempt in 0..self.max_attempts.max(1) {
            match operation().await {
                Ok(val) => return Ok(val),
                Err(e) => {
                    if attempt + 1 < self.max_attempts {
                        debug!("Attempt {} failed: {e}, retrying in {:?}", attempt + 1, self.delay);
                        tokio::time::sleep(self.delay).await;
                    }
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap()) // safe: the loop runs at least once
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::bail;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn immediate() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let calls = AtomicU32::new(0);
        let result = immediate()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, eyre::Report>(42)
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = immediate()
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    bail!("not yet");
                }
                Ok("done")
            })
            .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = immediate()
            .run(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                bail!("failure {n}");
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.unwrap_err().to_string(), "failure 2");
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        let result = policy.run(|| async { Ok::<_, eyre::Report>(1) }).await;
        assert_eq!(result.unwrap(), 1);
    }
}
