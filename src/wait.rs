//! Fixed-interval bounded polling
//!
//! Provides the single waiting primitive used by the readiness and shutdown
//! pollers: query, sleep a fixed interval, repeat up to a fixed attempt
//! count. The total wait is always `interval * max_attempts` quantized;
//! there is no backoff and no per-attempt retry of failed checks.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// A fixed-interval polling budget.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between consecutive checks
    pub interval: Duration,
    /// Maximum number of checks before giving up
    pub max_attempts: u32,
}

impl PollConfig {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Total time the budget covers, for log messages.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// Outcome of a bounded poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The condition was observed within the budget
    Ready,
    /// The budget was exhausted without the condition holding
    Exhausted { attempts: u32 },
}

/// Poll `check` at a fixed interval until it reports ready or the attempt
/// budget runs out.
///
/// The check runs exactly once per attempt: `Ok(true)` ends the poll with
/// [`PollOutcome::Ready`], `Ok(false)` sleeps and retries, and `Err` aborts
/// the poll immediately on that attempt; a failing status query is not
/// retried. No sleep follows the final attempt.
pub async fn poll_until<F, Fut, E>(
    config: PollConfig,
    what: &str,
    mut check: F,
) -> Result<PollOutcome, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    for attempt in 1..=config.max_attempts {
        if check().await? {
            debug!(resource = %what, attempt, "condition met");
            return Ok(PollOutcome::Ready);
        }

        if attempt < config.max_attempts {
            debug!(
                resource = %what,
                attempt,
                interval_secs = config.interval.as_secs(),
                "not ready, sleeping"
            );
            tokio::time::sleep(config.interval).await;
        }
    }

    Ok(PollOutcome::Exhausted {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    const FAST: PollConfig = PollConfig::new(Duration::from_secs(5), 4);

    #[tokio::test(start_paused = true)]
    async fn never_ready_stops_after_exactly_max_attempts() {
        let calls = AtomicU32::new(0);

        let outcome = poll_until(FAST, "never-ready", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ()>(false) }
        })
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::Exhausted { attempts: 4 });
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn ready_on_first_attempt_does_not_sleep() {
        let start = tokio::time::Instant::now();

        let outcome = poll_until(FAST, "instant", || async { Ok::<_, ()>(true) })
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Ready);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn becomes_ready_mid_budget() {
        let calls = AtomicU32::new(0);

        let outcome = poll_until(FAST, "third-time", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, ()>(n == 3) }
        })
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::Ready);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn check_error_aborts_immediately() {
        let calls = AtomicU32::new(0);

        let result = poll_until(FAST, "broken", || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 2 {
                    Err("query failed")
                } else {
                    Ok(false)
                }
            }
        })
        .await;

        assert_eq!(result, Err("query failed"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn budget_is_interval_times_attempts() {
        let config = PollConfig::new(Duration::from_secs(5), 12);
        assert_eq!(config.budget(), Duration::from_secs(60));
    }
}
