//! Retry policy for failed email deliveries.

use chrono::{DateTime, TimeDelta, Utc};

/// Fixed-backoff, bounded retry policy.
///
/// `max_retries` counts re-deliveries after the first attempt, so a job is
/// tried at most `max_retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: TimeDelta,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: TimeDelta::seconds(30),
        }
    }
}

/// What to do with a job whose delivery just failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again at `run_at`; `attempts` failures are now recorded.
    Reschedule { attempts: u32, run_at: DateTime<Utc> },
    /// Stop retrying.
    GiveUp { attempts: u32 },
}

impl RetryPolicy {
    /// Decide the fate of a job that had `previous_failures` before the
    /// failure observed at `now`.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::{RetryDecision, RetryPolicy};
    /// use chrono::Utc;
    ///
    /// let now = Utc::now();
    /// let policy = RetryPolicy::default();
    /// assert!(matches!(policy.after_failure(0, now), RetryDecision::Reschedule { attempts: 1, .. }));
    /// assert_eq!(policy.after_failure(3, now), RetryDecision::GiveUp { attempts: 4 });
    /// ```
    #[must_use]
    pub fn after_failure(&self, previous_failures: u32, now: DateTime<Utc>) -> RetryDecision {
        let attempts = previous_failures.saturating_add(1);
        if attempts > self.max_retries {
            RetryDecision::GiveUp { attempts }
        } else {
            RetryDecision::Reschedule {
                attempts,
                run_at: now + self.backoff,
            }
        }
    }
}
