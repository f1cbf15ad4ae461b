//! # Mongodoki Bounded Retry
//!
//! File: cli/src/core/retry.rs
//! Repository: https://github.com/mongodoki/mongodoki-rs
//!
//! ## Overview
//!
//! A small bounded-retry combinator shared by the two polling sites in the
//! provisioning flow: waiting for the database to accept connections after
//! container start, and waiting for an in-container restore command to
//! finish. Both derive their budget from a caller-supplied timeout.
//!
//! A budget allows `max_retries + 1` attempts: the initial attempt plus one
//! retry per unit of budget. The interval between attempts is
//! `round(timeout / max_retries)`, floored at one millisecond so a tiny
//! timeout still yields a real (if rapid) polling loop.
//!
//! Timeouts here are advisory: the loop bounds how many times it asks, not
//! how long an individual attempt may take. An attempt that hangs can push
//! the loop past the nominal timeout.
//!
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// A fixed number of retries with a base interval between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    pub max_retries: u32,
    pub interval: Duration,
}

impl RetryBudget {
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    /// Derives a budget from an overall timeout: the interval is the timeout
    /// split evenly across `max_retries`, rounded to whole milliseconds and
    /// floored at 1 ms.
    pub fn from_timeout(timeout: Duration, max_retries: u32) -> Self {
        let retries = max_retries.max(1) as u128;
        let per_attempt = ((timeout.as_millis() + retries / 2) / retries).max(1);
        Self {
            max_retries,
            interval: Duration::from_millis(per_attempt as u64),
        }
    }

    /// Total attempts this budget admits.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}

/// Delay policy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same interval between every attempt.
    Fixed,
    /// Interval multiplied by `factor` after each failure (saturating).
    Exponential { factor: u32 },
}

impl Backoff {
    /// Delay before the retry following failure number `failures` (0-based).
    fn delay(&self, base: Duration, failures: u32) -> Duration {
        match self {
            Backoff::Fixed => base,
            Backoff::Exponential { factor } => base.saturating_mul(factor.saturating_pow(failures)),
        }
    }
}

/// The budget ran out. Carries the final attempt's error so the caller can
/// surface or log it.
#[derive(Debug)]
pub struct Exhausted<E> {
    /// How many attempts were made (always `max_retries + 1`).
    pub attempts: u32,
    pub last_error: E,
}

/// Runs `attempt` until it succeeds or the budget is exhausted, sleeping
/// between attempts per the backoff policy. Attempts are strictly
/// sequential; each one completes before the next begins.
pub async fn retry<T, E, F, Fut>(
    budget: &RetryBudget,
    backoff: Backoff,
    mut attempt: F,
) -> std::result::Result<T, Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut failures = 0u32;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                failures += 1;
                if failures > budget.max_retries {
                    return Err(Exhausted {
                        attempts: failures,
                        last_error: err,
                    });
                }
                let delay = backoff.delay(budget.interval, failures - 1);
                debug!(
                    "attempt {}/{} failed, retrying in {:?}",
                    failures,
                    budget.max_attempts(),
                    delay
                );
                sleep(delay).await;
            }
        }
    }
}
