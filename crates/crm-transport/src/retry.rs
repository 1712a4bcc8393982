//! Bounded retry with a fixed inter-attempt delay.
//!
//! Used by recovery-sensitive call sites (password-reset submission,
//! post-refresh re-verification) that talk to the gateway directly. The
//! policy knows nothing about error kinds: [`RetryPolicy::run`] retries on
//! *any* error, including validation errors the server will reject
//! identically next time. Callers needing selective retry use
//! [`RetryPolicy::run_if`] with a predicate.

use std::time::Duration;

use tracing::debug;

/// Fixed-count, fixed-delay retry. No backoff, no jitter.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least 1; a zero delay is permitted
    /// and retries immediately.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` up to `max_attempts` times, sleeping `delay` between
    /// attempts. Returns on the first success; after exhaustion the last
    /// error is returned unchanged, not wrapped.
    pub fn run<T, E>(&self, op: impl FnMut() -> Result<T, E>) -> Result<T, E> {
        self.run_if(op, |_| true)
    }

    /// Like [`run`](Self::run), but an error rejected by `should_retry` is
    /// returned immediately with no further attempts.
    pub fn run_if<T, E>(
        &self,
        mut op: impl FnMut() -> Result<T, E>,
        should_retry: impl Fn(&E) -> bool,
    ) -> Result<T, E> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts || !should_retry(&err) {
                        return Err(err);
                    }
                    debug!(attempt, max_attempts = self.max_attempts, "attempt failed, retrying");
                    std::thread::sleep(self.delay);
                    attempt += 1;
                }
            }
        }
    }
}
