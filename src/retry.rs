use std::thread;
use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: usize = 4;
const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Bounded retry with a linearly growing, blocking delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
}

/// Passed to the retry callback before the next attempt is made.
#[derive(Debug)]
pub struct RetryContext<'a, E> {
    pub attempt: usize,
    pub max_attempts: usize,
    pub delay: Duration,
    pub error: &'a E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        )
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Runs `operation` until it succeeds, fails with an error `is_transient`
    /// rejects, or the attempt budget is spent. The last error is returned
    /// unchanged in the latter two cases.
    pub fn execute<T, E, Op, OnRetry, Transient>(
        &self,
        mut operation: Op,
        mut on_retry: OnRetry,
        is_transient: Transient,
    ) -> Result<T, E>
    where
        Op: FnMut() -> Result<T, E>,
        OnRetry: FnMut(&RetryContext<'_, E>),
        Transient: Fn(&E) -> bool,
    {
        let mut attempt = 1usize;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts || !is_transient(&err) {
                        return Err(err);
                    }
                    let delay = self.base_delay * attempt as u32;
                    on_retry(&RetryContext {
                        attempt,
                        max_attempts: self.max_attempts,
                        delay,
                        error: &err,
                    });
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_still_runs_once() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        let mut calls = 0;
        let result: Result<(), &str> = policy.execute(
            || {
                calls += 1;
                Err("boom")
            },
            |_| {},
            |_| true,
        );
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn delay_grows_with_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        let mut delays = Vec::new();
        let _: Result<(), &str> = policy.execute(
            || Err("boom"),
            |ctx| delays.push(ctx.delay),
            |_| true,
        );
        assert_eq!(
            delays,
            vec![Duration::from_millis(1), Duration::from_millis(2)]
        );
    }
}
