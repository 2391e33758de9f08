//! Retry policy for calls to a table provider.
//!
//! A call reports its own outcome; classification of low-level errors lives
//! in separate functions so call sites stay small.

use std::{io, thread, time::Duration};

use log::warn;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    Success(T),
    /// Transient failure; the call may be attempted again.
    Retryable(String),
    Fatal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    #[error("giving up after {attempts} attempt(s): {reason}")]
    Exhausted { attempts: u32, reason: String },
    #[error("{0}")]
    Fatal(String),
}

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay after the given failed attempt (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt.saturating_sub(1) as i32);
        self.initial_backoff
            .mul_f64(factor)
            .min(self.max_backoff)
    }

    /// Runs `call` until it succeeds, fails fatally, or attempts run out.
    /// The attempt number (1-based) is passed to the call.
    pub fn run<T, F>(&self, sleeper: &dyn Sleeper, mut call: F) -> Result<T, RetryError>
    where
        F: FnMut(u32) -> CallOutcome<T>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match call(attempt) {
                CallOutcome::Success(value) => return Ok(value),
                CallOutcome::Fatal(reason) => return Err(RetryError::Fatal(reason)),
                CallOutcome::Retryable(reason) if attempt >= max_attempts => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        reason,
                    });
                }
                CallOutcome::Retryable(reason) => {
                    let delay = self.backoff_for(attempt);
                    warn!("Attempt {attempt}/{max_attempts} failed ({reason}); retrying in {delay:?}");
                    sleeper.sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

pub fn is_transient(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

pub fn classify_io_error<T>(err: io::Error) -> CallOutcome<T> {
    if is_transient(err.kind()) {
        CallOutcome::Retryable(err.to_string())
    } else {
        CallOutcome::Fatal(err.to_string())
    }
}

pub fn classify_io_result<T>(result: io::Result<T>) -> CallOutcome<T> {
    match result {
        Ok(value) => CallOutcome::Success(value),
        Err(err) => classify_io_error(err),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct RecordingSleeper {
        delays: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.delays.borrow_mut().push(duration);
        }
    }

    #[test]
    fn retries_transient_failures_with_backoff() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::default();
        let result = policy.run(&sleeper, |attempt| {
            if attempt < 3 {
                CallOutcome::Retryable("busy".into())
            } else {
                CallOutcome::Success(attempt)
            }
        });
        assert_eq!(result, Ok(3));
        assert_eq!(
            *sleeper.delays.borrow(),
            vec![Duration::from_millis(100), Duration::from_millis(200)]
        );
    }

    #[test]
    fn fatal_failures_stop_immediately() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;
        let result: Result<(), _> = RetryPolicy::default().run(&sleeper, |_| {
            calls += 1;
            CallOutcome::Fatal("denied".into())
        });
        assert_eq!(result, Err(RetryError::Fatal("denied".into())));
        assert_eq!(calls, 1);
        assert!(sleeper.delays.borrow().is_empty());
    }

    #[test]
    fn exhaustion_reports_attempts() {
        let sleeper = RecordingSleeper::default();
        let result: Result<(), _> =
            RetryPolicy::default().run(&sleeper, |_| CallOutcome::Retryable("timeout".into()));
        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                attempts: 3,
                reason: "timeout".into()
            })
        );
    }

    #[test]
    fn backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff: Duration::from_secs(1),
            multiplier: 10.0,
            max_backoff: Duration::from_secs(5),
        };
        assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(5));
    }

    #[test]
    fn io_errors_are_classified_by_kind() {
        let outcome: CallOutcome<()> =
            classify_io_error(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert!(matches!(outcome, CallOutcome::Retryable(_)));
        let outcome: CallOutcome<()> =
            classify_io_error(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(outcome, CallOutcome::Fatal(_)));
    }
}
