//! Trailing-edge debouncing for the keyword box.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Holds back a rapidly-changing value until it has been stable for `delay`.
///
/// Only the most recent pushed value can ever settle. The debouncer owns no
/// timer task: [`Debouncer::settled`] sleeps until the current deadline, so
/// dropping the debouncer (or calling [`Debouncer::cancel`]) guarantees that
/// nothing fires afterwards.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending value and restarts the timer.
    pub fn push(&mut self, value: T) {
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.delay,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Settles the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }

    /// Resolves with the pending value once its deadline passes. Never
    /// resolves while nothing is pending. Cancel safe: dropping the future
    /// keeps the pending value and its deadline.
    pub async fn settled(&mut self) -> T {
        let deadline = match &self.pending {
            Some(pending) => pending.deadline,
            None => std::future::pending().await,
        };
        sleep_until(deadline).await;

        match self.pending.take() {
            Some(pending) => pending.value,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod tests;
