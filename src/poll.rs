//! Bounded polling with a fixed schedule of delays.
//!
//! [`poll_with_backoff`] knows nothing about canvases: it runs an attempt, and on failure
//! sleeps for the next delay in the schedule before trying again. Time goes through the
//! [`Clock`] trait so tests can substitute a fake clock.
//!
//! Delays are awaited, not slept: while one export waits, other tasks on the same runtime
//! (a paint, for instance) keep running.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Source of delays between attempts.
pub trait Clock {
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()>;
}

/// Waits on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

/// The delays slept between consecutive attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    delays: Vec<Duration>,
}

impl Backoff {
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            delays: delays.into_iter().collect(),
        }
    }

    /// Schedule used when exporting: retry after 100ms, then once more after 500ms.
    pub fn export() -> Self {
        Self::new([Duration::from_millis(100), Duration::from_millis(500)])
    }

    /// Total number of attempts, the first one being immediate.
    pub fn attempts(&self) -> usize {
        self.delays.len() + 1
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::export()
    }
}

/// Every attempt failed; carries the error of the last one.
#[derive(Debug, Error)]
#[error("gave up after {attempts} attempts: {last}")]
pub struct Exhausted<E> {
    pub attempts: usize,
    pub last: E,
}

/// Runs `attempt` until it succeeds or the schedule runs out.
///
/// `attempt` receives the zero-based attempt number. Attempts run sequentially and the clock
/// is only awaited between a failure and the next attempt, never after the last one.
pub async fn poll_with_backoff<T, E, C, F>(
    clock: &mut C,
    backoff: &Backoff,
    mut attempt: F,
) -> Result<T, Exhausted<E>>
where
    C: Clock + ?Sized,
    F: FnMut(usize) -> Result<T, E>,
    E: fmt::Display,
{
    let mut result = attempt(0);
    for (index, delay) in backoff.delays.iter().enumerate() {
        match result {
            Ok(value) => return Ok(value),
            Err(err) => {
                debug!(attempt = index + 1, %err, ?delay, "attempt failed, retrying");
                clock.sleep(*delay).await;
                result = attempt(index + 1);
            }
        }
    }
    result.map_err(|last| Exhausted {
        attempts: backoff.attempts(),
        last,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Records sleeps and advances a shared virtual time.
    #[derive(Debug, Default, Clone)]
    pub(crate) struct FakeClock {
        pub(crate) now: Rc<Cell<Duration>>,
        pub(crate) sleeps: Vec<Duration>,
    }

    impl Clock for FakeClock {
        fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> {
            self.now.set(self.now.get() + duration);
            self.sleeps.push(duration);
            std::future::ready(())
        }
    }

    #[tokio::test]
    async fn test_immediate_success_never_sleeps() {
        let mut clock = FakeClock::default();
        let result: Result<_, Exhausted<String>> =
            poll_with_backoff(&mut clock, &Backoff::export(), |n| Ok(n)).await;
        assert_eq!(result.unwrap(), 0);
        assert!(clock.sleeps.is_empty());
    }

    #[tokio::test]
    async fn test_success_after_first_delay() {
        let mut clock = FakeClock::default();
        let mut calls = 0;
        let result = poll_with_backoff(&mut clock, &Backoff::export(), |n| {
            calls += 1;
            if n == 1 {
                Ok("ready")
            } else {
                Err("not yet")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ready");
        assert_eq!(calls, 2);
        assert_eq!(clock.sleeps, vec![Duration::from_millis(100)]);
    }

    #[tokio::test]
    async fn test_exhaustion_sleeps_each_delay_once() {
        let mut clock = FakeClock::default();
        let mut calls = 0;
        let result: Result<(), _> = poll_with_backoff(&mut clock, &Backoff::export(), |n| {
            calls += 1;
            Err(format!("miss {n}"))
        })
        .await;
        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.last, "miss 2");
        assert_eq!(exhausted.to_string(), "gave up after 3 attempts: miss 2");
        assert_eq!(calls, 3);
        assert_eq!(
            clock.sleeps,
            vec![Duration::from_millis(100), Duration::from_millis(500)]
        );
        assert_eq!(clock.now.get(), Duration::from_millis(600));
    }

    #[tokio::test]
    async fn test_empty_schedule_is_single_attempt() {
        let mut clock = FakeClock::default();
        let backoff = Backoff::new(Vec::<Duration>::new());
        let result: Result<(), _> = poll_with_backoff(&mut clock, &backoff, |_| Err("no")).await;
        assert_eq!(result.unwrap_err().attempts, 1);
        assert!(clock.sleeps.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_yields_to_other_tasks() {
        let flag = Arc::new(AtomicBool::new(false));
        let setter = Arc::clone(&flag);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            setter.store(true, Ordering::SeqCst);
        });

        let mut clock = TokioClock;
        let result = poll_with_backoff(&mut clock, &Backoff::export(), |n| {
            if flag.load(Ordering::SeqCst) {
                Ok(n)
            } else {
                Err("flag not set")
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
    }
}
