use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delay used when settings change in quick succession.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// A cancellable deferred action; rescheduling restarts the delay.
///
/// Only the wait is cancellable. Once the delay elapses the action is spawned
/// as its own task and runs to completion regardless of later calls.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer for `action`, replacing any deferral that has not fired.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut timer = self.timer();
        if let Some(previous) = timer.take() {
            previous.abort();
        }

        let delay = self.delay;
        *timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        }));
    }

    /// Drop a deferral that has not fired yet. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.timer().take() {
            Some(handle) => {
                let pending = !handle.is_finished();
                handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Whether a deferral is armed and has not fired.
    pub fn is_pending(&self) -> bool {
        self.timer().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.timer().take() {
            handle.abort();
        }
    }
}
