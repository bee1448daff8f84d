//! Cooperative cancellation
//!
//! A `CancelToken` is shared between the termination signal handler and
//! the sampling loop. Waiting on it wakes immediately when cancelled.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests termination. Idempotent.
    pub fn cancel(&self) {
        let (lock, cvar) = &*self.inner;
        *self.flag(lock) = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.flag(&self.inner.0)
    }

    /// Blocks for up to `timeout`.
    ///
    /// # Returns
    /// `true` if cancelled before or during the wait
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.flag(lock);
        while !*cancelled {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            cancelled = match cvar.wait_timeout(cancelled, remaining) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        *cancelled
    }

    fn flag<'a>(&self, lock: &'a Mutex<bool>) -> MutexGuard<'a, bool> {
        lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Cancels `token` on SIGINT, SIGTERM or SIGHUP
pub fn install_signal_handler(token: &CancelToken) -> Result<(), ctrlc::Error> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        info!("termination requested");
        token.cancel();
    })
}
