//! Entry-delay timer: a single cancellable one-shot countdown.
//!
//! Every start hands out a fresh [`TimerToken`]. The expiry callback gets
//! that token and must [`claim`](EntryDelayTimer::claim) it under the same
//! lock that guards [`cancel`](EntryDelayTimer::cancel). A cancel that wins
//! the lock first clears the token, so the late expiry claims nothing.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use entryguard_domain::error::InvariantViolation;

/// Identifies one armed countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug)]
struct Armed {
    token: TimerToken,
    handle: JoinHandle<()>,
}

/// At most one live countdown.
#[derive(Debug, Default)]
pub struct EntryDelayTimer {
    armed: Option<Armed>,
    issued: u64,
}

impl EntryDelayTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot countdown that calls `on_expire` once `duration` has
    /// elapsed.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::TimerAlreadyArmed`] if a countdown is
    /// still live; callers must cancel first.
    pub fn start<F, Fut>(
        &mut self,
        duration: Duration,
        on_expire: F,
    ) -> Result<TimerToken, InvariantViolation>
    where
        F: FnOnce(TimerToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.armed.is_some() {
            return Err(InvariantViolation::TimerAlreadyArmed);
        }

        self.issued += 1;
        let token = TimerToken(self.issued);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            on_expire(token).await;
        });
        self.armed = Some(Armed { token, handle });

        tracing::debug!(?token, delay_ms = duration.as_millis(), "entry-delay timer armed");
        Ok(token)
    }

    /// Disarm the live countdown, if any. Idempotent.
    ///
    /// Returns `true` when a countdown was actually disarmed.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(armed) => {
                armed.handle.abort();
                tracing::debug!(token = ?armed.token, "entry-delay timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Accept an expiry for `token`.
    ///
    /// Returns `true` exactly once per armed countdown, and only if it was
    /// not cancelled first. The timer is idle afterwards.
    pub fn claim(&mut self, token: TimerToken) -> bool {
        if self.armed.as_ref().is_some_and(|armed| armed.token == token) {
            // the claiming task is the countdown itself; detach, don't abort
            self.armed = None;
            true
        } else {
            tracing::debug!(?token, "stale entry-delay expiry ignored");
            false
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

impl Drop for EntryDelayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
