//! Expiry Scheduling
//!
//! One-shot timers that delete a key once its time-to-live has elapsed.
//!
//! The typed layer never owns a timer registry: it asks an injected
//! [`ExpiryScheduler`] to run a deletion after a delay and hands the
//! resulting [`ExpiryHandle`] back to its caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, trace};

use crate::error::{Result, StorageError};

/// Deferred action run by a scheduler when a timer fires.
pub type ExpiryTask = Box<dyn FnOnce() + Send + 'static>;

// == Expiry Handle ==
/// Cancellation token for one scheduled expiry.
///
/// Cancelling only prevents a timer that has not fired yet; it never
/// restores an entry that was already deleted.
#[derive(Debug, Clone, Default)]
pub struct ExpiryHandle {
    cancelled: Arc<AtomicBool>,
}

impl ExpiryHandle {
    /// Creates a handle that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prevents the scheduled deletion from running.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns true once [`ExpiryHandle::cancel`] was called on this handle
    /// or any clone of it.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// == Scheduler Trait ==
/// Capability to run a task once after a delay.
pub trait ExpiryScheduler: Send + Sync {
    /// Arms `task` to run once `after` has elapsed, measured from this call.
    ///
    /// # Errors
    /// Returns [`StorageError::SchedulerUnavailable`] if no executor can run
    /// the timer.
    fn schedule(&self, after: Duration, task: ExpiryTask) -> Result<ExpiryHandle>;
}

// == Tokio Scheduler ==
/// Runs expiry timers as tasks on a tokio runtime.
///
/// Without an explicit runtime handle, the runtime current at schedule time
/// is used.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    runtime: Option<Handle>,
}

impl TokioScheduler {
    /// Creates a scheduler bound to whichever runtime is current when scheduling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler that always spawns on `runtime`.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime: Some(runtime),
        }
    }
}

impl ExpiryScheduler for TokioScheduler {
    /// Spawns a task that sleeps for `after` and then runs `task`.
    ///
    /// # Example
    /// ```ignore
    /// let scheduler = TokioScheduler::new();
    /// let handle = scheduler.schedule(Duration::from_secs(1), Box::new(|| ()))?;
    /// // Later, to keep the entry:
    /// handle.cancel();
    /// ```
    fn schedule(&self, after: Duration, task: ExpiryTask) -> Result<ExpiryHandle> {
        let runtime = match &self.runtime {
            Some(runtime) => runtime.clone(),
            None => Handle::try_current()
                .map_err(|err| StorageError::SchedulerUnavailable(err.to_string()))?,
        };

        let handle = ExpiryHandle::new();
        let token = handle.clone();

        runtime.spawn(async move {
            tokio::time::sleep(after).await;

            if token.is_cancelled() {
                debug!("Expiry timer cancelled before firing");
                return;
            }

            trace!(after_ms = after.as_millis() as u64, "Expiry timer fired");
            task();
        });

        Ok(handle)
    }
}
