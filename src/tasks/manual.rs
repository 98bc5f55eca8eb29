//! Manual Scheduler
//!
//! Deterministic virtual clock for embedders without an event loop and for
//! tests that need exact control over when entries expire.

use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::tasks::expiry::{ExpiryHandle, ExpiryScheduler, ExpiryTask};

struct Pending {
    deadline: Duration,
    seq: u64,
    task: ExpiryTask,
    handle: ExpiryHandle,
}

#[derive(Default)]
struct ClockState {
    /// Virtual time elapsed since creation
    now: Duration,
    next_seq: u64,
    queue: Vec<Pending>,
}

/// Scheduler driven by explicit calls to [`ManualScheduler::advance`].
///
/// A timer armed for `ttl` runs during the first `advance` that brings the
/// virtual clock to or past its deadline. Timers sharing a deadline run in
/// the order they were scheduled.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ClockState>,
}

impl ManualScheduler {
    /// Creates a scheduler whose virtual clock starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of armed timers that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.state
            .lock()
            .queue
            .iter()
            .filter(|pending| !pending.handle.is_cancelled())
            .count()
    }

    /// Moves the virtual clock forward by `by` and runs every due timer.
    ///
    /// The clock saturates at [`Duration::MAX`]. Returns the number of tasks
    /// that ran.
    pub fn advance(&self, by: Duration) -> usize {
        let mut due = {
            let mut state = self.state.lock();
            state.now = state.now.saturating_add(by);
            let now = state.now;

            let (due, waiting): (Vec<_>, Vec<_>) = state
                .queue
                .drain(..)
                .filter(|pending| !pending.handle.is_cancelled())
                .partition(|pending| pending.deadline <= now);
            state.queue = waiting;
            due
        };

        due.sort_by_key(|pending| (pending.deadline, pending.seq));

        // Lock released: tasks may touch the scheduler again.
        let mut ran = 0;
        for pending in due {
            if pending.handle.is_cancelled() {
                continue;
            }
            (pending.task)();
            ran += 1;
        }

        if ran > 0 {
            debug!(ran, "Manual clock fired expiry timers");
        }
        ran
    }
}

impl ExpiryScheduler for ManualScheduler {
    fn schedule(&self, after: Duration, task: ExpiryTask) -> Result<ExpiryHandle> {
        let handle = ExpiryHandle::new();
        let mut state = self.state.lock();
        state.queue.retain(|pending| !pending.handle.is_cancelled());

        // A deadline past the end of the clock can never be reached.
        let Some(deadline) = state.now.checked_add(after) else {
            debug!(?after, "Expiry delay exceeds the manual clock range, timer never fires");
            return Ok(handle);
        };

        let seq = state.next_seq;
        state.next_seq += 1;

        state.queue.push(Pending {
            deadline,
            seq,
            task,
            handle: handle.clone(),
        });

        Ok(handle)
    }
}
