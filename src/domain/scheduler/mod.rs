//! Scheduler domain - Delayed task port used for debouncing

use std::fmt::{self, Debug};
use std::time::Duration;

use futures::future::BoxFuture;

/// Work handed to a scheduler
pub type ScheduledFuture = BoxFuture<'static, ()>;

/// Runs a task once after a delay
pub trait Scheduler: Send + Sync + Debug {
    /// Schedules `task` to run after `delay`; the returned handle cancels it
    fn schedule_after(&self, delay: Duration, task: ScheduledFuture) -> ScheduledTask;
}

/// Cancellation handle for a scheduled task
///
/// Dropping the handle does not cancel the task.
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Prevents the task from running if it has not started yet
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}
