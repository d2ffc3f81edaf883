//! Scheduler infrastructure - Tokio timer backed scheduling

use std::time::Duration;

use crate::domain::scheduler::{ScheduledFuture, ScheduledTask, Scheduler};

/// Schedules tasks on the current Tokio runtime
///
/// Must be used from within a runtime context.
#[derive(Debug, Default, Clone)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, task: ScheduledFuture) -> ScheduledTask {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        ScheduledTask::new(move || handle.abort())
    }
}
