//! Quiet-window scheduling for keystroke-driven work such as live search.

use crate::config::SearchConfig;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Default quiet window.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Runs only the most recently scheduled job, once no new job has arrived for
/// the quiet window.
///
/// Scheduling cancels the pending job if its window has not elapsed. A job
/// that has started runs to completion even if another is scheduled. Must be
/// used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub const fn from_config(config: &SearchConfig) -> Self {
        Self::new(Duration::from_millis(config.debounce_ms))
    }

    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Replace any pending job with `job`, to run after the quiet window.
    pub fn schedule<F>(&mut self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.cancel() {
            trace!("debounced job superseded");
        }

        // Deadline is fixed now, not when the task is first polled.
        let quiet = tokio::time::sleep(self.window);
        self.pending = Some(tokio::spawn(async move {
            quiet.await;
            // Detached so that a later cancel cannot interrupt it.
            tokio::spawn(job);
        }));
    }

    /// Cancel the pending job. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            },
            _ => false,
        }
    }

    /// Whether a job is still inside its quiet window.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
