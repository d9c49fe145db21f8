//! Dispatch-and-detach for best-effort side effects
//!
//! Work handed to `ReportDispatcher::detach` is spawned on the current Tokio
//! runtime and never awaited by the caller. Failures are logged at debug level
//! and dropped. This is the only place the pipeline detaches work.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ReportDispatcher {
    tracker: TaskTracker,
}

impl ReportDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` without waiting for it
    ///
    /// An error from the task is logged as `"{failure}: {error}"`. Returns
    /// `false` when no runtime is available and the task was dropped.
    pub fn detach<F, E>(&self, failure: &'static str, task: F) -> bool
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let Ok(handle) = Handle::try_current() else {
            debug!("{failure}: no async runtime available");
            return false;
        };

        self.tracker.spawn_on(
            async move {
                if let Err(e) = task.await {
                    debug!(error = %e, "{failure}: {e}");
                }
            },
            &handle,
        );
        true
    }

    /// Number of detached tasks still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Wait up to `deadline` for detached tasks to finish
    ///
    /// Returns `true` if everything finished in time. Tasks still running are
    /// left alone.
    pub async fn drain(&self, deadline: Duration) -> bool {
        self.tracker.close();
        let finished = tokio::time::timeout(deadline, self.tracker.wait())
            .await
            .is_ok();
        self.tracker.reopen();
        finished
    }
}
