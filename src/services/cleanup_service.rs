//! Delayed one-shot cleanup tasks
//!
//! Artifacts and usage prompts are removed on a timer. Failures are logged and
//! dropped; nothing is retried.

use std::future::Future;
use std::path::PathBuf;

use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// How long a rendered chart stays on disk
pub const ARTIFACT_TTL: Duration = Duration::from_secs(20);

/// A background task that runs once after a delay
pub struct ScheduledTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `task` after `delay` unless cancelled first
    pub fn spawn_after<F>(delay: Duration, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {
                    tracing::debug!("Scheduled task cancelled before it fired");
                }
                _ = tokio::time::sleep(delay) => task.await,
            }
        });

        Self { token, handle }
    }

    /// Stop the task before it fires; the bot itself never cancels
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to fire (or be cancelled)
    #[cfg_attr(not(test), allow(dead_code))]
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::warn!("Scheduled task failed: {}", e);
        }
    }
}

/// Delete `path` once `delay` has elapsed
pub fn schedule_artifact_deletion(path: PathBuf, delay: Duration) -> ScheduledTask {
    tracing::debug!("Scheduling deletion of {} in {:?}", path.display(), delay);
    ScheduledTask::spawn_after(delay, async move {
        match std::fs::remove_file(&path) {
            Ok(_) => tracing::debug!("✓ Chart file deleted: {}", path.display()),
            Err(e) => tracing::warn!("Failed to delete chart file {}: {}", path.display(), e),
        }
    })
}
