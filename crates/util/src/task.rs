//! Abort-on-drop handle for owned background tasks.

use tokio::task::{AbortHandle, JoinHandle};

/// Owns a spawned task and aborts it when dropped.
///
/// Pane-owned background work (refresh timers, pending flushes) must never
/// outlive its pane, so every such task is held through one of these. The
/// task is detached, not joined: abort lands at the next await point, which
/// is always before the task touches shared state again.
#[derive(Debug)]
pub struct TaskGuard {
    abort: AbortHandle,
}

impl TaskGuard {
    pub fn new<T>(handle: JoinHandle<T>) -> Self {
        Self {
            abort: handle.abort_handle(),
        }
    }

    /// Spawn a future and guard it.
    pub fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        Self::new(tokio::spawn(future))
    }

    /// Abort the task now instead of waiting for drop.
    pub fn abort(&self) {
        self.abort.abort();
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn dropping_guard_aborts_task() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();

        let guard = TaskGuard::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            fired_clone.store(true, Ordering::SeqCst);
        });
        drop(guard);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!fired.load(Ordering::SeqCst), "aborted task must not run");
    }

    #[tokio::test(start_paused = true)]
    async fn guarded_task_runs_to_completion_when_kept() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();

        let _guard = TaskGuard::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            fired_clone.store(true, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(fired.load(Ordering::SeqCst));
    }
}
