//! Trailing-edge debouncer for bursty events.
//!
//! Resize observations arrive in storms while the user drags a divider;
//! only the last one within the window should trigger a surface re-fit.
//! Each `call` cancels the previously scheduled action and arms a new one,
//! so exactly one action fires once the burst goes quiet.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::AbortHandle;

pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `action` to run after the debounce delay, replacing any
    /// previously scheduled action that has not fired yet.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(prev) = pending.take() {
            prev.abort();
        }

        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
        *pending = Some(handle.abort_handle());
    }

    /// Drop any scheduled action without running it.
    pub fn cancel(&self) {
        if let Some(prev) = self.pending.lock().take() {
            prev.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let reader = {
            let count = count.clone();
            move || count.load(Ordering::SeqCst)
        };
        (count, reader)
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_call_in_burst_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let (count, fired) = counter();

        for _ in 0..5 {
            let count = count.clone();
            debouncer.call(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_fire_separately() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let (count, fired) = counter();

        for _ in 0..2 {
            let count = count.clone();
            debouncer.call(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        assert_eq!(fired(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_pending_action() {
        let debouncer = Debouncer::new(Duration::from_millis(100));
        let (count, fired) = counter();

        {
            let count = count.clone();
            debouncer.call(move || {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired(), 0);
    }
}
