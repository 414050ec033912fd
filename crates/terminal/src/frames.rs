//! Display-frame boundary scheduling.
//!
//! "Apply on next paint" work (output flushes, batched layout) subscribes to
//! a [`FrameClock`] and wakes on the next tick. The shell owns the matching
//! [`FrameDriver`] and ticks it once per display refresh; tests tick it by
//! hand, which makes frame-boundary behavior fully deterministic.

use tokio::sync::watch;

/// Tick source for one workspace. Dropping the driver parks all clocks,
/// which only happens at shutdown.
pub struct FrameDriver {
    tx: watch::Sender<u64>,
}

impl FrameDriver {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx }
    }

    /// A clock subscribed to this driver's ticks.
    pub fn clock(&self) -> FrameClock {
        FrameClock {
            rx: self.tx.subscribe(),
        }
    }

    /// Advance one frame, waking every waiting clock.
    pub fn tick(&self) {
        self.tx.send_modify(|frame| *frame += 1);
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaitable handle on the frame stream.
#[derive(Clone)]
pub struct FrameClock {
    rx: watch::Receiver<u64>,
}

impl FrameClock {
    /// Mark every tick delivered so far as seen. Deferred work calls this at
    /// scheduling time so a long-held clone cannot fire early off a tick
    /// from an earlier frame.
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }

    /// Wait for the next unseen frame tick. Returns false when the driver
    /// is gone (shutdown), in which case the caller must not do its
    /// deferred work.
    pub async fn next_frame(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
