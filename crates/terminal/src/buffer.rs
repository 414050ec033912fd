//! Output coalescing between a backend stream and a rendering surface.
//!
//! A session can deliver many small chunks per display frame; writing each
//! one through individually wastes surface work and tears visibly. The
//! buffer queues chunks in arrival order, and the first chunk since the last
//! flush arms exactly one flush at the next frame boundary. The flush merges
//! everything queued by then into a single surface write and re-arms.
//!
//! Guarantees: at most one flush per frame, FIFO chunk order, nothing
//! dropped while the buffer is alive. `shutdown` (and drop) aborts a pending
//! flush so no background work can touch a destroyed surface.

use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::AbortHandle;
use util::LatencyRecorder;

use crate::{FrameClock, SharedSurface};

type ChunkQueue = SmallVec<[Vec<u8>; 4]>;

struct Pending {
    abort: AbortHandle,
    first_chunk_at: Instant,
}

#[derive(Default)]
struct BufferState {
    chunks: ChunkQueue,
    pending: Option<Pending>,
}

pub struct OutputBuffer {
    surface: SharedSurface,
    frames: FrameClock,
    state: Arc<Mutex<BufferState>>,
    latency: Option<Arc<Mutex<LatencyRecorder>>>,
}

impl OutputBuffer {
    pub fn new(surface: SharedSurface, frames: FrameClock) -> Self {
        Self {
            surface,
            frames,
            state: Arc::new(Mutex::new(BufferState::default())),
            latency: None,
        }
    }

    /// Record chunk-arrival-to-flush durations into `recorder`.
    pub fn with_latency(mut self, recorder: Arc<Mutex<LatencyRecorder>>) -> Self {
        self.latency = Some(recorder);
        self
    }

    /// Queue one chunk. The first chunk since the last flush schedules the
    /// next one; later chunks ride along. Must be called on the runtime.
    pub fn write(&self, chunk: Vec<u8>) {
        let mut state = self.state.lock();
        state.chunks.push(chunk);
        if state.pending.is_some() {
            return;
        }

        let shared = Arc::clone(&self.state);
        let surface = Arc::clone(&self.surface);
        let latency = self.latency.clone();
        // Snapshot "now" on the frame stream before spawning, so the flush
        // waits for a boundary strictly after this chunk arrived.
        let mut frames = self.frames.clone();
        frames.mark_seen();
        let handle = tokio::spawn(async move {
            if !frames.next_frame().await {
                return;
            }
            let (merged, first_chunk_at) = {
                let mut state = shared.lock();
                let first_chunk_at = state.pending.take().map(|p| p.first_chunk_at);
                (merge_chunks(&mut state.chunks), first_chunk_at)
            };
            if merged.is_empty() {
                return;
            }
            surface.lock().write(&merged);
            if let (Some(recorder), Some(since)) = (latency, first_chunk_at) {
                recorder
                    .lock()
                    .record(since.elapsed().as_secs_f64() * 1000.0);
            }
        });
        state.pending = Some(Pending {
            abort: handle.abort_handle(),
            first_chunk_at: Instant::now(),
        });
    }

    /// Abort any pending flush and drop queued chunks. Called on pane
    /// detach, before the surface is destroyed.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        if let Some(pending) = state.pending.take() {
            pending.abort.abort();
        }
        state.chunks.clear();
    }
}

impl Drop for OutputBuffer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Contiguous merge in arrival order. The single-chunk case hands the
/// allocation through untouched.
fn merge_chunks(chunks: &mut ChunkQueue) -> Vec<u8> {
    match chunks.len() {
        0 => Vec::new(),
        1 => chunks.remove(0),
        _ => {
            let total = chunks.iter().map(Vec::len).sum();
            let mut merged = Vec::with_capacity(total);
            for chunk in chunks.drain(..) {
                merged.extend_from_slice(&chunk);
            }
            merged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameDriver, RenderSurface};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingSurface {
        writes: Vec<Vec<u8>>,
    }

    impl RenderSurface for RecordingSurface {
        fn write(&mut self, bytes: &[u8]) {
            self.writes.push(bytes.to_vec());
        }

        fn resize(&mut self, _cols: u16, _rows: u16) {}

        fn size(&self) -> (u16, u16) {
            (80, 24)
        }
    }

    fn recording_surface() -> (Arc<Mutex<RecordingSurface>>, SharedSurface) {
        let surface = Arc::new(Mutex::new(RecordingSurface::default()));
        (surface.clone(), surface)
    }

    /// Let already-woken tasks run to their next await point.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn chunks_within_one_frame_flush_once() {
        let driver = FrameDriver::new();
        let (recorder, surface) = recording_surface();
        let buffer = OutputBuffer::new(surface, driver.clock());

        buffer.write(b"a".to_vec());
        buffer.write(b"b".to_vec());
        buffer.write(b"c".to_vec());

        driver.tick();
        settle().await;

        assert_eq!(recorder.lock().writes, vec![b"abc".to_vec()]);
    }

    #[tokio::test]
    async fn chunks_across_frames_flush_per_frame_in_order() {
        let driver = FrameDriver::new();
        let (recorder, surface) = recording_surface();
        let buffer = OutputBuffer::new(surface, driver.clock());

        buffer.write(b"ab".to_vec());
        driver.tick();
        settle().await;

        buffer.write(b"c".to_vec());
        buffer.write(b"d".to_vec());
        driver.tick();
        settle().await;

        assert_eq!(
            recorder.lock().writes,
            vec![b"ab".to_vec(), b"cd".to_vec()]
        );
    }

    #[tokio::test]
    async fn nothing_flushes_before_the_frame_boundary() {
        let driver = FrameDriver::new();
        let (recorder, surface) = recording_surface();
        let buffer = OutputBuffer::new(surface, driver.clock());

        buffer.write(b"late".to_vec());
        settle().await;

        assert!(recorder.lock().writes.is_empty());
        drop(buffer);
    }

    #[tokio::test]
    async fn tick_without_chunks_writes_nothing() {
        let driver = FrameDriver::new();
        let (recorder, surface) = recording_surface();
        let _buffer = OutputBuffer::new(surface, driver.clock());

        driver.tick();
        settle().await;

        assert!(recorder.lock().writes.is_empty());
    }

    #[tokio::test]
    async fn shutdown_aborts_the_pending_flush() {
        let driver = FrameDriver::new();
        let (recorder, surface) = recording_surface();
        let buffer = OutputBuffer::new(surface, driver.clock());

        buffer.write(b"doomed".to_vec());
        buffer.shutdown();
        driver.tick();
        settle().await;

        assert!(recorder.lock().writes.is_empty());
    }

    #[tokio::test]
    async fn drop_aborts_like_shutdown() {
        let driver = FrameDriver::new();
        let (recorder, surface) = recording_surface();
        let buffer = OutputBuffer::new(surface, driver.clock());

        buffer.write(b"doomed".to_vec());
        drop(buffer);
        driver.tick();
        settle().await;

        assert!(recorder.lock().writes.is_empty());
    }

    #[tokio::test]
    async fn flush_records_latency_when_attached() {
        let driver = FrameDriver::new();
        let (_recorder, surface) = recording_surface();
        let samples = Arc::new(Mutex::new(LatencyRecorder::new()));
        let buffer = OutputBuffer::new(surface, driver.clock()).with_latency(samples.clone());

        buffer.write(b"x".to_vec());
        driver.tick();
        settle().await;

        assert_eq!(samples.lock().count(), 1);
    }

    #[test]
    fn merge_is_fifo_and_single_chunk_passes_through() {
        let mut queue: ChunkQueue = ChunkQueue::new();
        queue.push(b"only".to_vec());
        assert_eq!(merge_chunks(&mut queue), b"only".to_vec());
        assert!(queue.is_empty());

        queue.push(b"1".to_vec());
        queue.push(b"22".to_vec());
        queue.push(b"333".to_vec());
        assert_eq!(merge_chunks(&mut queue), b"122333".to_vec());
        assert!(queue.is_empty());
    }
}
