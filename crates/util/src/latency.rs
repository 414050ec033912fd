//! Bounded ring of duration samples for observability.
//!
//! Purely diagnostic: nothing in the runtime branches on these numbers.
//! The ring is capped so a long-lived session cannot grow it unbounded.

use std::collections::VecDeque;

/// Maximum retained samples; older samples are evicted first.
const MAX_SAMPLES: usize = 2000;

#[derive(Debug, Default)]
pub struct LatencyRecorder {
    samples: VecDeque<f64>,
    sorted: Option<Vec<f64>>,
}

impl LatencyRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one duration in milliseconds.
    pub fn record(&mut self, ms: f64) {
        self.samples.push_back(ms);
        if self.samples.len() > MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.sorted = None;
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.sorted = None;
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    fn sorted(&mut self) -> &[f64] {
        if self.sorted.is_none() {
            let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
            sorted.sort_by(|a, b| a.total_cmp(b));
            self.sorted = Some(sorted);
        }
        self.sorted.as_deref().unwrap_or(&[])
    }

    /// Nearest-rank percentile; `p` in 0..=100.
    pub fn percentile(&mut self, p: f64) -> f64 {
        let sorted = self.sorted();
        if sorted.is_empty() {
            return 0.0;
        }
        let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
        sorted[rank.saturating_sub(1)]
    }

    pub fn p50(&mut self) -> f64 {
        self.percentile(50.0)
    }

    pub fn p95(&mut self) -> f64 {
        self.percentile(95.0)
    }

    pub fn p99(&mut self) -> f64 {
        self.percentile(99.0)
    }

    pub fn min(&mut self) -> f64 {
        self.sorted().first().copied().unwrap_or(0.0)
    }

    pub fn max(&mut self) -> f64 {
        self.sorted().last().copied().unwrap_or(0.0)
    }

    /// One-line summary suitable for a status readout or log line.
    pub fn summary(&mut self) -> String {
        if self.samples.is_empty() {
            return "no samples".to_string();
        }
        format!(
            "n={} | p50={:.1}ms | p95={:.1}ms | p99={:.1}ms | min={:.1} | max={:.1}",
            self.count(),
            self.p50(),
            self.p95(),
            self.p99(),
            self.min(),
            self.max(),
        )
    }
}
