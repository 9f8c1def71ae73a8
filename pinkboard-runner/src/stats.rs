use std::fmt;
use std::time::Duration;

use hdrhistogram::{CreationError, Histogram};

/// Highest frame time tracked, in microseconds. Slower frames are clamped.
const MAX_TRACKED_MICROS: u64 = 60_000_000;

/// Frame time distribution over a run.
pub struct FrameTimes {
    histogram: Histogram<u64>,
    over_budget: u64,
}

/// Condensed view of [`FrameTimes`], all times in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSummary {
    pub frames: u64,
    pub over_budget: u64,
    pub min: u64,
    pub p50: u64,
    pub p99: u64,
    pub max: u64,
}

impl FrameTimes {
    pub fn new() -> Result<Self, CreationError> {
        Ok(Self {
            histogram: Histogram::new_with_bounds(1, MAX_TRACKED_MICROS, 3)?,
            over_budget: 0,
        })
    }

    pub fn record(&mut self, elapsed: Duration, budget: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX).max(1);
        self.histogram.saturating_record(micros);
        if elapsed > budget {
            self.over_budget += 1;
        }
    }

    /// `None` until at least one frame has been recorded.
    pub fn summary(&self) -> Option<FrameSummary> {
        if self.histogram.is_empty() {
            return None;
        }
        Some(FrameSummary {
            frames: self.histogram.len(),
            over_budget: self.over_budget,
            min: self.histogram.min(),
            p50: self.histogram.value_at_quantile(0.5),
            p99: self.histogram.value_at_quantile(0.99),
            max: self.histogram.max(),
        })
    }
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames ({} over budget), frame time us: min={} p50={} p99={} max={}",
            self.frames, self.over_budget, self.min, self.p50, self.p99, self.max
        )
    }
}
