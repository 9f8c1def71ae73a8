use std::time::Instant;

/// Measures wall time between frames. The first tick reports zero.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    elapsed: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        self.elapsed += delta;
        delta as f32
    }

    /// Total seconds accumulated over all ticks.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}
