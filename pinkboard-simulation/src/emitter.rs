use std::f32::consts::PI;

use log::{debug, trace};
use pinkboard_config::EmissionMode;
use pinkboard_core::{ParticlePool, SpawnCurve, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Where a new particle starts and how fast it leaves, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnEvent {
    pub origin: Vector2,
    pub direction: Vector2,
}

impl SpawnEvent {
    /// Samples the curve at `t`. The particle moves radially away from the
    /// curve's centre at `velocity`; curve y points up, surface y points down.
    pub fn sample<C: SpawnCurve + ?Sized>(curve: &C, t: f32, center: Vector2, velocity: f32) -> Self {
        let point = curve.point_at(t);

        let mut direction = point;
        if direction.length() > 0.0 {
            direction.scale_to_length(velocity);
        } else {
            direction = Vector2::zero();
        }

        Self {
            origin: Vector2::new(center.x + point.x, center.y - point.y),
            direction: Vector2::new(direction.x, -direction.y),
        }
    }
}

/// Decides how many particles to spawn each frame and where.
#[derive(Debug, Clone)]
pub struct Emitter {
    rate: f32,
    velocity: f32,
    effect: f32,
    mode: EmissionMode,
    remainder: f32,
    rng: StdRng,
}

impl Emitter {
    pub fn new(rate: f32, velocity: f32, effect: f32, mode: EmissionMode, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(
            "Emitter: {:.1} particles/s, velocity={}, effect={}, mode={:?}",
            rate, velocity, effect, mode
        );
        Self {
            rate,
            velocity,
            effect,
            mode,
            remainder: 0.0,
            rng,
        }
    }

    /// Emits at the rate that keeps `pool` saturated: capacity / max age.
    pub fn for_pool(
        pool: &ParticlePool,
        velocity: f32,
        effect: f32,
        mode: EmissionMode,
        seed: Option<u64>,
    ) -> Self {
        Self::new(pool.emission_rate(), velocity, effect, mode, seed)
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn mode(&self) -> EmissionMode {
        self.mode
    }

    /// Number of particles due for a frame of `dt` seconds.
    ///
    /// Negative or non-finite `dt` counts as zero.
    pub fn spawn_count(&mut self, dt: f32) -> usize {
        let dt = sanitize_dt(dt);
        let amount = self.rate * dt;

        match self.mode {
            EmissionMode::Truncate => amount.floor() as usize,
            EmissionMode::Accumulate => {
                let total = amount + self.remainder;
                let whole = total.floor();
                self.remainder = total - whole;
                whole as usize
            }
        }
    }

    /// Spawns this frame's particles into `pool`, anchored at `center`.
    /// Returns how many were added.
    pub fn emit<C: SpawnCurve + ?Sized>(
        &mut self,
        pool: &mut ParticlePool,
        curve: &C,
        center: Vector2,
        dt: f32,
    ) -> usize {
        // Anything beyond capacity - 1 would be evicted before its first update.
        let count = self.spawn_count(dt).min(pool.capacity() - 1);

        for _ in 0..count {
            let t = self.rng.gen_range(-PI..=PI);
            let event = SpawnEvent::sample(curve, t, center, self.velocity);
            pool.add(
                event.origin.x,
                event.origin.y,
                event.direction.x,
                event.direction.y,
                self.effect,
            );
        }

        trace!("Emitted {} particles (dt={:.4}s)", count, dt);
        count
    }
}

/// Clamps a frame time to a usable, non-negative value.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}
