use std::ops::Range;

use log::debug;

use crate::error::CoreError;
use crate::particle::Particle;
use crate::surface::DrawSurface;

/// Fixed-capacity ring buffer of particles.
///
/// Live particles occupy `[first_active, first_free)`, wrapping at the end of
/// the slot array, oldest first. One slot always stays free so that
/// `first_active == first_free` unambiguously means "empty"; adding to a full
/// pool evicts the oldest particle.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    first_active: usize,
    first_free: usize,
    max_age: f32,
}

impl ParticlePool {
    pub fn new(capacity: usize, max_age: f32) -> Result<Self, CoreError> {
        if capacity < 2 {
            return Err(CoreError::CapacityTooSmall(capacity));
        }
        if !max_age.is_finite() || max_age <= 0.0 {
            return Err(CoreError::InvalidMaxAge(max_age));
        }

        debug!("Allocating particle pool: capacity={}, max_age={}s", capacity, max_age);
        Ok(Self {
            slots: vec![Particle::default(); capacity],
            first_active: 0,
            first_free: 0,
            max_age,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn max_age(&self) -> f32 {
        self.max_age
    }

    /// Particles per second needed to keep the pool saturated.
    pub fn emission_rate(&self) -> f32 {
        self.capacity() as f32 / self.max_age
    }

    /// Number of live particles, at most `capacity - 1`.
    pub fn len(&self) -> usize {
        let capacity = self.capacity();
        (self.first_free + capacity - self.first_active) % capacity
    }

    pub fn is_empty(&self) -> bool {
        self.first_active == self.first_free
    }

    /// Live particles in insertion order (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &Particle> + '_ {
        let (head, tail) = self.live_ranges();
        self.slots[head].iter().chain(self.slots[tail].iter())
    }

    pub fn add(&mut self, x: f32, y: f32, dx: f32, dy: f32, effect: f32) {
        let capacity = self.capacity();
        self.slots[self.first_free].initialize(x, y, dx, dy, effect);

        self.first_free = (self.first_free + 1) % capacity;
        if self.first_free == self.first_active {
            self.first_active = (self.first_active + 1) % capacity;
        }
    }

    /// Advances every live particle, then retires expired ones from the head.
    pub fn update(&mut self, dt: f32) {
        let (head, tail) = self.live_ranges();
        // The wrapped tail always lies before the head's start index.
        let (front, back) = self.slots.split_at_mut(head.start);
        for particle in back[..head.len()].iter_mut().chain(front[tail].iter_mut()) {
            particle.update(dt);
        }

        // Oldest first, so the first survivor ends the scan.
        let capacity = self.capacity();
        while self.first_active != self.first_free
            && self.slots[self.first_active].age >= self.max_age
        {
            self.first_active = (self.first_active + 1) % capacity;
        }
    }

    pub fn draw<S: DrawSurface>(&self, surface: &mut S, sprite: &S::Sprite) {
        for particle in self.iter() {
            particle.draw(surface, sprite, self.max_age);
        }
    }

    /// The live range split into at most two contiguous index ranges.
    fn live_ranges(&self) -> (Range<usize>, Range<usize>) {
        if self.first_active <= self.first_free {
            (self.first_active..self.first_free, 0..0)
        } else {
            (self.first_active..self.capacity(), 0..self.first_free)
        }
    }
}
