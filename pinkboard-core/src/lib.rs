//! Particle simulation core: a fixed-capacity ring buffer of particles
//! advanced by explicit Euler integration and retired by age.
//!
//! The host supplies the spawn curve, the sprite and the drawing surface
//! through the traits in [`surface`], and drives the pool once per frame.

pub mod error;
pub mod particle;
pub mod pool;
pub mod surface;
pub mod vector;

// Re-export commonly used items
pub use error::CoreError;
pub use particle::{ease_out_cubic, Particle};
pub use pool::ParticlePool;
pub use surface::{DrawSurface, SpawnCurve, SpriteSource};
pub use vector::Vector2;
