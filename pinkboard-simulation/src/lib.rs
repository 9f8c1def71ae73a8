//! Everything around the particle core that makes it a heart animation:
//! the heart curve, the sprite, a software canvas, the emission driver and
//! the per-frame driver a render loop calls.

pub mod animation;
pub mod canvas;
pub mod clock;
pub mod emitter;
pub mod heart;
pub mod sprite;

pub use animation::{FrameStats, HeartAnimation, SimulationError};
pub use canvas::Canvas;
pub use clock::FrameClock;
pub use emitter::{sanitize_dt, Emitter, SpawnEvent};
pub use heart::HeartCurve;
pub use sprite::HeartSprite;
