use log::{debug, trace};
use pinkboard_config::Config;
use pinkboard_core::{CoreError, DrawSurface, ParticlePool, SpawnCurve, SpriteSource, Vector2};
use thiserror::Error;

use crate::emitter::{sanitize_dt, Emitter};
use crate::heart::HeartCurve;
use crate::sprite::HeartSprite;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Failed to build particle pool: {0}")]
    Pool(#[from] CoreError),

    #[error("Invalid sprite color: {0}")]
    InvalidColor(String),

    #[error("Cannot allocate a {0}x{1} pixel buffer")]
    PixelBuffer(u32, u32),

    #[error("Heart outline has no area")]
    EmptyOutline,

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// What one frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub spawned: usize,
    pub live: usize,
}

/// One animated view: a pool, its emitter, the spawn curve and the sprite.
pub struct HeartAnimation<C: SpawnCurve = HeartCurve> {
    pool: ParticlePool,
    emitter: Emitter,
    curve: C,
    sprite: HeartSprite,
    frames: u64,
}

impl HeartAnimation<HeartCurve> {
    pub fn from_config(config: &Config) -> Result<Self, SimulationError> {
        let particles = &config.particles;
        let color = config
            .heart
            .rgb()
            .ok_or_else(|| SimulationError::InvalidColor(config.heart.color.clone()))?;

        let pool = ParticlePool::new(particles.length, particles.duration)?;
        let emitter = Emitter::for_pool(
            &pool,
            particles.velocity,
            particles.effect,
            config.emission.mode,
            config.emission.seed,
        );
        let sprite = HeartSprite::rasterize(particles.size, color)?;

        Ok(Self::new(pool, emitter, HeartCurve::new(config.heart.scale), sprite))
    }
}

impl<C: SpawnCurve> HeartAnimation<C> {
    pub fn new(pool: ParticlePool, emitter: Emitter, curve: C, sprite: HeartSprite) -> Self {
        debug!(
            "Heart animation ready: {} slots, sprite {}px",
            pool.capacity(),
            sprite.base_size()
        );
        Self {
            pool,
            emitter,
            curve,
            sprite,
            frames: 0,
        }
    }

    /// Runs one frame: clear, emit around `center`, integrate, draw.
    ///
    /// A negative or non-finite `dt` is treated as zero.
    pub fn frame<S>(&mut self, surface: &mut S, center: Vector2, dt: f32) -> FrameStats
    where
        S: DrawSurface<Sprite = HeartSprite>,
    {
        let dt = sanitize_dt(dt);

        surface.clear();
        let spawned = self.emitter.emit(&mut self.pool, &self.curve, center, dt);
        self.pool.update(dt);
        self.pool.draw(surface, &self.sprite);

        self.frames += 1;
        let stats = FrameStats {
            spawned,
            live: self.pool.len(),
        };
        trace!("Frame {}: {:?}", self.frames, stats);
        stats
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn sprite(&self) -> &HeartSprite {
        &self.sprite
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use pinkboard_config::EmissionMode;

    fn seeded_config() -> Config {
        let mut config = Config::default();
        config.particles.length = 200;
        config.particles.duration = 1.0;
        config.emission.seed = Some(42);
        config
    }

    #[test]
    fn from_config_wires_rate_and_sprite() {
        let animation = HeartAnimation::from_config(&seeded_config()).unwrap();
        assert_eq!(animation.pool().capacity(), 200);
        assert_eq!(animation.emitter().rate(), 200.0);
        assert_eq!(animation.emitter().mode(), EmissionMode::Truncate);
        assert_eq!(animation.sprite().size(), 13);
    }

    #[test]
    fn from_config_rejects_bad_color_and_pool() {
        let mut config = seeded_config();
        config.heart.color = "nope".to_string();
        assert!(matches!(
            HeartAnimation::from_config(&config),
            Err(SimulationError::InvalidColor(_))
        ));

        let mut config = seeded_config();
        config.particles.length = 1;
        assert!(matches!(
            HeartAnimation::from_config(&config),
            Err(SimulationError::Pool(CoreError::CapacityTooSmall(1)))
        ));
    }

    #[test]
    fn frames_spawn_age_and_draw() {
        let mut animation = HeartAnimation::from_config(&seeded_config()).unwrap();
        let mut canvas = Canvas::new(400, 400).unwrap();
        let center = canvas.center();

        // First frame from a fresh clock has no elapsed time.
        let stats = animation.frame(&mut canvas, center, 0.0);
        assert_eq!(stats, FrameStats { spawned: 0, live: 0 });

        let stats = animation.frame(&mut canvas, center, 0.25);
        assert_eq!(stats.spawned, 50);
        assert_eq!(stats.live, 50);
        assert!(animation.pool().iter().all(|p| p.age == 0.25));
        assert!(canvas.global_alpha() < 1.0);

        let lit = (0..400)
            .flat_map(|y| (0..400).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y).map_or(false, |p| p[3] > 0))
            .count();
        assert!(lit > 0);
        assert_eq!(animation.frames(), 2);
    }

    #[test]
    fn steady_state_stays_below_capacity() {
        let mut animation = HeartAnimation::from_config(&seeded_config()).unwrap();
        let mut canvas = Canvas::new(100, 100).unwrap();
        for _ in 0..240 {
            let center = canvas.center();
            let stats = animation.frame(&mut canvas, center, 1.0 / 60.0);
            assert!(stats.live < 200);
        }
        assert!(animation.pool().len() > 100);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let mut animation = HeartAnimation::from_config(&seeded_config()).unwrap();
        let mut canvas = Canvas::new(50, 50).unwrap();
        animation.frame(&mut canvas, Vector2::new(25.0, 25.0), 0.1);
        let stats = animation.frame(&mut canvas, Vector2::new(25.0, 25.0), -5.0);
        assert_eq!(stats.spawned, 0);
        assert!(animation.pool().iter().all(|p| p.age >= 0.1 - 1e-6));
    }

    #[test]
    fn survives_surface_resize_between_frames() {
        let mut animation = HeartAnimation::from_config(&seeded_config()).unwrap();
        let mut canvas = Canvas::new(300, 300).unwrap();
        let center = canvas.center();
        animation.frame(&mut canvas, center, 0.1);
        let live = animation.pool().len();

        canvas.resize(120, 80).unwrap();
        let center = canvas.center();
        let stats = animation.frame(&mut canvas, center, 0.0);
        assert_eq!(stats.live, live);
    }
}
