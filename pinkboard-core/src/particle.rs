use crate::surface::{DrawSurface, SpriteSource};
use crate::vector::Vector2;

/// Cubic ease-out: starts fast and decelerates, `ease(0) = 0`, `ease(1) = 1`.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t - 1.0;
    t * t * t + 1.0
}

/// A single simulated body. Slots are allocated once by the pool and reused
/// through [`Particle::initialize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Particle {
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    pub age: f32,
}

impl Particle {
    /// Resets the slot: acceleration is the initial velocity scaled by `effect`.
    pub fn initialize(&mut self, x: f32, y: f32, dx: f32, dy: f32, effect: f32) {
        self.position = Vector2::new(x, y);
        self.velocity = Vector2::new(dx, dy);
        self.acceleration = Vector2::new(dx * effect, dy * effect);
        self.age = 0.0;
    }

    /// Explicit Euler step. Position uses the velocity from before this step.
    pub fn update(&mut self, dt: f32) {
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
        self.velocity.x += self.acceleration.x * dt;
        self.velocity.y += self.acceleration.y * dt;
        self.age += dt;
    }

    /// Size and alpha this particle is drawn with.
    ///
    /// Ages at or past `max_age` are accepted; alpha then drops to zero or below.
    pub fn appearance(&self, max_age: f32, base_size: f32) -> (f32, f32) {
        let life = self.age / max_age;
        (base_size * ease_out_cubic(life), 1.0 - life)
    }

    pub fn draw<S: DrawSurface>(&self, surface: &mut S, sprite: &S::Sprite, max_age: f32) {
        let (size, alpha) = self.appearance(max_age, sprite.base_size());
        surface.draw_sprite(sprite, self.position.x, self.position.y, size, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Square(f32);

    impl SpriteSource for Square {
        fn base_size(&self) -> f32 {
            self.0
        }
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(f32, f32, f32, f32)>,
    }

    impl DrawSurface for Recorder {
        type Sprite = Square;

        fn clear(&mut self) {
            self.calls.clear();
        }

        fn draw_sprite(&mut self, _sprite: &Square, x: f32, y: f32, size: f32, alpha: f32) {
            self.calls.push((x, y, size, alpha));
        }
    }

    #[test]
    fn ease_endpoints_and_monotonic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let mut previous = ease_out_cubic(0.0);
        for i in 1..=100 {
            let value = ease_out_cubic(i as f32 / 100.0);
            assert!(value > previous);
            previous = value;
        }
    }

    #[test]
    fn initialize_derives_acceleration_from_effect() {
        let mut p = Particle::default();
        p.age = 3.0;
        p.initialize(1.0, 2.0, 10.0, -4.0, -1.3);
        assert_eq!(p.position, Vector2::new(1.0, 2.0));
        assert_eq!(p.velocity, Vector2::new(10.0, -4.0));
        assert!((p.acceleration.x + 13.0).abs() < 1e-5);
        assert!((p.acceleration.y - 5.2).abs() < 1e-5);
        assert_eq!(p.age, 0.0);
    }

    #[test]
    fn update_moves_by_velocity() {
        let mut p = Particle::default();
        p.initialize(0.0, 0.0, 1.0, 0.0, 0.0);
        p.update(2.0);
        assert_eq!(p.position, Vector2::new(2.0, 0.0));
        assert_eq!(p.age, 2.0);
    }

    #[test]
    fn update_applies_position_before_velocity() {
        let mut p = Particle::default();
        p.initialize(0.0, 0.0, 1.0, 0.0, 1.0);
        p.update(1.0);
        // Position used the old velocity; velocity then gained acceleration.
        assert_eq!(p.position.x, 1.0);
        assert_eq!(p.velocity.x, 2.0);
        p.update(1.0);
        assert_eq!(p.position.x, 3.0);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut p = Particle::default();
        p.initialize(5.0, 6.0, 7.0, 8.0, -1.3);
        let before = p.clone();
        p.update(0.0);
        assert_eq!(p, before);
    }

    #[test]
    fn draw_uses_eased_size_and_fading_alpha() {
        let mut p = Particle::default();
        p.initialize(4.0, 5.0, 0.0, 0.0, 0.0);
        p.update(1.0);

        let mut surface = Recorder::default();
        p.draw(&mut surface, &Square(13.0), 2.0);

        let (x, y, size, alpha) = surface.calls[0];
        assert_eq!((x, y), (4.0, 5.0));
        assert!((size - 13.0 * 0.875).abs() < 1e-4);
        assert!((alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn appearance_at_max_age_is_full_size_and_transparent() {
        let mut p = Particle::default();
        p.age = 2.0;
        let (size, alpha) = p.appearance(2.0, 13.0);
        assert_eq!(size, 13.0);
        assert_eq!(alpha, 0.0);
    }
}
