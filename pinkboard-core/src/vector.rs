use serde::{Deserialize, Serialize};

/// 2D point/vector used for particle position, velocity and acceleration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Euclidean length, `sqrt(x² + y²)`.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Divides both components by the current length.
    ///
    /// The vector must not be zero-length; doing so yields NaN components.
    pub fn normalize(&mut self) -> &mut Self {
        let length = self.length();
        self.x /= length;
        self.y /= length;
        self
    }

    /// Normalizes, then multiplies both components by `target`.
    ///
    /// Same zero-length precondition as [`Vector2::normalize`].
    pub fn scale_to_length(&mut self, target: f32) -> &mut Self {
        self.normalize();
        self.x *= target;
        self.y *= target;
        self
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
