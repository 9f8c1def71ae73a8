use pinkboard_core::{SpawnCurve, Vector2};

/// The parametric heart, `t` in `[-π, π]`, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartCurve {
    pub scale: f32,
}

impl HeartCurve {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }
}

impl Default for HeartCurve {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl SpawnCurve for HeartCurve {
    fn point_at(&self, t: f32) -> Vector2 {
        let x = 160.0 * t.sin().powi(3);
        let y = 130.0 * t.cos()
            - 50.0 * (2.0 * t).cos()
            - 20.0 * (3.0 * t).cos()
            - 10.0 * (4.0 * t).cos()
            + 25.0;
        Vector2::new(x * self.scale, y * self.scale)
    }
}
