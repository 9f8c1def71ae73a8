//! Collaborator seams: the host supplies the spawn curve, the sprite and the
//! drawing surface. The core never owns or inspects them beyond these traits.

use crate::vector::Vector2;

/// Maps a curve parameter `t` in `[-π, π]` to a point on the target curve.
///
/// Implementations must be pure: the same `t` always yields the same point.
pub trait SpawnCurve {
    fn point_at(&self, t: f32) -> Vector2;
}

impl<F> SpawnCurve for F
where
    F: Fn(f32) -> Vector2,
{
    fn point_at(&self, t: f32) -> Vector2 {
        self(t)
    }
}

/// A pre-rendered, immutable square drawable.
pub trait SpriteSource {
    /// Width and height of the sprite at full size.
    fn base_size(&self) -> f32;
}

/// Something particles can be drawn onto.
pub trait DrawSurface {
    type Sprite: SpriteSource;

    fn clear(&mut self);

    /// Draws `sprite` centred at `(center_x, center_y)`, scaled to
    /// `size × size` and composited at `alpha`.
    ///
    /// The alpha becomes the surface's current alpha and is not restored.
    fn draw_sprite(
        &mut self,
        sprite: &Self::Sprite,
        center_x: f32,
        center_y: f32,
        size: f32,
        alpha: f32,
    );
}
