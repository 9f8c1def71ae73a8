//! Rasterizes the heart outline into a small RGBA sprite, once, at startup.

use std::f32::consts::PI;

use log::debug;
use pinkboard_core::{SpawnCurve, SpriteSource};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, PixmapRef, Transform};

use crate::animation::SimulationError;
use crate::heart::HeartCurve;

/// Curve units spanned by the full sprite width.
const OUTLINE_EXTENT: f32 = 350.0;
/// Parameter step when tracing the outline.
const OUTLINE_STEP: f32 = 0.01;

/// Square image of a filled heart.
#[derive(Debug, Clone)]
pub struct HeartSprite {
    pixmap: Pixmap,
}

impl HeartSprite {
    pub fn rasterize(size: u32, color: [u8; 3]) -> Result<Self, SimulationError> {
        let mut pixmap = Pixmap::new(size, size).ok_or(SimulationError::PixelBuffer(size, size))?;
        let path = outline().ok_or(SimulationError::EmptyOutline)?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], 255);

        // Curve y points up, pixel y points down.
        let half = size as f32 / 2.0;
        let scale = size as f32 / OUTLINE_EXTENT;
        let transform = Transform::from_scale(scale, -scale).post_translate(half, half);
        pixmap.fill_path(&path, &paint, FillRule::EvenOdd, transform, None);

        let sprite = Self { pixmap };
        debug!(
            "Rasterized {}x{} heart sprite, coverage {:.2}",
            size,
            size,
            sprite.coverage()
        );
        Ok(sprite)
    }

    pub fn size(&self) -> u32 {
        self.pixmap.width()
    }

    /// Straight-alpha RGBA at `(x, y)`, `None` outside the sprite.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Fraction of pixels with non-zero alpha.
    pub fn coverage(&self) -> f32 {
        let pixels = self.pixmap.pixels();
        let filled = pixels.iter().filter(|p| p.alpha() > 0).count();
        filled as f32 / pixels.len() as f32
    }

    pub fn pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

impl SpriteSource for HeartSprite {
    fn base_size(&self) -> f32 {
        self.size() as f32
    }
}

/// Closed heart path in curve units, traced from `-π` to `π`.
fn outline() -> Option<Path> {
    let heart = HeartCurve::default();
    let start = heart.point_at(-PI);

    let mut builder = PathBuilder::new();
    builder.move_to(start.x, start.y);
    let mut t = -PI;
    while t < PI {
        t += OUTLINE_STEP;
        let point = heart.point_at(t);
        builder.line_to(point.x, point.y);
    }
    builder.close();
    builder.finish()
}
