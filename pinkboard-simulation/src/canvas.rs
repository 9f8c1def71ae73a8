use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use pinkboard_core::{DrawSurface, SpriteSource, Vector2};
use tiny_skia::{BlendMode, Color, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::animation::SimulationError;
use crate::sprite::HeartSprite;

/// Software drawing surface backed by a tiny-skia pixmap.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    global_alpha: f32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, SimulationError> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            global_alpha: 1.0,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Where the heart is anchored: the middle of the surface.
    pub fn center(&self) -> Vector2 {
        Vector2::new(self.width() as f32 / 2.0, self.height() as f32 / 2.0)
    }

    /// Reallocates the buffer; contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), SimulationError> {
        self.pixmap = allocate(width, height)?;
        Ok(())
    }

    /// Alpha of the most recent sprite draw. Not reset between draws.
    pub fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    /// Straight-alpha RGBA at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    /// Copies the surface into a straight-alpha image.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            Rgba(self.pixel(x, y).unwrap_or_default())
        })
    }

    pub fn save_png(&self, path: &Path) -> Result<(), SimulationError> {
        self.to_image().save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap, SimulationError> {
    Pixmap::new(width, height).ok_or(SimulationError::PixelBuffer(width, height))
}

impl DrawSurface for Canvas {
    type Sprite = HeartSprite;

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn draw_sprite(
        &mut self,
        sprite: &HeartSprite,
        center_x: f32,
        center_y: f32,
        size: f32,
        alpha: f32,
    ) {
        self.global_alpha = alpha;
        let opacity = alpha.clamp(0.0, 1.0);
        if opacity <= 0.0 || !(size > 0.0) || !center_x.is_finite() || !center_y.is_finite() {
            return;
        }

        let scale = size / sprite.base_size();
        let transform = Transform::from_scale(scale, scale)
            .post_translate(center_x - size / 2.0, center_y - size / 2.0);
        let paint = PixmapPaint {
            opacity,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Nearest,
        };
        self.pixmap
            .draw_pixmap(0, 0, sprite.pixmap(), &paint, transform, None);
    }
}
