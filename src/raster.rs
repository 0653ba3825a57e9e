//! Software raster backend for the annotation overlay.
//!
//! Draws into a `tiny_skia::Pixmap` the size of the render surface. Used by
//! the replay tool to dump overlays as PNG, and handy for checking what a
//! host renderer should produce.

use std::path::Path;

use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform};
use zoomify_core::constants::render::{DASH_PATTERN, FIRST_MARKER_COLOR, LINE_WIDTH, MARKER_SIZE};
use zoomify_core::{Point, Renderer, Scene, Size};

/// Errors from the raster backend.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// Pixmap could not be allocated with these dimensions
    #[error("Invalid surface size: {width} x {height}")]
    InvalidSize { width: u32, height: u32 },

    /// PNG encoding or file write failed
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Renderer drawing into an in-memory RGBA pixmap.
#[derive(Debug, Clone)]
pub struct SkiaRenderer {
    pixmap: Pixmap,
    background: Color,
    frames: usize,
}

impl SkiaRenderer {
    /// Create a transparent surface of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            background: Color::TRANSPARENT,
            frames: 0,
        })
    }

    /// Fill color used to clear the surface before each frame.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self.pixmap.fill(background);
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Copy the surface into a straight-alpha RGBA image.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let data = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        image::RgbaImage::from_raw(self.pixmap.width(), self.pixmap.height(), data)
            .unwrap_or_else(|| image::RgbaImage::new(self.pixmap.width(), self.pixmap.height()))
    }

    /// Write the current surface as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        self.to_rgba_image()
            .save_with_format(path, image::ImageFormat::Png)?;
        log::info!("Saved overlay to {:?}", path);
        Ok(())
    }

    fn stroke(&mut self, points: &[Point], color: Color, close: bool, dashed: bool) {
        let Some(path) = build_path(points, close) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: LINE_WIDTH,
            dash: if dashed {
                StrokeDash::new(DASH_PATTERN.to_vec(), 0.0)
            } else {
                None
            },
            ..Stroke::default()
        };

        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn fill_marker(&mut self, center: Point, color: Color) {
        let half = f64::from(MARKER_SIZE) / 2.0;
        let Some(rect) = Rect::from_xywh(
            (center.x - half) as f32,
            (center.y - half) as f32,
            MARKER_SIZE,
            MARKER_SIZE,
        ) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color);
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

impl Renderer for SkiaRenderer {
    fn surface_size(&self) -> Size {
        Size::new(f64::from(self.pixmap.width()), f64::from(self.pixmap.height()))
    }

    fn render(&mut self, scene: &Scene<'_>) {
        self.pixmap.fill(self.background);

        let current = color_or_default(scene.color);

        self.stroke(&scene.in_progress_path(), current, false, true);

        let first = color_or_default(FIRST_MARKER_COLOR);
        for (i, marker) in scene.markers.iter().enumerate() {
            let center = scene.to_surface(*marker);
            self.fill_marker(center, if i == 0 { first } else { current });
        }

        for polygon in scene.polygons {
            let points = scene.polygon_path(polygon);
            self.stroke(&points, color_or_default(&polygon.color), true, false);
        }

        self.frames += 1;
        log::trace!("Rendered frame {}", self.frames);
    }

    // The last frame stays in the pixmap so it can still be saved.
    fn release(&mut self) {
        log::debug!("Raster surface released after {} frames", self.frames);
    }
}

fn build_path(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

fn color_or_default(hex: &str) -> Color {
    parse_hex_color(hex).unwrap_or_else(|| {
        log::warn!("Invalid color '{}', using black", hex);
        Color::BLACK
    })
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize, len: usize| u8::from_str_radix(digits.get(i..i + len)?, 16).ok();

    let (r, g, b, a) = match digits.len() {
        3 => {
            let short = |i| channel(i, 1).map(|v| v * 17);
            (short(0)?, short(1)?, short(2)?, 255)
        }
        6 => (channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, 255),
        8 => (channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, channel(6, 2)?),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, a))
}
