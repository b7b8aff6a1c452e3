//! The drawing-surface boundary between engines and their host.
//!
//! An engine only ever sees a [`Surface`]: a fixed-size 2D raster with
//! rectangle fill, batched line strokes, and a scaled image blit. The host
//! owns the concrete surface; [`Raster`](crate::raster::Raster) is the CPU
//! implementation used by the CLI and tests.

use crate::color::Rgba;
use crate::raster::Raster;

/// A straight line from `(x0, y0)` to `(x1, y1)` in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Segment {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

/// Sampling used when an image is drawn at a different size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSmoothing {
    /// Bilinear filtering.
    #[default]
    Enabled,
    /// Nearest-neighbour: each source pixel becomes a hard-edged block.
    Disabled,
}

/// A 2D drawing context over a fixed-size raster.
///
/// All colours are composited source-over. Geometry outside the surface is
/// clipped, never an error.
pub trait Surface {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Fills the rectangle `[x, x + w) × [y, y + h)`.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba);

    /// Strokes every segment with one colour, like a single path built from
    /// `moveTo`/`lineTo` pairs followed by one `stroke()`.
    fn stroke_segments(&mut self, segments: &[Segment], color: Rgba, line_width: f64);

    /// Draws `image` scaled into the destination rectangle.
    fn draw_image(
        &mut self,
        image: &Raster,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
        smoothing: ImageSmoothing,
    );

    /// Fills the whole surface.
    fn fill(&mut self, color: Rgba) {
        let (w, h) = (self.width() as f64, self.height() as f64);
        self.fill_rect(0.0, 0.0, w, h, color);
    }
}

/// Clamps a requested surface extent to at least one pixel.
///
/// Keeps the engine contract total: a zero-sized surface degrades to a 1×1
/// one instead of producing empty grids or divisions by zero.
pub fn clamp_extent(extent: usize) -> usize {
    extent.max(1)
}
