//! CPU raster: an RGBA8 pixel buffer implementing [`Surface`].
//!
//! Doubles as the "offscreen canvas" engines render into at grid resolution
//! before blitting, which is why it also exposes raw pixel read/write.

use crate::color::Rgba;
use crate::surface::{clamp_extent, ImageSmoothing, Segment, Surface};

/// Row-major RGBA8 pixels, straight alpha, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// Creates a transparent-black raster. Zero extents are clamped to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = clamp_extent(width);
        let height = clamp_extent(height);
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// Creates a raster filled with `color` (written, not blended).
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let mut raster = Self::new(width, height);
        let px = [color.r, color.g, color.b, alpha_byte(color.a)];
        raster
            .pixels
            .chunks_exact_mut(4)
            .for_each(|p| p.copy_from_slice(&px));
        raster
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Raw pixel access, like writing an `ImageData` buffer directly.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// RGBA at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the raster.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let i = (y * self.width + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Source-over blend of one colour onto pixel `(x, y)`; out-of-range is ignored.
    fn blend(&mut self, x: i64, y: i64, src: [f64; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        let sa = src[3];
        if sa <= 0.0 {
            return;
        }
        let da = self.pixels[i + 3] as f64 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        for c in 0..3 {
            let d = self.pixels[i + c] as f64;
            let blended = (src[c] * sa + d * da * (1.0 - sa)) / out_a;
            self.pixels[i + c] = blended.round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    fn sample_nearest(&self, u: f64, v: f64) -> [f64; 4] {
        let x = (u.floor() as i64).clamp(0, self.width as i64 - 1) as usize;
        let y = (v.floor() as i64).clamp(0, self.height as i64 - 1) as usize;
        self.texel(x, y)
    }

    fn sample_bilinear(&self, u: f64, v: f64) -> [f64; 4] {
        let u = u - 0.5;
        let v = v - 0.5;
        let x0 = u.floor();
        let y0 = v.floor();
        let fx = u - x0;
        let fy = v - y0;
        let clamp_x = |x: f64| (x as i64).clamp(0, self.width as i64 - 1) as usize;
        let clamp_y = |y: f64| (y as i64).clamp(0, self.height as i64 - 1) as usize;
        let (xa, xb) = (clamp_x(x0), clamp_x(x0 + 1.0));
        let (ya, yb) = (clamp_y(y0), clamp_y(y0 + 1.0));
        let (p00, p10, p01, p11) = (
            self.texel(xa, ya),
            self.texel(xb, ya),
            self.texel(xa, yb),
            self.texel(xb, yb),
        );
        let mut out = [0.0; 4];
        for c in 0..4 {
            let top = p00[c] + (p10[c] - p00[c]) * fx;
            let bottom = p01[c] + (p11[c] - p01[c]) * fx;
            out[c] = top + (bottom - top) * fy;
        }
        out
    }

    /// Pixel as `[r, g, b, alpha]` with channels in 0..=255 and alpha in [0, 1].
    fn texel(&self, x: usize, y: usize) -> [f64; 4] {
        let [r, g, b, a] = self.pixel(x, y);
        [r as f64, g as f64, b as f64, a as f64 / 255.0]
    }

    /// Clips a span `[start, start + len)` to `[0, limit)` in whole pixels.
    fn clip_span(start: f64, len: f64, limit: usize) -> (i64, i64) {
        let (lo, hi) = if len < 0.0 {
            (start + len, start)
        } else {
            (start, start + len)
        };
        let lo = (lo.round() as i64).clamp(0, limit as i64);
        let hi = (hi.round() as i64).clamp(0, limit as i64);
        (lo, hi)
    }
}

impl Surface for Raster {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba) {
        let finite = x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite();
        if color.is_transparent() || !finite {
            return;
        }
        let (x0, x1) = Self::clip_span(x, w, self.width);
        let (y0, y1) = Self::clip_span(y, h, self.height);
        let src = [color.r as f64, color.g as f64, color.b as f64, color.a];
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, src);
            }
        }
    }

    /// Rasterizes each segment with a DDA walk and a square brush of side
    /// `line_width` (at least one pixel).
    fn stroke_segments(&mut self, segments: &[Segment], color: Rgba, line_width: f64) {
        if color.is_transparent() {
            return;
        }
        let src = [color.r as f64, color.g as f64, color.b as f64, color.a];
        let brush = line_width.round().max(1.0) as i64;
        let offset = (brush - 1) / 2;

        for seg in segments {
            let dx = seg.x1 - seg.x0;
            let dy = seg.y1 - seg.y0;
            if !(dx.is_finite() && dy.is_finite()) {
                continue;
            }
            let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
            let mut last = None;
            for i in 0..=steps {
                let t = i as f64 / steps as f64;
                let px = (seg.x0 + dx * t).floor() as i64;
                let py = (seg.y0 + dy * t).floor() as i64;
                if last == Some((px, py)) {
                    continue;
                }
                last = Some((px, py));
                for by in 0..brush {
                    for bx in 0..brush {
                        self.blend(px + bx - offset, py + by - offset, src);
                    }
                }
            }
        }
    }

    fn draw_image(
        &mut self,
        image: &Raster,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
        smoothing: ImageSmoothing,
    ) {
        if dw <= 0.0 || dh <= 0.0 || !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        let (x0, x1) = Self::clip_span(dx, dw, self.width);
        let (y0, y1) = Self::clip_span(dy, dh, self.height);
        let sx = image.width as f64 / dw;
        let sy = image.height as f64 / dh;

        for py in y0..y1 {
            let v = (py as f64 + 0.5 - dy) * sy;
            for px in x0..x1 {
                let u = (px as f64 + 0.5 - dx) * sx;
                let src = match smoothing {
                    ImageSmoothing::Disabled => image.sample_nearest(u, v),
                    ImageSmoothing::Enabled => image.sample_bilinear(u, v),
                };
                self.blend(px, py, src);
            }
        }
    }
}

fn alpha_byte(a: f64) -> u8 {
    (a.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_zero_dimensions() {
        let r = Raster::new(0, 0);
        assert_eq!((r.width(), r.height()), (1, 1));
        assert_eq!(r.pixels().len(), 4);
    }

    #[test]
    fn filled_writes_exact_colour() {
        let r = Raster::filled(2, 2, Rgba::rgb(0, 0, 8));
        assert_eq!(r.pixel(1, 1), [0, 0, 8, 255]);
    }

    #[test]
    fn opaque_fill_replaces_pixels() {
        let mut r = Raster::filled(4, 4, Rgba::rgb(255, 255, 255));
        r.fill_rect(1.0, 1.0, 2.0, 2.0, Rgba::rgb(10, 20, 30));
        assert_eq!(r.pixel(1, 1), [10, 20, 30, 255]);
        assert_eq!(r.pixel(2, 2), [10, 20, 30, 255]);
        assert_eq!(r.pixel(0, 0), [255, 255, 255, 255]);
        assert_eq!(r.pixel(3, 3), [255, 255, 255, 255]);
    }

    #[test]
    fn translucent_fill_blends_towards_colour() {
        let mut r = Raster::filled(1, 1, Rgba::rgb(200, 200, 200));
        r.fill_rect(0.0, 0.0, 1.0, 1.0, Rgba::rgba(0, 0, 0, 0.5));
        assert_eq!(r.pixel(0, 0), [100, 100, 100, 255]);
    }

    #[test]
    fn repeated_low_alpha_overlay_fades_to_background() {
        let mut r = Raster::filled(1, 1, Rgba::rgb(255, 255, 255));
        for _ in 0..200 {
            r.fill_rect(0.0, 0.0, 1.0, 1.0, Rgba::rgba(0, 0, 8, 0.3));
        }
        let [red, _, blue, _] = r.pixel(0, 0);
        assert!(red < 5, "red should have faded, got {red}");
        assert!(blue <= 10, "blue should approach 8, got {blue}");
    }

    #[test]
    fn fill_outside_surface_is_clipped() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(-10.0, -10.0, 5.0, 5.0, Rgba::rgb(255, 0, 0));
        r.fill_rect(100.0, 100.0, 5.0, 5.0, Rgba::rgb(255, 0, 0));
        assert!(r.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_partially_outside_touches_only_overlap() {
        let mut r = Raster::new(4, 4);
        r.fill_rect(-2.0, -2.0, 3.0, 3.0, Rgba::rgb(255, 0, 0));
        assert_eq!(r.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(r.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn stroke_draws_horizontal_line() {
        let mut r = Raster::new(8, 3);
        r.stroke_segments(
            &[Segment::new(0.5, 1.5, 6.5, 1.5)],
            Rgba::rgb(0, 255, 0),
            1.0,
        );
        for x in 0..=6 {
            assert_eq!(r.pixel(x, 1), [0, 255, 0, 255], "missing pixel at x={x}");
        }
        assert_eq!(r.pixel(7, 1), [0, 0, 0, 0]);
        assert_eq!(r.pixel(3, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn stroke_does_not_double_blend_within_a_segment() {
        let mut r = Raster::new(4, 4);
        r.stroke_segments(
            &[Segment::new(1.2, 1.2, 1.4, 1.4)],
            Rgba::rgba(255, 255, 255, 0.5),
            1.0,
        );
        assert_eq!(r.pixel(1, 1)[3], 128);
    }

    #[test]
    fn stroke_off_surface_is_clipped() {
        let mut r = Raster::new(4, 4);
        r.stroke_segments(
            &[Segment::new(-50.0, -50.0, -40.0, -45.0)],
            Rgba::rgb(255, 255, 255),
            1.0,
        );
        assert!(r.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn nearest_upscale_produces_blocks() {
        let mut src = Raster::new(2, 1);
        src.pixels_mut().copy_from_slice(&[255, 0, 0, 255, 0, 0, 255, 255]);
        let mut dst = Raster::new(4, 2);
        dst.draw_image(&src, 0.0, 0.0, 4.0, 2.0, ImageSmoothing::Disabled);
        for y in 0..2 {
            assert_eq!(dst.pixel(0, y), [255, 0, 0, 255]);
            assert_eq!(dst.pixel(1, y), [255, 0, 0, 255]);
            assert_eq!(dst.pixel(2, y), [0, 0, 255, 255]);
            assert_eq!(dst.pixel(3, y), [0, 0, 255, 255]);
        }
    }

    #[test]
    fn smoothed_upscale_interpolates_between_texels() {
        let mut src = Raster::new(2, 1);
        src.pixels_mut().copy_from_slice(&[0, 0, 0, 255, 255, 255, 255, 255]);
        let mut dst = Raster::new(4, 1);
        dst.draw_image(&src, 0.0, 0.0, 4.0, 1.0, ImageSmoothing::Enabled);
        let inner_left = dst.pixel(1, 0)[0];
        let inner_right = dst.pixel(2, 0)[0];
        assert!(inner_left > 0 && inner_left < 255, "got {inner_left}");
        assert!(inner_right > inner_left);
    }

    #[test]
    fn draw_image_with_empty_destination_is_noop() {
        let src = Raster::filled(2, 2, Rgba::rgb(255, 255, 255));
        let mut dst = Raster::new(2, 2);
        dst.draw_image(&src, 0.0, 0.0, 0.0, 2.0, ImageSmoothing::Disabled);
        assert!(dst.pixels().iter().all(|&b| b == 0));
    }
}
