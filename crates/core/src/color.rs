//! Canvas-style colours.
//!
//! [`Rgba`] mirrors the CSS colour model the engines paint with: 8-bit RGB
//! channels plus a floating-point alpha in [0, 1]. Constructors cover the
//! three notations used by the engines: `rgb()`, `rgba()` and `hsla()`.

/// An sRGB colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    /// Opaque colour, like CSS `rgb(r, g, b)`.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Colour with alpha, like CSS `rgba(r, g, b, a)`. Alpha is clamped to [0, 1].
    pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Converts CSS `hsla(h, s%, l%, a)`.
    ///
    /// `hue` is in degrees (any value, wrapped into [0, 360)); `saturation`
    /// and `lightness` are fractions in [0, 1].
    pub fn hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = channel(l);
            return Self::rgba(v, v, v, alpha);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgba(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
            alpha,
        )
    }

    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
