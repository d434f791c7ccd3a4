//! Duotone Recoloring
//!
//! Every pixel becomes a blend between the palette's foreground and
//! background, driven by its perceptual luminance. Dark source pixels land
//! on the foreground, light ones on the background.

use image::{DynamicImage, Rgba, RgbaImage};

use crate::color::Color;

/// Exponent applied to normalized luminance before blending.
pub const GAMMA: f64 = 1.8;

/// Background/foreground pair the image is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
}

impl Palette {
    pub fn new(background: Color, foreground: Color) -> Self {
        Self { background, foreground }
    }
}

/// Rec. 601 luminance of 8-bit channels, normalized to `[0, 1]`.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0
}

/// `a * (1 - t) + b * t`, truncated. Written in offset form so equal
/// endpoints come back unchanged.
fn lerp(a: u8, b: u8, t: f64) -> u8 {
    let a = a as f64;
    (a + (b as f64 - a) * t) as u8
}

/// Map a single 8-bit pixel through the palette.
///
/// Fully transparent pixels resolve to the background no matter what RGB
/// they carry. Any non-zero alpha counts as opaque.
pub fn recolor_pixel(pixel: Rgba<u8>, palette: &Palette) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    if a == 0 {
        return palette.background.to_rgba();
    }

    let t = luminance(r, g, b).powf(GAMMA);
    let (fg, bg) = (palette.foreground, palette.background);

    Rgba([
        lerp(fg.r, bg.r, t),
        lerp(fg.g, bg.g, t),
        lerp(fg.b, bg.b, t),
        255,
    ])
}

/// Produce a fully opaque recolored copy of `source`.
///
/// Channels are read at 16 bits and shifted down to 8, so high bit depth
/// sources are truncated rather than rounded.
pub fn recolor(source: &DynamicImage, palette: &Palette) -> RgbaImage {
    let wide = source.to_rgba16();
    let mut out = RgbaImage::new(wide.width(), wide.height());

    for (x, y, px) in wide.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let mapped = if a == 0 {
            palette.background.to_rgba()
        } else {
            recolor_pixel(Rgba([(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8, 255]), palette)
        };
        out.put_pixel(x, y, mapped);
    }

    out
}
