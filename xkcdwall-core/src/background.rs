//! Solid background canvas.

use image::RgbaImage;

use crate::color::Color;
use crate::dimension::Dimension;
use crate::error::WallpaperError;

/// Opaque canvas of `dimension`, every pixel set to `color`.
pub fn generate(dimension: Dimension, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(dimension.width(), dimension.height(), color.to_rgba())
}

/// Parse a `"<w>x<h>"` dimension and hex color, then generate.
pub fn make_background(dimension: &str, color: &str) -> Result<RgbaImage, WallpaperError> {
    let dimension = Dimension::parse(dimension)?;
    let color = Color::parse(color)?;
    Ok(generate(dimension, color))
}
