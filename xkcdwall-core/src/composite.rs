//! Centered Source-Over Compositing
//!
//! The foreground is placed at the truncated center of the background and
//! blended through its own alpha. A foreground larger than the background
//! in either direction is rejected, never clipped.

use image::{imageops, RgbaImage};

use crate::error::WallpaperError;

/// Offset that centers `fg` within `bg`, using truncating division.
///
/// Rejects on size, not on the sign of the offset: a foreground one pixel
/// larger truncates to offset 0 and would otherwise be silently clipped.
pub fn center_offset(fg: (u32, u32), bg: (u32, u32)) -> Result<(u32, u32), WallpaperError> {
    if fg.0 > bg.0 || fg.1 > bg.1 {
        return Err(WallpaperError::ForegroundTooLarge {
            fg_width: fg.0,
            fg_height: fg.1,
            bg_width: bg.0,
            bg_height: bg.1,
        });
    }
    Ok(((bg.0 - fg.0) / 2, (bg.1 - fg.1) / 2))
}

/// Composite `fg` centered over a copy of `bg`. The result has `bg`'s size.
pub fn composite_center(fg: &RgbaImage, bg: &RgbaImage) -> Result<RgbaImage, WallpaperError> {
    let (ox, oy) = center_offset(fg.dimensions(), bg.dimensions())?;

    let mut out = bg.clone();
    imageops::overlay(&mut out, fg, ox as i64, oy as i64);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_center_offset_truncates() {
        assert_eq!(center_offset((100, 100), (200, 200)).unwrap(), (50, 50));
        assert_eq!(center_offset((3, 4), (10, 9)).unwrap(), (3, 2));
        assert_eq!(center_offset((10, 10), (10, 10)).unwrap(), (0, 0));
    }

    #[test]
    fn test_oversized_foreground_rejected() {
        assert!(matches!(
            center_offset((250, 100), (200, 200)),
            Err(WallpaperError::ForegroundTooLarge { fg_width: 250, .. })
        ));
        assert!(center_offset((100, 201), (200, 200)).is_err());
    }

    #[test]
    fn test_one_pixel_overhang_rejected() {
        let bg = RgbaImage::from_pixel(200, 200, Rgba([0, 0, 0, 255]));
        let fg = RgbaImage::from_pixel(201, 100, Rgba([255, 255, 255, 255]));
        assert!(matches!(
            composite_center(&fg, &bg),
            Err(WallpaperError::ForegroundTooLarge { fg_width: 201, bg_width: 200, .. })
        ));
    }

    #[test]
    fn test_composite_places_foreground() {
        let bg = RgbaImage::from_pixel(6, 5, Rgba([0, 0, 0, 255]));
        let fg = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let out = composite_center(&fg, &bg).unwrap();

        assert_eq!(out.dimensions(), (6, 5));
        for (x, y, px) in out.enumerate_pixels() {
            let inside = (2..4).contains(&x) && (1..3).contains(&y);
            let expected = if inside { 255 } else { 0 };
            assert_eq!(*px, Rgba([expected, expected, expected, 255]), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_transparent_foreground_keeps_background() {
        let bg = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let fg = RgbaImage::from_pixel(2, 2, Rgba([200, 200, 200, 0]));
        let out = composite_center(&fg, &bg).unwrap();
        assert!(out.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn test_partial_alpha_blends_proportionally() {
        let bg = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255]));
        let fg = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let [r, g, b, a] = composite_center(&fg, &bg).unwrap().get_pixel(0, 0).0;

        assert!((127..=128).contains(&r), "red {r}");
        assert_eq!(g, 0);
        assert!((126..=127).contains(&b), "blue {b}");
        assert!(a >= 254, "alpha {a}");
    }
}
