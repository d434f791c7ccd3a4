//! Canvas Dimensions - `"<width>x<height>"`

use std::fmt;
use std::str::FromStr;

use crate::error::WallpaperError;

/// Bytes per RGBA8 pixel.
const BYTES_PER_PIXEL: u64 = 4;

/// Positive width and height whose RGBA8 buffer length fits in `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    width: u32,
    height: u32,
}

impl Dimension {
    pub fn new(width: u32, height: u32) -> Result<Self, WallpaperError> {
        let buffer_len = (width as u64)
            .checked_mul(height as u64)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .and_then(|n| usize::try_from(n).ok());

        if width == 0 || height == 0 || buffer_len.is_none() {
            return Err(WallpaperError::InvalidDimension(format!("{}x{}", width, height)));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Parse exactly two `x`-separated positive integers.
    pub fn parse(s: &str) -> Result<Self, WallpaperError> {
        let invalid = || WallpaperError::InvalidDimension(s.to_string());

        let mut parts = s.split('x');
        let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };

        let width: u32 = w.parse().map_err(|_| invalid())?;
        let height: u32 = h.parse().map_err(|_| invalid())?;

        Self::new(width, height).map_err(|_| invalid())
    }
}

impl FromStr for Dimension {
    type Err = WallpaperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
