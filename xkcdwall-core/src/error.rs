//! Error type shared by every stage of the wallpaper pipeline.
//!
//! Every error is terminal for the invocation that raised it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WallpaperError {
    #[error("Invalid color: {0}")]
    InvalidColorFormat(String),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Could not decode image: {0}")]
    DecodeFailure(#[source] image::ImageError),

    #[error("Foreground {fg_width}x{fg_height} larger than background {bg_width}x{bg_height}")]
    ForegroundTooLarge {
        fg_width: u32,
        fg_height: u32,
        bg_width: u32,
        bg_height: u32,
    },

    #[error("Could not encode image: {0}")]
    EncodeFailure(#[source] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not read configuration json: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid comic type: {0}")]
    InvalidComicSelector(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No image found for comic {0}")]
    MissingImage(u32),
}

pub type Result<T> = std::result::Result<T, WallpaperError>;
