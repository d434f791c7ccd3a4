//! xkcd-wall Core - Duotone Wallpaper Builder
//!
//! # Stages
//! 1. Fetch a comic into the cache directory
//! 2. Recolor it onto a two-color palette by luminance
//! 3. Fill a background canvas with the palette's background
//! 4. Center the recolored comic over the canvas
//! 5. Copy the result to the configured target

pub mod color;
pub mod dimension;
pub mod duotone;
pub mod background;
pub mod composite;
pub mod config;
pub mod fetch;
pub mod pipeline;
pub mod error;

pub use color::Color;
pub use dimension::Dimension;
pub use duotone::{recolor, Palette};
pub use background::make_background;
pub use composite::composite_center;
pub use config::{Config, Settings};
pub use fetch::{ComicSelector, XkcdClient};
pub use pipeline::{copy_to_target, WallpaperPipeline};
pub use error::WallpaperError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
