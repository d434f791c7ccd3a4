//! Configuration - JSON file with first-run bootstrap

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use platform_dirs::AppDirs;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::color::Color;
use crate::dimension::Dimension;
use crate::duotone::Palette;
use crate::error::WallpaperError;

pub const APP_NAME: &str = "xkcd-wall";

/// Written to the config path the first time it is missing.
pub const DEFAULT_CONFIG: &str = include_str!("../assets/default.json");

/// Raw file contents, before any value is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub background_colors: Vec<String>,
    pub foreground_colors: Vec<String>,
    pub dimensions: String,
    pub target: String,
    pub cache: String,
}

/// Validated configuration ready to drive the pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub background_colors: Vec<Color>,
    pub foreground_colors: Vec<Color>,
    pub dimension: Dimension,
    pub target: PathBuf,
    pub cache: PathBuf,
}

/// `<platform config dir>/xkcd-wall/config.json`
pub fn default_config_path() -> Result<PathBuf, WallpaperError> {
    let dirs = AppDirs::new(Some(APP_NAME), false)
        .ok_or_else(|| WallpaperError::Config("could not determine config directory".into()))?;
    Ok(dirs.config_dir.join("config.json"))
}

/// Write the default config if `path` does not exist yet.
///
/// Returns `true` when a file was created.
pub fn bootstrap(path: &Path) -> Result<bool, WallpaperError> {
    match fs::metadata(path) {
        Ok(_) => Ok(false),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(path, DEFAULT_CONFIG)?;
            info!(path = %path.display(), "wrote default config");
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, WallpaperError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Bootstrap `path` if missing, then read and parse it.
    pub fn load_or_bootstrap(path: &Path) -> Result<Self, WallpaperError> {
        bootstrap(path)?;
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Validate every value and expand `~/` in paths.
    pub fn resolve(&self) -> Result<Settings, WallpaperError> {
        if self.background_colors.is_empty() {
            return Err(WallpaperError::Config("background-colors is empty".into()));
        }
        if self.foreground_colors.is_empty() {
            return Err(WallpaperError::Config("foreground-colors is empty".into()));
        }

        let parse_all = |colors: &[String]| -> Result<Vec<Color>, WallpaperError> {
            colors.iter().map(|c| Color::parse(c)).collect()
        };

        Ok(Settings {
            background_colors: parse_all(&self.background_colors)?,
            foreground_colors: parse_all(&self.foreground_colors)?,
            dimension: Dimension::parse(&self.dimensions)?,
            target: expand_home(&self.target)?,
            cache: expand_home(&self.cache)?,
        })
    }
}

impl Settings {
    /// Pick one background and one foreground independently.
    pub fn choose_palette<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Palette, WallpaperError> {
        let background = self.background_colors.choose(rng)
            .ok_or_else(|| WallpaperError::Config("background-colors is empty".into()))?;
        let foreground = self.foreground_colors.choose(rng)
            .ok_or_else(|| WallpaperError::Config("foreground-colors is empty".into()))?;
        Ok(Palette::new(*background, *foreground))
    }
}

fn expand_home(path: &str) -> Result<PathBuf, WallpaperError> {
    if path.is_empty() {
        return Err(WallpaperError::Config("empty path".into()));
    }
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var_os("HOME")
                .ok_or_else(|| WallpaperError::Config("could not determine home directory".into()))?;
            Ok(PathBuf::from(home).join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}
