//! Comic Fetching
//!
//! Resolves which comic to use, reads its metadata, and downloads the image
//! into the cache directory under a fixed name.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::Rng;
use reqwest::blocking::Client;
use tracing::info;

use crate::error::WallpaperError;

pub const XKCD_BASE_URL: &str = "https://xkcd.com";

/// Cache filename for the downloaded comic, overwritten on every run.
pub const COMIC_FILE: &str = "comic.png";

/// Which comic to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComicSelector {
    Today,
    Random,
    Number(u32),
}

impl FromStr for ComicSelector {
    type Err = WallpaperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Self::Today),
            "random" => Ok(Self::Random),
            _ => match s.parse::<u32>() {
                Ok(n) if n > 0 => Ok(Self::Number(n)),
                _ => Err(WallpaperError::InvalidComicSelector(s.to_string())),
            },
        }
    }
}

impl fmt::Display for ComicSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("today"),
            Self::Random => f.write_str("random"),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Subset of `info.0.json` the pipeline needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ComicInfo {
    pub num: u32,
    #[serde(default)]
    pub img: String,
}

pub struct XkcdClient {
    http: Client,
    base_url: String,
}

impl XkcdClient {
    pub fn new() -> Self {
        Self::with_base_url(XKCD_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Metadata URL for a comic, or for the latest one when `num` is `None`.
    pub fn info_url(&self, num: Option<u32>) -> String {
        match num {
            Some(n) => format!("{}/{}/info.0.json", self.base_url, n),
            None => format!("{}/info.0.json", self.base_url),
        }
    }

    fn fetch_info(&self, num: Option<u32>) -> Result<ComicInfo, WallpaperError> {
        let info = self.http
            .get(self.info_url(num))
            .send()?
            .error_for_status()?
            .json::<ComicInfo>()?;
        Ok(info)
    }

    /// Turn a selector into a concrete comic number.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        selector: ComicSelector,
        rng: &mut R,
    ) -> Result<u32, WallpaperError> {
        match selector {
            ComicSelector::Number(n) => Ok(n),
            ComicSelector::Today => Ok(self.fetch_info(None)?.num),
            ComicSelector::Random => {
                let latest = self.fetch_info(None)?.num;
                pick_random(latest, rng)
            }
        }
    }

    /// Download the selected comic into `cache_dir/comic.png`.
    pub fn download<R: Rng + ?Sized>(
        &self,
        selector: ComicSelector,
        cache_dir: &Path,
        rng: &mut R,
    ) -> Result<PathBuf, WallpaperError> {
        fs::create_dir_all(cache_dir)?;

        let num = self.resolve(selector, rng)?;
        let comic = self.fetch_info(Some(num))?;
        if comic.img.is_empty() {
            return Err(WallpaperError::MissingImage(num));
        }

        let bytes = self.http.get(&comic.img).send()?.error_for_status()?.bytes()?;

        let out_path = cache_dir.join(COMIC_FILE);
        fs::write(&out_path, &bytes)?;
        info!(num, url = %comic.img, path = %out_path.display(), "downloaded comic");

        Ok(out_path)
    }
}

impl Default for XkcdClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform pick in `1..=latest`.
fn pick_random<R: Rng + ?Sized>(latest: u32, rng: &mut R) -> Result<u32, WallpaperError> {
    if latest == 0 {
        return Err(WallpaperError::InvalidComicSelector("random (no comics published)".into()));
    }
    Ok(rng.random_range(1..=latest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_selector_parsing() {
        assert_eq!("today".parse::<ComicSelector>().unwrap(), ComicSelector::Today);
        assert_eq!("random".parse::<ComicSelector>().unwrap(), ComicSelector::Random);
        assert_eq!("353".parse::<ComicSelector>().unwrap(), ComicSelector::Number(353));
    }

    #[test]
    fn test_selector_rejects_invalid() {
        for s in ["", "0", "-4", "Today", "latest", "12a"] {
            assert!(matches!(
                s.parse::<ComicSelector>(),
                Err(WallpaperError::InvalidComicSelector(_))
            ), "{s:?} should be rejected");
        }
    }

    #[test]
    fn test_selector_display_roundtrip() {
        for s in ["today", "random", "1024"] {
            assert_eq!(s.parse::<ComicSelector>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_info_urls() {
        let client = XkcdClient::with_base_url("http://localhost:8080/");
        assert_eq!(client.info_url(None), "http://localhost:8080/info.0.json");
        assert_eq!(client.info_url(Some(42)), "http://localhost:8080/42/info.0.json");
    }

    #[test]
    fn test_numbered_selector_needs_no_network() {
        let client = XkcdClient::with_base_url("http://127.0.0.1:9");
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(client.resolve(ComicSelector::Number(7), &mut rng).unwrap(), 7);
    }

    #[test]
    fn test_pick_random_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let n = pick_random(5, &mut rng).unwrap();
            assert!((1..=5).contains(&n));
        }
        assert!(pick_random(0, &mut rng).is_err());
    }

    #[test]
    fn test_comic_info_decoding() {
        let info: ComicInfo = serde_json::from_str(
            r#"{"num": 2000, "img": "https://imgs.xkcd.com/comics/x.png", "title": "x"}"#,
        ).unwrap();
        assert_eq!(info.num, 2000);
        let bare: ComicInfo = serde_json::from_str(r#"{"num": 1}"#).unwrap();
        assert!(bare.img.is_empty());
    }
}
