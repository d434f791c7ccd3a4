//! Wallpaper Pipeline
//!
//! recolor -> background -> composite, each stage persisted under a fixed
//! name in the cache directory and read back by the next one. Files are
//! written beside their final name and renamed into place, so a failed
//! stage never leaves a file that looks like valid output.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use tracing::{debug, info};

use crate::background;
use crate::color::Color;
use crate::composite;
use crate::dimension::Dimension;
use crate::duotone::{self, Palette};
use crate::error::WallpaperError;

pub const COLORED_FILE: &str = "colored.png";
pub const BACKGROUND_FILE: &str = "background.png";
pub const FINAL_FILE: &str = "final.png";

/// Decode an image, sniffing the format from its bytes rather than its name.
pub fn load_image(path: &Path) -> Result<DynamicImage, WallpaperError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.decode().map_err(WallpaperError::DecodeFailure)
}

/// Sibling path a file is staged at before being renamed over `path`.
fn staging_path(path: &Path) -> Result<PathBuf, WallpaperError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| WallpaperError::Io(io::Error::new(io::ErrorKind::InvalidInput, "no file name")))?;
    Ok(path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
}

/// Run `write` against a staging file, then rename it over `path`.
/// On failure the staging file is removed and `path` is left untouched.
fn replace_atomically<F>(path: &Path, write: F) -> Result<(), WallpaperError>
where
    F: FnOnce(&Path) -> Result<(), WallpaperError>,
{
    let tmp = staging_path(path)?;
    let written = write(&tmp).and_then(|()| Ok(fs::rename(&tmp, path)?));
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

/// Encode `image` as PNG at `path`, replacing any previous file atomically.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), WallpaperError> {
    replace_atomically(path, |tmp| write_png(image, tmp))
}

fn write_png(image: &RgbaImage, path: &Path) -> Result<(), WallpaperError> {
    let mut writer = BufWriter::new(File::create(path)?);
    image
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(WallpaperError::EncodeFailure)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

/// Copy the finished wallpaper to its destination and flush it to disk.
/// An existing target is only replaced once the full copy is synced.
pub fn copy_to_target(src: &Path, dst: &Path) -> Result<(), WallpaperError> {
    if let Some(dir) = dst.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let mut input = File::open(src)?;
    replace_atomically(dst, |tmp| {
        let mut output = File::create(tmp)?;
        io::copy(&mut input, &mut output)?;
        output.flush()?;
        output.sync_all()?;
        Ok(())
    })?;

    info!(path = %dst.display(), "copied wallpaper");
    Ok(())
}

/// Path-based pipeline rooted at a cache directory.
pub struct WallpaperPipeline {
    cache_dir: PathBuf,
}

impl WallpaperPipeline {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self { cache_dir: cache_dir.into() }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn persist(&self, image: &RgbaImage, name: &str) -> Result<PathBuf, WallpaperError> {
        fs::create_dir_all(&self.cache_dir)?;
        let path = self.cache_dir.join(name);
        save_png(image, &path)?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "wrote stage");
        Ok(path)
    }

    /// Recolor the image at `source` and write `colored.png`.
    pub fn colorize(&self, source: &Path, palette: &Palette) -> Result<PathBuf, WallpaperError> {
        let img = load_image(source)?;
        let colored = duotone::recolor(&img, palette);
        self.persist(&colored, COLORED_FILE)
    }

    /// Write `background.png`, a solid canvas.
    pub fn make_background(&self, dimension: Dimension, color: Color) -> Result<PathBuf, WallpaperError> {
        let canvas = background::generate(dimension, color);
        self.persist(&canvas, BACKGROUND_FILE)
    }

    /// Center the image at `fg` over the one at `bg` and write `final.png`.
    pub fn composite_center(&self, fg: &Path, bg: &Path) -> Result<PathBuf, WallpaperError> {
        let background = load_image(bg)?.to_rgba8();
        let foreground = load_image(fg)?.to_rgba8();
        let out = composite::composite_center(&foreground, &background)?;
        self.persist(&out, FINAL_FILE)
    }

    /// Run every stage and return the path of the final image.
    pub fn run(
        &self,
        source: &Path,
        palette: &Palette,
        dimension: Dimension,
    ) -> Result<PathBuf, WallpaperError> {
        info!(
            source = %source.display(),
            background = %palette.background,
            foreground = %palette.foreground,
            %dimension,
            "building wallpaper"
        );

        let colored = self.colorize(source, palette)?;
        let canvas = self.make_background(dimension, palette.background)?;
        self.composite_center(&colored, &canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_save_png_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save_png(&RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])), &path).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.png".to_string()]);
    }

    #[test]
    fn test_load_image_sniffs_format() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        save_png(&RgbaImage::from_pixel(3, 1, Rgba([9, 8, 7, 255])), &png).unwrap();

        let misnamed = dir.path().join("comic.jpg");
        fs::copy(&png, &misnamed).unwrap();
        let img = load_image(&misnamed).unwrap().to_rgba8();
        assert_eq!(*img.get_pixel(2, 0), Rgba([9, 8, 7, 255]));
    }

    #[test]
    fn test_load_garbage_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comic.png");
        fs::write(&path, b"<html>not an image</html>").unwrap();
        assert!(matches!(load_image(&path), Err(WallpaperError::DecodeFailure(_))));
    }

    #[test]
    fn test_load_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_image(&dir.path().join("missing.png")),
            Err(WallpaperError::Io(_))
        ));
    }

    #[test]
    fn test_copy_to_target_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("final.png");
        fs::write(&src, b"bytes").unwrap();
        let dst = dir.path().join("a").join("b").join("wall.png");

        copy_to_target(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"bytes");
    }

    #[test]
    fn test_copy_to_target_replaces_without_staging_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("final.png");
        fs::write(&src, b"new wallpaper").unwrap();
        let walls = dir.path().join("walls");
        fs::create_dir(&walls).unwrap();
        let dst = walls.join("wall.png");
        fs::write(&dst, b"old").unwrap();

        copy_to_target(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"new wallpaper");

        let names: Vec<_> = fs::read_dir(&walls)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["wall.png".to_string()]);
    }

    #[test]
    fn test_failed_copy_keeps_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("wall.png");
        fs::write(&dst, b"previous wallpaper").unwrap();

        // A directory opens on unix but fails on read, mid-copy
        let src = dir.path().join("not-a-file");
        fs::create_dir(&src).unwrap();

        assert!(matches!(copy_to_target(&src, &dst), Err(WallpaperError::Io(_))));
        assert_eq!(fs::read(&dst).unwrap(), b"previous wallpaper");
        assert!(!dir.path().join(".wall.png.tmp").exists());
    }
}
