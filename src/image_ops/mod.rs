//! Image loading and file-picker helpers.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use directories::UserDirs;
use image::imageops::FilterType;
use image::{ImageError, ImageReader, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::placement::Size;
use crate::settings::Preferences;

/// Extensions offered in the image picker.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp"];

/// Why an image cannot be displayed.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("image file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image has no pixels: {}", .0.display())]
    Empty(PathBuf),
}

/// A decoded image ready to be uploaded as a texture.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Size of the file's pixels, used for placement.
    pub natural: Size,
    /// Pixel data, possibly downsampled to fit the texture limit.
    pub pixels: RgbaImage,
}

/// Return true when the file extension is a supported image type.
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(OsStr::to_str) {
        Some(ext) => IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Decode an image file. The format is sniffed from the file contents, so a
/// mislabelled extension still loads. Pixel data larger than `max_side` on
/// either axis is downsampled keeping aspect; the natural size is always the
/// file's size.
pub fn load_image(path: &Path, max_side: u32) -> Result<LoadedImage, ImageLoadError> {
    if !path.is_file() {
        return Err(ImageLoadError::Missing(path.to_path_buf()));
    }
    let decode_error = |source: ImageError| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|err| decode_error(ImageError::IoError(err)))?
        .decode()
        .map_err(decode_error)?;
    let natural = Size::new(img.width(), img.height());
    if natural.is_empty() {
        return Err(ImageLoadError::Empty(path.to_path_buf()));
    }

    let img = if max_side > 0 && (natural.width > max_side || natural.height > max_side) {
        debug!(
            path = %path.display(),
            width = natural.width,
            height = natural.height,
            max_side,
            "downsampling image for texture upload"
        );
        img.resize(max_side, max_side, FilterType::Triangle)
    } else {
        img
    };

    Ok(LoadedImage {
        natural,
        pixels: img.to_rgba8(),
    })
}

/// Directory the image picker opens in when nothing better is known.
///
/// Prefers `~/Pictures/Backdrops`, then `~/Pictures`, then the home folder.
pub fn default_image_dir() -> PathBuf {
    match UserDirs::new() {
        Some(dirs) => pick_default_dir(dirs.home_dir(), dirs.picture_dir()),
        None => PathBuf::from("."),
    }
}

fn pick_default_dir(home: &Path, pictures: Option<&Path>) -> PathBuf {
    let pictures = pictures
        .map(Path::to_path_buf)
        .unwrap_or_else(|| home.join("Pictures"));
    let backdrops = pictures.join("Backdrops");
    if backdrops.is_dir() {
        backdrops
    } else if pictures.is_dir() {
        pictures
    } else {
        home.to_path_buf()
    }
}

/// Directory the image picker should start in.
pub fn browse_start_dir(prefs: &Preferences) -> PathBuf {
    browse_start_dir_with(prefs, default_image_dir)
}

fn browse_start_dir_with(prefs: &Preferences, fallback: impl FnOnce() -> PathBuf) -> PathBuf {
    match prefs.image() {
        Some(current) => current
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(fallback),
        None => {
            let recent = Path::new(&prefs.recent_image_dir);
            if !prefs.recent_image_dir.is_empty() && recent.exists() {
                recent.to_path_buf()
            } else {
                fallback()
            }
        }
    }
}
