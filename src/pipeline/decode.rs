//! Decode loader: read staged files back into in-memory rasters.
//!
//! Only `.jpg` and `.png` entries are decoded (extension compared without
//! regard to case). Anything else in the staging directory is logged and
//! skipped; that is never an error. A qualifying file that fails to decode
//! is fatal for the whole run.
//!
//! The decoder sniffs the format from the file's leading bytes, so a PNG
//! that happens to carry a `.jpg` name still decodes.

use crate::config::RepageConfig;
use crate::error::PdfImgError;
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extensions the loader will try to decode.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "png"];

/// A staged file decoded into memory.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub source: PathBuf,
    pub image: DynamicImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Result of loading a staging directory.
#[derive(Debug, Default)]
pub struct LoadedImages {
    pub images: Vec<DecodedImage>,
    /// Files left out because of their extension.
    pub skipped: Vec<PathBuf>,
}

/// Whether `path` has one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Decode `files` in the order given, skipping unsupported extensions.
pub fn load_images(files: &[PathBuf], config: &RepageConfig) -> Result<LoadedImages, PdfImgError> {
    info!("total images: {}", files.len());
    let mut loaded = LoadedImages::default();

    for path in files {
        if !is_supported(path) {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            warn!("extension not supported: .{} ({})", ext, path.display());
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_skipped(path);
            }
            loaded.skipped.push(path.clone());
            continue;
        }

        let image = decode_file(path)?;
        debug!(
            "Decoded {} → {}x{} px",
            path.display(),
            image.width(),
            image.height()
        );
        loaded.images.push(DecodedImage {
            source: path.clone(),
            image,
        });
    }

    Ok(loaded)
}

/// Open and decode one file, detecting the format from its content.
pub fn decode_file(path: &Path) -> Result<DynamicImage, PdfImgError> {
    let decode_err = |detail: String| PdfImgError::ImageDecode {
        path: path.to_path_buf(),
        detail,
    };

    ImageReader::open(path)
        .map_err(|e| decode_err(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| decode_err(format!("Cannot detect image format: {e}")))?
        .decode()
        .map_err(|e| decode_err(e.to_string()))
}
