//! # edgequake-pdfimg
//!
//! Pull the raster images out of a PDF and re-page them into a new PDF,
//! one image per page, each scaled to the page width.
//!
//! All PDF work (parsing, image decoding, page generation) is done by
//! [PDFium](https://pdfium.googlesource.com/pdfium/) through
//! `pdfium-render`. This crate stages the images, decodes them with the
//! `image` crate and lays them out.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Activate  bind libpdfium (PDFIUM_LIB_PATH)
//!  ├─ 2. Input     check the file exists and is a PDF
//!  ├─ 3. Extract   every image → p<page>_<index>.jpg in a private temp dir
//!  ├─ 4. Decode    staged .jpg/.png → DynamicImage (others skipped)
//!  ├─ 5. Compose   one US Letter page per image, width = page − 2 × 10 pt
//!  └─ 6. Output    serialised PDF bytes; temp dir removed
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfimg::{convert_to_file, RepageConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // pdfium location from PDFIUM_LIB_PATH
//!     let config = RepageConfig::from_env();
//!     let stats = convert_to_file("scanned.pdf", "images.pdf", &config)?;
//!     eprintln!("{} images → {} pages", stats.images_extracted, stats.pages_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfimg` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdfimg = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RepageConfig, RepageConfigBuilder, StagingOrder, PDFIUM_LIB_ENV};
pub use convert::{convert, convert_to_file, inspect};
pub use error::{ErrorStage, PdfImgError};
pub use output::{ExtractedImage, ExtractionReport, RepageOutput, RepageStats};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
