//! Conversion entry points: the whole pipeline, start to finish.
//!
//! ```text
//! activate ─▶ resolve input ─▶ staging dir ─▶ extract ─▶ list ─▶ decode ─▶ compose
//! ```
//!
//! The staging directory lives exactly as long as [`convert`]'s stack frame:
//! every `?` below drops it, so a failed run never leaves staged files behind.

use crate::config::RepageConfig;
use crate::error::PdfImgError;
use crate::output::{ExtractionReport, RepageOutput, RepageStats};
use crate::pipeline::{compose, decode, extract, input, library, staging::StagingArea};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Extract every image of the PDF at `input` and compose them into a new
/// PDF, one image per page.
///
/// # Errors
/// Fails on the first error of any stage:
/// - pdfium not configured or not loadable (before the input is touched)
/// - input missing, unreadable, not a PDF, encrypted (before staging)
/// - an image that cannot be extracted, staged or decoded
/// - pdfium refusing to compose or serialise the output
pub fn convert(
    input_path: impl AsRef<Path>,
    config: &RepageConfig,
) -> Result<RepageOutput, PdfImgError> {
    let total_start = Instant::now();
    let input_path = input_path.as_ref();
    info!("Starting conversion: {}", input_path.display());

    // ── Step 1: Bind pdfium ──────────────────────────────────────────────
    let pdfium = library::activate(config)?;

    // ── Step 2: Validate input ───────────────────────────────────────────
    let pdf_path = input::resolve_local(input_path)?;

    // ── Step 3: Staging directory ────────────────────────────────────────
    let staging = StagingArea::create(config.staging_root.as_deref(), &pdf_path)?;
    info!("Creating temporary directory at: {}", staging.path().display());

    // ── Step 4: Extract images to staging ────────────────────────────────
    let extract_start = Instant::now();
    let report = extract::extract_to_staging(&pdfium, &pdf_path, &staging, config)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 5: List and decode staged files ─────────────────────────────
    let files = staging.list(config.staging_order)?;
    debug!("{} staged files ({:?} order)", files.len(), config.staging_order);
    let loaded = decode::load_images(&files, config)?;

    // ── Step 6: Compose output ───────────────────────────────────────────
    let compose_start = Instant::now();
    let pdf = compose::compose_document(&pdfium, &loaded.images)?;
    let compose_duration_ms = compose_start.elapsed().as_millis() as u64;

    let stats = RepageStats {
        source_pages: report.page_count,
        images_extracted: report.images.len(),
        files_skipped: loaded.skipped.len(),
        pages_written: loaded.images.len(),
        output_bytes: pdf.len(),
        extract_duration_ms,
        compose_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} images → {} pages, {}ms total",
        stats.images_extracted, stats.pages_written, stats.total_duration_ms
    );

    Ok(RepageOutput { pdf, report, stats })
}

/// Convert and write the output PDF to `output_path`, creating or
/// overwriting it.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &RepageConfig,
) -> Result<RepageStats, PdfImgError> {
    let output = convert(input_path, config)?;
    let path = output_path.as_ref();
    write_atomic(path, &output.pdf)?;
    info!("Wrote {} ({} bytes)", path.display(), output.pdf.len());
    Ok(output.stats)
}

/// Write `bytes` to `<path>.tmp` and rename it over `path`. On any failure
/// the temp file is removed and `path` is left untouched.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PdfImgError> {
    let write_err = |source| PdfImgError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, bytes)
        .and_then(|()| std::fs::rename(&tmp_path, path))
        .map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            write_err(e)
        })
}

/// List the images of a PDF and where they sit, without staging or
/// composing anything.
pub fn inspect(
    input_path: impl AsRef<Path>,
    config: &RepageConfig,
) -> Result<ExtractionReport, PdfImgError> {
    let pdfium = library::activate(config)?;
    let pdf_path = input::resolve_local(input_path.as_ref())?;
    extract::enumerate_images(&pdfium, &pdf_path, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorStage;

    fn entry_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn unconfigured_library_stops_before_input() {
        let root = tempfile::tempdir().unwrap();
        let config = RepageConfig::builder()
            .staging_root(root.path())
            .build()
            .unwrap();

        // The input doesn't exist either; the library gate must win.
        let err = convert("/no/such/input.pdf", &config).unwrap_err();
        assert_eq!(err.stage(), ErrorStage::License);
        assert_eq!(entry_count(root.path()), 0);
    }

    #[test]
    fn bad_library_path_stops_before_staging() {
        let root = tempfile::tempdir().unwrap();
        let config = RepageConfig::builder()
            .pdfium_lib_path(root.path().join("libpdfium.so"))
            .staging_root(root.path())
            .build()
            .unwrap();

        let err = convert("/no/such/input.pdf", &config).unwrap_err();
        assert!(matches!(err, PdfImgError::LibraryBindingFailed { .. }));
        assert_eq!(entry_count(root.path()), 0);
    }

    #[test]
    fn convert_to_file_leaves_no_output_on_failure() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("result.pdf");
        let err = convert_to_file("/no/such/input.pdf", &target, &RepageConfig::default())
            .unwrap_err();
        assert_eq!(err.stage(), ErrorStage::License);
        assert!(!target.exists());
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out.pdf");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, b"old").unwrap();

        write_atomic(&target, b"%PDF-1.7").unwrap();
        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.7");
        assert!(!dir.path().join("nested").join("out.pdf.tmp").exists());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let target = dir.path().join("out.pdf");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();

        let err = write_atomic(&target, b"%PDF-1.7").unwrap_err();
        assert_eq!(err.stage(), ErrorStage::Output);
        assert!(!dir.path().join("out.pdf.tmp").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_write_removes_temp_file() {
        if !Path::new("/dev/full").exists() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.pdf");
        let tmp = dir.path().join("out.pdf.tmp");
        // Writes through this link fail with ENOSPC.
        std::os::unix::fs::symlink("/dev/full", &tmp).unwrap();

        let err = write_atomic(&target, &[0u8; 4096]).unwrap_err();
        assert!(matches!(err, PdfImgError::OutputWriteFailed { .. }));
        assert!(std::fs::symlink_metadata(&tmp).is_err(), "temp file left behind");
        assert!(!target.exists());
    }

    #[test]
    fn inspect_requires_library() {
        let err = inspect("/no/such/input.pdf", &RepageConfig::default()).unwrap_err();
        assert!(matches!(err, PdfImgError::LibraryNotConfigured { .. }));
    }
}
