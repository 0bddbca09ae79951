//! Input resolution: validate the user-supplied PDF path.
//!
//! Runs before the staging directory exists, so a missing or mistyped input
//! fails without a single temporary file being written. We check the PDF
//! magic bytes (`%PDF`) here so callers get a meaningful error rather than
//! a pdfium failure.

use crate::error::PdfImgError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_local(path: &Path) -> Result<PathBuf, PdfImgError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(PdfImgError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            let read = f.read(&mut magic).unwrap_or(0);
            if read < magic.len() || &magic != b"%PDF" {
                return Err(PdfImgError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfImgError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfImgError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
