//! Library activation: bind the pdfium shared library before any PDF work.
//!
//! This is the process's startup gate. The caller must say where pdfium
//! lives (`PDFIUM_LIB_PATH` or `--pdfium-lib`); when it does not, or the
//! library cannot be loaded from there, the run stops here with an
//! [`ErrorStage::License`](crate::error::ErrorStage::License) error and no
//! document is ever opened.
//!
//! The bound [`Pdfium`] handle is returned to the caller and passed to each
//! stage by reference rather than kept in a global.

use crate::config::{RepageConfig, PDFIUM_LIB_ENV};
use crate::error::PdfImgError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bind pdfium from the location named in `config`.
pub fn activate(config: &RepageConfig) -> Result<Pdfium, PdfImgError> {
    let location = config
        .pdfium_lib_path
        .as_deref()
        .ok_or(PdfImgError::LibraryNotConfigured {
            var: PDFIUM_LIB_ENV,
        })?;

    let lib_path = resolve_library_path(location);
    if !lib_path.exists() {
        return Err(PdfImgError::LibraryBindingFailed {
            path: lib_path,
            detail: "no such file".into(),
        });
    }

    debug!("Binding pdfium from {}", lib_path.display());
    let bindings =
        Pdfium::bind_to_library(&lib_path).map_err(|e| PdfImgError::LibraryBindingFailed {
            path: lib_path.clone(),
            detail: format!("{:?}", e),
        })?;

    info!("pdfium bound from {}", lib_path.display());
    Ok(Pdfium::new(bindings))
}

/// A directory resolves to the platform library name inside it
/// (`libpdfium.so`, `libpdfium.dylib`, `pdfium.dll`); anything else is
/// taken as the library file itself.
pub fn resolve_library_path(location: &Path) -> PathBuf {
    if location.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(location)
    } else {
        location.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorStage;

    #[test]
    fn missing_location_is_a_license_error() {
        let err = activate(&RepageConfig::default()).unwrap_err();
        assert!(matches!(err, PdfImgError::LibraryNotConfigured { .. }));
        assert_eq!(err.stage(), ErrorStage::License);
    }

    #[test]
    fn nonexistent_library_fails_to_bind() {
        let config = RepageConfig::builder()
            .pdfium_lib_path("/nonexistent/libpdfium.so")
            .build()
            .unwrap();
        let err = activate(&config).unwrap_err();
        assert!(matches!(err, PdfImgError::LibraryBindingFailed { .. }));
        assert_eq!(err.stage(), ErrorStage::License);
    }

    #[test]
    fn directory_resolves_to_platform_library() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_library_path(dir.path());
        assert_eq!(resolved.parent(), Some(dir.path()));
        let name = resolved.file_name().unwrap().to_string_lossy();
        assert!(name.contains("pdfium"), "got: {name}");
    }

    #[test]
    fn file_path_is_kept() {
        let p = Path::new("/opt/lib/libpdfium.so");
        assert_eq!(resolve_library_path(p), p.to_path_buf());
    }
}
