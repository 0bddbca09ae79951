//! Error types for the edgequake-pdfimg library.
//!
//! The pipeline is fail-fast: every failure below ends the run. The single
//! soft case, a staged file with an unsupported extension, is logged by the
//! decode stage and never becomes a [`PdfImgError`].
//!
//! Each variant carries the context a user needs to act on it (which file,
//! which page, which image) and [`PdfImgError::stage`] tells callers which
//! pipeline stage raised it.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdfimg library.
#[derive(Debug, Error)]
pub enum PdfImgError {
    // ── Argument errors ───────────────────────────────────────────────────
    /// The caller supplied an unusable argument or configuration value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ── Library activation ────────────────────────────────────────────────
    /// No pdfium library location was supplied.
    #[error(
        "PDFium library is not configured.\n\
Set {var}=/path/to/libpdfium (or pass --pdfium-lib) before running.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases"
    )]
    LibraryNotConfigured { var: &'static str },

    /// A location was supplied but pdfium could not be bound from it.
    #[error("Failed to bind to pdfium library at '{path}': {detail}")]
    LibraryBindingFailed { path: PathBuf, detail: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// A page of an opened document could not be loaded.
    #[error("Cannot read page {page} of '{path}': {detail}")]
    PageUnreadable {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── Image errors ──────────────────────────────────────────────────────
    /// pdfium could not produce a raster for an image object.
    #[error("Image {index} on page {page} could not be extracted: {detail}")]
    ImageExtraction {
        page: usize,
        index: usize,
        detail: String,
    },

    /// A staged JPEG could not be written.
    #[error("Failed to write staged image '{path}': {detail}")]
    ImageWrite { path: PathBuf, detail: String },

    /// A staged file could not be decoded.
    #[error("Failed to decode staged image '{path}': {detail}")]
    ImageDecode { path: PathBuf, detail: String },

    // ── Output document errors ────────────────────────────────────────────
    /// pdfium refused to create a page or place an image on it.
    #[error("Failed to compose output page {page}: {detail}")]
    Composition { page: usize, detail: String },

    /// The composed document could not be serialised.
    #[error("Failed to serialise output PDF: {0}")]
    Serialization(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The staging directory could not be created or listed.
    #[error("Staging directory error at '{path}': {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// The pipeline stage a [`PdfImgError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStage {
    Argument,
    License,
    DocumentOpen,
    DocumentStructure,
    ImageExtraction,
    ImageWrite,
    ImageDecode,
    Composition,
    Serialization,
    Staging,
    Output,
    Internal,
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorStage::Argument => "argument",
            ErrorStage::License => "license",
            ErrorStage::DocumentOpen => "document open",
            ErrorStage::DocumentStructure => "document structure",
            ErrorStage::ImageExtraction => "image extraction",
            ErrorStage::ImageWrite => "image write",
            ErrorStage::ImageDecode => "image decode",
            ErrorStage::Composition => "composition",
            ErrorStage::Serialization => "serialization",
            ErrorStage::Staging => "staging",
            ErrorStage::Output => "output",
            ErrorStage::Internal => "internal",
        };
        f.write_str(name)
    }
}

impl PdfImgError {
    /// Which pipeline stage raised this error.
    pub fn stage(&self) -> ErrorStage {
        match self {
            PdfImgError::InvalidArgument(_) => ErrorStage::Argument,
            PdfImgError::LibraryNotConfigured { .. } | PdfImgError::LibraryBindingFailed { .. } => {
                ErrorStage::License
            }
            PdfImgError::FileNotFound { .. }
            | PdfImgError::PermissionDenied { .. }
            | PdfImgError::NotAPdf { .. }
            | PdfImgError::CorruptPdf { .. }
            | PdfImgError::PasswordRequired { .. }
            | PdfImgError::WrongPassword { .. } => ErrorStage::DocumentOpen,
            PdfImgError::PageUnreadable { .. } => ErrorStage::DocumentStructure,
            PdfImgError::ImageExtraction { .. } => ErrorStage::ImageExtraction,
            PdfImgError::ImageWrite { .. } => ErrorStage::ImageWrite,
            PdfImgError::ImageDecode { .. } => ErrorStage::ImageDecode,
            PdfImgError::Composition { .. } => ErrorStage::Composition,
            PdfImgError::Serialization(_) => ErrorStage::Serialization,
            PdfImgError::Staging { .. } => ErrorStage::Staging,
            PdfImgError::OutputWriteFailed { .. } => ErrorStage::Output,
            PdfImgError::Internal(_) => ErrorStage::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_not_configured_names_the_variable() {
        let e = PdfImgError::LibraryNotConfigured {
            var: "PDFIUM_LIB_PATH",
        };
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
        assert_eq!(e.stage(), ErrorStage::License);
    }

    #[test]
    fn image_extraction_display() {
        let e = PdfImgError::ImageExtraction {
            page: 3,
            index: 1,
            detail: "bad filter".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("Image 1"), "got: {msg}");
        assert!(msg.contains("bad filter"));
    }

    #[test]
    fn open_errors_share_a_stage() {
        let path = PathBuf::from("missing.pdf");
        let errors = [
            PdfImgError::FileNotFound { path: path.clone() },
            PdfImgError::PermissionDenied { path: path.clone() },
            PdfImgError::NotAPdf {
                path: path.clone(),
                magic: *b"GIF8",
            },
            PdfImgError::PasswordRequired { path },
        ];
        for e in errors {
            assert_eq!(e.stage(), ErrorStage::DocumentOpen, "{e}");
        }
    }

    #[test]
    fn decode_error_mentions_path() {
        let e = PdfImgError::ImageDecode {
            path: PathBuf::from("/tmp/stage/p1_0.jpg"),
            detail: "truncated".into(),
        };
        assert!(e.to_string().contains("p1_0.jpg"));
        assert_eq!(e.stage().to_string(), "image decode");
    }

    #[test]
    fn output_write_keeps_source() {
        use std::error::Error as _;
        let e = PdfImgError::OutputWriteFailed {
            path: PathBuf::from("out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.source().is_some());
        assert_eq!(e.stage(), ErrorStage::Output);
    }
}
