//! Configuration types for PDF image re-paging.
//!
//! Everything a run needs is carried by [`RepageConfig`] and handed to each
//! stage explicitly; no stage reads process-global settings. Build it with
//! [`RepageConfig::builder`] or start from [`RepageConfig::from_env`] to
//! pick up the pdfium library location from the environment.
//!
//! Page size, orientation and margins are fixed (see
//! [`crate::pipeline::compose`]) and deliberately absent here.

use crate::error::PdfImgError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable naming the pdfium shared library (file or directory).
pub const PDFIUM_LIB_ENV: &str = "PDFIUM_LIB_PATH";

/// Configuration for a re-paging run.
///
/// # Example
/// ```rust
/// use edgequake_pdfimg::{RepageConfig, StagingOrder};
///
/// let config = RepageConfig::builder()
///     .pdfium_lib_path("/opt/pdfium/lib")
///     .staging_order(StagingOrder::Name)
///     .build()
///     .unwrap();
/// assert_eq!(config.staging_order, StagingOrder::Name);
/// ```
#[derive(Clone, Default)]
pub struct RepageConfig {
    /// Location of the pdfium shared library, either the library file itself
    /// or the directory containing it. Required: a run without it fails with
    /// [`PdfImgError::LibraryNotConfigured`] before any document is opened.
    pub pdfium_lib_path: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Order in which staged images are decoded, and therefore paged.
    pub staging_order: StagingOrder,

    /// Parent directory for the private staging directory.
    /// If None, the system temp directory is used.
    pub staging_root: Option<PathBuf>,

    /// Receives extraction events. If None, events are only logged.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for RepageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepageConfig")
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("staging_order", &self.staging_order)
            .field("staging_root", &self.staging_root)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl RepageConfig {
    /// Create a new builder for `RepageConfig`.
    pub fn builder() -> RepageConfigBuilder {
        RepageConfigBuilder {
            config: Self::default(),
        }
    }

    /// Default configuration with `pdfium_lib_path` read from
    /// [`PDFIUM_LIB_ENV`]. An empty value counts as unset.
    pub fn from_env() -> Self {
        Self {
            pdfium_lib_path: std::env::var_os(PDFIUM_LIB_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            ..Self::default()
        }
    }
}

/// Builder for [`RepageConfig`].
#[derive(Debug)]
pub struct RepageConfigBuilder {
    config: RepageConfig,
}

impl RepageConfigBuilder {
    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn staging_order(mut self, order: StagingOrder) -> Self {
        self.config.staging_order = order;
        self
    }

    pub fn staging_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.staging_root = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RepageConfig, PdfImgError> {
        let c = &self.config;
        if c.pdfium_lib_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(PdfImgError::InvalidArgument(
                "pdfium library path must not be empty".into(),
            ));
        }
        if let Some(root) = &c.staging_root {
            if !root.is_dir() {
                return Err(PdfImgError::InvalidArgument(format!(
                    "staging root '{}' is not a directory",
                    root.display()
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How staged files are ordered before they are decoded and paged.
///
/// | Order | Output page order |
/// |-------|-------------------|
/// | `PageThenIndex` | source page, then position on the page (default) |
/// | `Name` | lexical file name, so `p10_0` precedes `p2_0` |
/// | `Directory` | whatever the filesystem listing returns |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagingOrder {
    #[default]
    PageThenIndex,
    Name,
    Directory,
}

impl FromStr for StagingOrder {
    type Err = PdfImgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "page" | "page-then-index" | "page_then_index" => Ok(StagingOrder::PageThenIndex),
            "name" => Ok(StagingOrder::Name),
            "directory" | "dir" | "filesystem" => Ok(StagingOrder::Directory),
            other => Err(PdfImgError::InvalidArgument(format!(
                "unknown staging order '{other}' (expected page, name or directory)"
            ))),
        }
    }
}
