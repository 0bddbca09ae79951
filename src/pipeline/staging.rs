//! The staging area: a private temporary directory for extracted images.
//!
//! Extraction writes one JPEG per embedded image here, named
//! `p<page>_<index>.jpg`; the decode stage reads each file back once. The
//! directory is owned by a [`tempfile::TempDir`], so it is removed exactly
//! once when the [`StagingArea`] is dropped: on success, on an early `?`
//! return, and during unwinding. Removal is best-effort; a failure to delete
//! is not reported.

use crate::config::StagingOrder;
use crate::error::PdfImgError;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Extension of every file written by the extraction stage.
pub const STAGED_EXTENSION: &str = "jpg";

/// A uniquely named temporary directory removed on drop.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a staging directory under `root` (or the system temp dir).
    ///
    /// The name embeds the input's file stem so a leftover directory, e.g.
    /// after `SIGKILL`, can be traced back to the run that made it.
    pub fn create(root: Option<&Path>, input: &Path) -> Result<Self, PdfImgError> {
        let suffix = format!("-{}", sanitise_stem(input));
        let mut builder = tempfile::Builder::new();
        builder.prefix("pdfimg-").suffix(&suffix);

        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|source| PdfImgError::Staging {
            path: root.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir),
            source,
        })?;

        debug!("Created staging directory at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the staged file for image `index` (0-based) on `page` (1-based).
    pub fn file_for(&self, page: usize, index: usize) -> PathBuf {
        self.dir.path().join(staged_file_name(page, index))
    }

    /// List the regular files in the staging directory in the given order.
    pub fn list(&self, order: StagingOrder) -> Result<Vec<PathBuf>, PdfImgError> {
        list_staged_files(self.dir.path(), order)
    }
}

/// `p<page>_<index>.jpg`
pub fn staged_file_name(page: usize, index: usize) -> String {
    format!("p{page}_{index}.{STAGED_EXTENSION}")
}

/// Recover `(page, index)` from a staged file name, ignoring the extension.
pub fn parse_staged_name(name: &str) -> Option<(usize, usize)> {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let (page, index) = stem.strip_prefix('p')?.split_once('_')?;
    Some((page.parse().ok()?, index.parse().ok()?))
}

/// List regular files in `dir`, ordered according to `order`.
pub fn list_staged_files(dir: &Path, order: StagingOrder) -> Result<Vec<PathBuf>, PdfImgError> {
    let staging_err = |source| PdfImgError::Staging {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(staging_err)? {
        let entry = entry.map_err(staging_err)?;
        if entry.file_type().map_err(staging_err)?.is_file() {
            files.push(entry.path());
        }
    }

    match order {
        StagingOrder::Directory => {}
        StagingOrder::Name => files.sort_by(|a, b| a.file_name().cmp(&b.file_name())),
        StagingOrder::PageThenIndex => files.sort_by(compare_page_then_index),
    }
    Ok(files)
}

/// Numeric `(page, index)` order; names that don't parse go last, by name.
fn compare_page_then_index(a: &PathBuf, b: &PathBuf) -> Ordering {
    let key = |p: &PathBuf| {
        p.file_name()
            .and_then(|n| n.to_str())
            .and_then(parse_staged_name)
    };
    match (key(a), key(b)) {
        (Some(ka), Some(kb)) => ka.cmp(&kb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.file_name().cmp(&b.file_name()),
    }
}

fn sanitise_stem(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(48)
        .collect();
    if cleaned.is_empty() {
        "input".to_string()
    } else {
        cleaned
    }
}
