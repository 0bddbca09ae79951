//! Result types returned by the conversion entry points.

use serde::Serialize;
use std::path::PathBuf;

/// One image found on a source page and written to the staging directory.
///
/// Placement (`x`, `y`, `width`, `height`) is in page space (points, origin
/// bottom-left) and is diagnostic only: the composer recomputes placement
/// from the decoded pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedImage {
    /// 1-indexed source page.
    pub page: usize,
    /// 0-indexed position among the page's images, in library order.
    pub index: usize,
    /// 1-indexed position among all images of the document.
    pub ordinal: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Staged JPEG; empty for [`crate::inspect`], which stages nothing.
    pub staged_path: PathBuf,
}

/// Everything the extraction stage learnt about the source document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    pub page_count: usize,
    pub images: Vec<ExtractedImage>,
}

impl ExtractionReport {
    /// Images found on one page (1-indexed).
    pub fn images_on_page(&self, page: usize) -> impl Iterator<Item = &ExtractedImage> {
        self.images.iter().filter(move |img| img.page == page)
    }
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepageStats {
    /// Pages in the source document.
    pub source_pages: usize,
    /// Images written to the staging directory.
    pub images_extracted: usize,
    /// Staged files skipped by the decode stage.
    pub files_skipped: usize,
    /// Pages in the output document (one per decoded image).
    pub pages_written: usize,
    /// Size of the serialised output PDF.
    pub output_bytes: usize,
    pub extract_duration_ms: u64,
    pub compose_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// The serialised output document together with what produced it.
#[derive(Debug, Clone)]
pub struct RepageOutput {
    pub pdf: Vec<u8>,
    pub report: ExtractionReport,
    pub stats: RepageStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(page: usize, index: usize) -> ExtractedImage {
        ExtractedImage {
            page,
            index,
            ordinal: 0,
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            pixel_width: 3,
            pixel_height: 4,
            staged_path: PathBuf::new(),
        }
    }

    #[test]
    fn images_on_page_filters() {
        let report = ExtractionReport {
            page_count: 3,
            images: vec![image(1, 0), image(2, 0), image(2, 1)],
        };
        assert_eq!(report.images_on_page(2).count(), 2);
        assert_eq!(report.images_on_page(3).count(), 0);
    }

    #[test]
    fn stats_serialise_to_json() {
        let stats = RepageStats {
            source_pages: 4,
            pages_written: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["source_pages"], 4);
        assert_eq!(json["pages_written"], 2);
    }
}
