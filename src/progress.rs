//! Progress-callback trait for extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::RepageConfigBuilder::progress_callback`] to observe the
//! extraction stage: page count, images found per page, each image's
//! placement and the running total. Events are purely observational; no
//! later stage reads anything a callback does.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfimg::{ExtractedImage, ExtractionProgressCallback, RepageConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     images: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_image_extracted(&self, image: &ExtractedImage) {
//!         self.images.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {} image {}", image.page, image.index);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { images: AtomicUsize::new(0) });
//!
//! let config = RepageConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ExtractedImage;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it extracts and loads images.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline is sequential, but the trait is
/// `Send + Sync` so a config holding it can cross threads.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the source document is opened.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after an image has been written to the staging directory.
    fn on_image_extracted(&self, image: &ExtractedImage) {
        let _ = image;
    }

    /// Called once all images of a page have been staged.
    ///
    /// # Arguments
    /// * `page_num`    : 1-indexed page number
    /// * `total_pages` : pages in the source document
    /// * `image_count` : images found on this page
    fn on_page_complete(&self, page_num: usize, total_pages: usize, image_count: usize) {
        let _ = (page_num, total_pages, image_count);
    }

    /// Called once after the last page, with the document-wide image total.
    fn on_extraction_complete(&self, total_images: usize) {
        let _ = total_images;
    }

    /// Called when the decode stage skips a staged file whose extension is
    /// not `.jpg` or `.png`. Unreadable files are not skipped; they fail the
    /// run with `ImageDecode`.
    fn on_file_skipped(&self, path: &Path) {
        let _ = path;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RepageConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        pages: AtomicUsize,
        images: AtomicUsize,
        skipped: AtomicUsize,
        total: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_image_extracted(&self, _image: &ExtractedImage) {
            self.images.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_complete(&self, _page_num: usize, _total_pages: usize, _image_count: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }

        fn on_extraction_complete(&self, total_images: usize) {
            self.total.store(total_images, Ordering::SeqCst);
        }

        fn on_file_skipped(&self, _path: &Path) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn sample_image(page: usize, index: usize) -> ExtractedImage {
        ExtractedImage {
            page,
            index,
            ordinal: index + 1,
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
            pixel_width: 200,
            pixel_height: 100,
            staged_path: PathBuf::from(format!("p{page}_{index}.jpg")),
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(2);
        cb.on_image_extracted(&sample_image(1, 0));
        cb.on_page_complete(1, 2, 1);
        cb.on_extraction_complete(1);
        cb.on_file_skipped(Path::new("p1_0.gif"));
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_extraction_start(2);
        tracker.on_image_extracted(&sample_image(1, 0));
        tracker.on_image_extracted(&sample_image(1, 1));
        tracker.on_page_complete(1, 2, 2);
        tracker.on_page_complete(2, 2, 0);
        tracker.on_extraction_complete(2);
        tracker.on_file_skipped(Path::new("notes.txt"));

        assert_eq!(tracker.images.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.skipped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(10);
        cb.on_page_complete(1, 10, 0);
    }
}
