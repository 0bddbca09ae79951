//! Page composition: one output page per decoded image.
//!
//! Every page is US Letter portrait. Each image is scaled uniformly so its
//! width equals the usable width (page width minus [`MARGIN`] on both
//! sides) and is placed with its top-left corner [`MARGIN`] points from the
//! page's top-left corner. Tall images are not shrunk to fit the page
//! height; whatever exceeds it is clipped by the page box.
//!
//! PDF user space has its origin at the bottom-left, so the top-left
//! placement is converted with [`Placement::pdf_origin`] before drawing.

use crate::error::PdfImgError;
use crate::pipeline::decode::DecodedImage;
use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

/// Margin on every side of the image, in points.
pub const MARGIN: f32 = 10.0;

/// US Letter width in points.
pub const PAGE_WIDTH: f32 = 612.0;

/// US Letter height in points.
pub const PAGE_HEIGHT: f32 = 792.0;

/// Where and how large an image is drawn, in points, measured from the
/// page's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Scale a `pixel_width × pixel_height` image to the usable width of a
    /// `page_width` page, keeping its aspect ratio.
    pub fn fit_to_width(page_width: f32, margin: f32, pixel_width: u32, pixel_height: u32) -> Self {
        let width = page_width - 2.0 * margin;
        let scale = width / pixel_width.max(1) as f32;
        Self {
            left: margin,
            top: margin,
            width,
            height: pixel_height as f32 * scale,
        }
    }

    /// Bottom-left corner of the placed image in PDF user space.
    pub fn pdf_origin(&self, page_height: f32) -> (f32, f32) {
        (self.left, page_height - self.top - self.height)
    }
}

/// Build a new PDF with one page per image and serialise it.
///
/// An empty `images` slice yields a valid document with zero pages.
pub fn compose_document(pdfium: &Pdfium, images: &[DecodedImage]) -> Result<Vec<u8>, PdfImgError> {
    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| PdfImgError::Composition {
            page: 0,
            detail: format!("cannot create document: {:?}", e),
        })?;

    if images.is_empty() {
        warn!("No images to compose; writing a document with zero pages");
    }

    for (i, decoded) in images.iter().enumerate() {
        let page_num = i + 1;
        let composition_err = |detail: String| PdfImgError::Composition {
            page: page_num,
            detail,
        };

        let mut page = document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::from_points(
                PdfPoints::new(PAGE_WIDTH),
                PdfPoints::new(PAGE_HEIGHT),
            ))
            .map_err(|e| composition_err(format!("cannot create page: {:?}", e)))?;

        let placement = Placement::fit_to_width(
            page.width().value,
            MARGIN,
            decoded.width(),
            decoded.height(),
        );
        let (x, y) = placement.pdf_origin(page.height().value);

        let mut object = PdfPageImageObject::new_with_width(
            &document,
            &decoded.image,
            PdfPoints::new(placement.width),
        )
        .map_err(|e| composition_err(format!("cannot register image: {:?}", e)))?;

        object
            .translate(PdfPoints::new(x), PdfPoints::new(y))
            .map_err(|e| composition_err(format!("cannot position image: {:?}", e)))?;

        page.objects_mut()
            .add_image_object(object)
            .map_err(|e| composition_err(format!("cannot draw image: {:?}", e)))?;

        debug!(
            "Page {}: {} ({}x{} px) → {:.2}x{:.2} pt at ({:.2}, {:.2})",
            page_num,
            decoded.source.display(),
            decoded.width(),
            decoded.height(),
            placement.width,
            placement.height,
            placement.left,
            placement.top
        );
    }

    let bytes = document
        .save_to_bytes()
        .map_err(|e| PdfImgError::Serialization(format!("{:?}", e)))?;

    info!("Composed {} pages ({} bytes)", images.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn usable_width_is_page_minus_margins() {
        let p = Placement::fit_to_width(PAGE_WIDTH, MARGIN, 1000, 500);
        assert!(approx(p.width, PAGE_WIDTH - 20.0));
        assert_eq!((p.left, p.top), (10.0, 10.0));
    }

    #[test]
    fn height_keeps_aspect_ratio() {
        // H * (U / W)
        let p = Placement::fit_to_width(612.0, 10.0, 296, 444);
        assert!(approx(p.width, 592.0));
        assert!(approx(p.height, 444.0 * (592.0 / 296.0)));
    }

    #[test]
    fn small_images_are_scaled_up() {
        let p = Placement::fit_to_width(612.0, 10.0, 16, 8);
        assert!(approx(p.width, 592.0));
        assert!(approx(p.height, 296.0));
    }

    #[test]
    fn origin_is_flipped_to_bottom_left() {
        let p = Placement::fit_to_width(612.0, 10.0, 592, 100);
        let (x, y) = p.pdf_origin(792.0);
        assert!(approx(x, 10.0));
        assert!(approx(y, 792.0 - 10.0 - 100.0));
    }

    #[test]
    fn zero_width_image_does_not_divide_by_zero() {
        let p = Placement::fit_to_width(612.0, 10.0, 0, 10);
        assert!(p.height.is_finite());
    }
}
