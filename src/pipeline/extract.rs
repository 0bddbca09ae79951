//! Image extraction: stage every embedded raster image as a JPEG.
//!
//! Pages are walked in document order (1-indexed) and each page's image
//! objects in the order pdfium reports them. Every image is pulled out as
//! a raw raster (no soft mask or page transform applied), flattened to RGB
//! and written at JPEG quality 100 to `p<page>_<index>.jpg` in the staging
//! area.
//!
//! Only image objects at the top level of a page's object list are visited;
//! images nested inside form XObjects are not extracted.
//!
//! There is no partial-failure tolerance: the first image that cannot be
//! extracted or written aborts the whole stage.

use crate::config::RepageConfig;
use crate::error::PdfImgError;
use crate::output::{ExtractedImage, ExtractionReport};
use crate::pipeline::staging::StagingArea;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use pdfium_render::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// JPEG quality used for staged files.
pub const STAGING_JPEG_QUALITY: u8 = 100;

/// Extract all images of `pdf_path` into `staging`.
pub fn extract_to_staging(
    pdfium: &Pdfium,
    pdf_path: &Path,
    staging: &StagingArea,
    config: &RepageConfig,
) -> Result<ExtractionReport, PdfImgError> {
    let document = open_document(pdfium, pdf_path, config.password.as_deref())?;
    walk_images(&document, pdf_path, config, |page, index, raw| {
        let path = staging.file_for(page, index);
        write_staged_jpeg(raw, &path)?;
        Ok(path)
    })
}

/// Enumerate image placements without writing anything.
pub fn enumerate_images(
    pdfium: &Pdfium,
    pdf_path: &Path,
    config: &RepageConfig,
) -> Result<ExtractionReport, PdfImgError> {
    let document = open_document(pdfium, pdf_path, config.password.as_deref())?;
    walk_images(&document, pdf_path, config, |_, _, _| Ok(PathBuf::new()))
}

/// Open a PDF, mapping pdfium's failures onto the document-open errors.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfImgError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfImgError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfImgError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfImgError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Visit every image object, handing its raster to `sink`, which returns the
/// path the image was staged at.
fn walk_images<F>(
    document: &PdfDocument<'_>,
    pdf_path: &Path,
    config: &RepageConfig,
    mut sink: F,
) -> Result<ExtractionReport, PdfImgError>
where
    F: FnMut(usize, usize, &DynamicImage) -> Result<PathBuf, PdfImgError>,
{
    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF Num Pages: {}", total_pages);
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total_pages);
    }

    let mut report = ExtractionReport {
        page_count: total_pages,
        images: Vec::new(),
    };

    for idx in 0..total_pages {
        let page_num = idx + 1;
        let page = pages
            .get(idx as u16)
            .map_err(|e| PdfImgError::PageUnreadable {
                path: pdf_path.to_path_buf(),
                page: page_num,
                detail: format!("{:?}", e),
            })?;

        let mut on_page = 0;
        for object in page.objects().iter() {
            let Some(image_object) = object.as_image_object() else {
                continue;
            };
            let index = on_page;
            on_page += 1;

            let extraction_err = |detail: String| PdfImgError::ImageExtraction {
                page: page_num,
                index,
                detail,
            };
            let bounds = object
                .bounds()
                .map_err(|e| extraction_err(format!("no bounds: {:?}", e)))?;
            let raw = image_object
                .get_raw_image()
                .map_err(|e| extraction_err(format!("{:?}", e)))?;

            let staged_path = sink(page_num, index, &raw)?;
            let (pixel_width, pixel_height) = raw.dimensions();
            let record = ExtractedImage {
                page: page_num,
                index,
                ordinal: report.images.len() + 1,
                x: bounds.left().value,
                y: bounds.bottom().value,
                width: bounds.width().value,
                height: bounds.height().value,
                pixel_width,
                pixel_height,
                staged_path,
            };
            info!(
                "Image {} - X: {:.2} Y: {:.2}, Width: {:.2}, Height: {:.2}",
                record.ordinal, record.x, record.y, record.width, record.height
            );
            if let Some(ref cb) = config.progress_callback {
                cb.on_image_extracted(&record);
            }
            report.images.push(record);
        }

        log_page_summary(page_num, on_page);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(page_num, total_pages, on_page);
        }
    }

    info!("Total: {} images", report.images.len());
    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(report.images.len());
    }
    Ok(report)
}

fn log_page_summary(page_num: usize, image_count: usize) {
    info!("Page {}: {} images", page_num, image_count);
}

/// Write `image` to `path` as an RGB JPEG at [`STAGING_JPEG_QUALITY`].
///
/// JPEG has no alpha channel, so RGBA and grey+alpha rasters are flattened
/// by dropping alpha.
pub fn write_staged_jpeg(image: &DynamicImage, path: &Path) -> Result<(), PdfImgError> {
    let write_err = |detail: String| PdfImgError::ImageWrite {
        path: path.to_path_buf(),
        detail,
    };

    let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(
        &mut writer,
        STAGING_JPEG_QUALITY,
    ))
    .map_err(|e| write_err(e.to_string()))?;
    writer.flush().map_err(|e| write_err(e.to_string()))?;

    debug!("Staged {}x{} image → {}", rgb.width(), rgb.height(), path.display());
    Ok(())
}
