//! Pipeline stages for PDF image re-paging.
//!
//! Each submodule implements exactly one step; the orchestration lives in
//! [`crate::convert`].
//!
//! ## Data Flow
//!
//! ```text
//! library ──▶ input ──▶ staging ──▶ extract ──▶ decode ──▶ compose
//! (pdfium)   (path)    (tempdir)   (JPEG q100)  (image)    (pdfium)
//! ```
//!
//! 1. [`library`] : bind the pdfium shared library; the startup gate
//! 2. [`input`]   : check the input exists and starts with `%PDF`
//! 3. [`staging`] : private temp directory, file naming and listing
//! 4. [`extract`] : write each embedded image as `p<page>_<index>.jpg`
//! 5. [`decode`]  : read staged `.jpg`/`.png` files back into rasters
//! 6. [`compose`] : one page per image, scaled to the usable page width
//!
//! Everything runs sequentially on the calling thread.

pub mod compose;
pub mod decode;
pub mod extract;
pub mod input;
pub mod library;
pub mod staging;
