//! PDF text layer and page image access.

mod extractor;

pub use extractor::{PdfExtractor, PdfPage};

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF readers feeding text recovery.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the text layer of the whole document.
    fn extract_text(&self) -> Result<String>;

    /// Extract the text layer of one page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract the embedded images of one page (1-indexed).
    fn page_images(&self, page: u32) -> Result<Vec<DynamicImage>>;
}
