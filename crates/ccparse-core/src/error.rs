//! Error types for the ccparse-core library.
//!
//! Field extraction itself never fails; these errors come from reading
//! documents and recognizing text in them.

use thiserror::Error;

/// Main error type for the ccparse library.
#[derive(Error, Debug)]
pub enum CcparseError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Text recovery error.
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// No images to recognize.
    #[error("no images found")]
    NoImages,
}

/// Errors surfaced to the user when a document yields no text.
#[derive(Error, Debug)]
pub enum RecoveryError {
    /// Neither the text layer nor OCR produced any text.
    #[error("could not read document: {0}")]
    Unreadable(String),
}

/// Result type for the ccparse library.
pub type Result<T> = std::result::Result<T, CcparseError>;
