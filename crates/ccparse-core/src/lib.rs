//! Core library for credit card statement parsing.
//!
//! This crate provides:
//! - Issuer detection and per-issuer field rules for US card statements
//! - Field extraction with a generic fallback and derived fields
//! - Text recovery from PDFs (text layer, then OCR of page images)
//! - Record consistency checks

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod recovery;
pub mod statement;

pub use error::{CcparseError, Result};
pub use models::config::CcparseConfig;
pub use models::record::{format_file_size, ExtractedRecord, Field};
pub use ocr::{OcrResult, TextBox, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{PdfExtractor, PdfProcessor};
pub use recovery::{RecoveredText, TextRecovery, TextSource};
pub use statement::{
    detect_issuer, extract, ExtractionResult, IssuerTag, StatementExtractor, StatementParser,
    DEFAULT_FALLBACK_THRESHOLD,
};
