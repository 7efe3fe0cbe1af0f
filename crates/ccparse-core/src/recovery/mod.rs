//! Text recovery: turn a statement document into plain text.
//!
//! The embedded text layer is used when it carries enough text. Otherwise
//! the leading page images are run through a [`TextRecognizer`]. A failed
//! OCR pass is not fatal; the short text layer is kept and a warning is
//! recorded.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{OcrError, RecoveryError, Result};
use crate::models::config::RecoveryConfig;
use crate::ocr::TextRecognizer;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Where the recovered text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextSource {
    /// The document's embedded text layer.
    TextLayer,
    /// Optical character recognition of page images.
    Ocr,
}

impl std::fmt::Display for TextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextSource::TextLayer => write!(f, "text layer"),
            TextSource::Ocr => write!(f, "OCR"),
        }
    }
}

/// Text recovered from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredText {
    /// Text handed to field extraction.
    pub text: String,
    /// Per-page text, 1st page first.
    pub pages: Vec<String>,
    pub page_count: u32,
    pub source: TextSource,
    /// Non-fatal problems met along the way.
    pub warnings: Vec<String>,
}

/// Recovers text from PDFs and images.
#[derive(Debug, Clone, Default)]
pub struct TextRecovery {
    config: RecoveryConfig,
}

impl TextRecovery {
    pub fn new(config: RecoveryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Recover text from PDF bytes.
    pub fn recover(
        &self,
        pdf_bytes: &[u8],
        recognizer: Option<&dyn TextRecognizer>,
    ) -> Result<RecoveredText> {
        let extractor = PdfExtractor::from_bytes(pdf_bytes).map_err(|e| {
            warn!("Failed to load PDF: {}", e);
            RecoveryError::Unreadable(e.to_string())
        })?;
        self.recover_from(&extractor, recognizer)
    }

    /// Recover text from a loaded document.
    pub fn recover_from<P: PdfProcessor>(
        &self,
        pdf: &P,
        recognizer: Option<&dyn TextRecognizer>,
    ) -> Result<RecoveredText> {
        let page_count = pdf.page_count();
        let mut warnings = Vec::new();

        let text_layer = pdf.extract_text().unwrap_or_else(|e| {
            warn!("Text layer extraction failed: {}", e);
            warnings.push(format!("text layer could not be read: {}", e));
            String::new()
        });
        let mut pages: Vec<String> = (1..=page_count)
            .map(|page| pdf.extract_page_text(page).unwrap_or_default())
            .collect();

        let layer_len = text_layer.trim().chars().count();
        let short = layer_len < self.config.min_text_length;
        debug!(
            "Text layer has {} characters over {} pages (minimum {})",
            layer_len, page_count, self.config.min_text_length
        );

        if short || !self.config.prefer_text_layer {
            match recognizer {
                Some(recognizer) => match self.ocr_pages(pdf, recognizer) {
                    Ok(ocr_pages) if ocr_pages.iter().any(|t| !t.trim().is_empty()) => {
                        info!("Using OCR text from {} page(s)", ocr_pages.len());
                        let text = ocr_pages.join("\n");
                        for (slot, ocr_text) in pages.iter_mut().zip(ocr_pages) {
                            *slot = ocr_text;
                        }
                        return Ok(RecoveredText {
                            text,
                            pages,
                            page_count,
                            source: TextSource::Ocr,
                            warnings,
                        });
                    }
                    Ok(_) => warnings.push("OCR found no text".to_string()),
                    Err(e) => {
                        warn!("OCR failed, continuing with text layer: {}", e);
                        warnings.push(format!("OCR failed: {}", e));
                    }
                },
                None if short => {
                    warnings.push("text layer is short and OCR is unavailable".to_string())
                }
                None => {}
            }
        }

        if text_layer.trim().is_empty() {
            return Err(RecoveryError::Unreadable("no text found".to_string()).into());
        }

        Ok(RecoveredText {
            text: text_layer,
            pages,
            page_count,
            source: TextSource::TextLayer,
            warnings,
        })
    }

    /// Recover text from a scanned statement image.
    pub fn recover_image(
        &self,
        image: &DynamicImage,
        recognizer: &dyn TextRecognizer,
    ) -> Result<RecoveredText> {
        let text = recognizer.recognize(image)?;
        if text.trim().is_empty() {
            return Err(RecoveryError::Unreadable("no text found".to_string()).into());
        }
        Ok(RecoveredText {
            pages: vec![text.clone()],
            text,
            page_count: 1,
            source: TextSource::Ocr,
            warnings: Vec::new(),
        })
    }

    /// OCR the images of the leading pages, one text per page.
    fn ocr_pages<P: PdfProcessor>(
        &self,
        pdf: &P,
        recognizer: &dyn TextRecognizer,
    ) -> std::result::Result<Vec<String>, OcrError> {
        let last = self.config.max_ocr_pages.min(pdf.page_count());
        let mut texts = Vec::new();
        let mut found_image = false;

        for page in 1..=last {
            let images = pdf.page_images(page).unwrap_or_else(|e| {
                debug!("No images on page {}: {}", page, e);
                Vec::new()
            });
            found_image |= !images.is_empty();

            let page_text = images
                .iter()
                .map(|image| recognizer.recognize(image))
                .collect::<std::result::Result<Vec<_>, _>>()?
                .join("\n");
            texts.push(page_text);
        }

        if !found_image {
            return Err(OcrError::NoImages);
        }
        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CcparseError, PdfError};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct FakePdf {
        pages: Vec<&'static str>,
        images: bool,
    }

    impl PdfProcessor for FakePdf {
        fn load(&mut self, _data: &[u8]) -> crate::pdf::Result<()> {
            Ok(())
        }

        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn extract_text(&self) -> crate::pdf::Result<String> {
            Ok(self.pages.join("\n"))
        }

        fn extract_page_text(&self, page: u32) -> crate::pdf::Result<String> {
            self.pages
                .get(page as usize - 1)
                .map(|t| t.to_string())
                .ok_or(PdfError::InvalidPage(page))
        }

        fn page_images(&self, _page: u32) -> crate::pdf::Result<Vec<DynamicImage>> {
            if self.images {
                Ok(vec![DynamicImage::new_luma8(4, 4)])
            } else {
                Ok(Vec::new())
            }
        }
    }

    struct FakeRecognizer {
        output: std::result::Result<&'static str, &'static str>,
        calls: Cell<usize>,
    }

    impl FakeRecognizer {
        fn returning(text: &'static str) -> Self {
            Self {
                output: Ok(text),
                calls: Cell::new(0),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                output: Err(message),
                calls: Cell::new(0),
            }
        }
    }

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> std::result::Result<String, OcrError> {
            self.calls.set(self.calls.get() + 1);
            self.output
                .map(str::to_string)
                .map_err(|m| OcrError::Recognition(m.to_string()))
        }
    }

    const LONG_PAGE: &str = "Chase Account Number: ****1234 New Balance: $1,234.56 \
        Payment Due Date: 03/15/2024 Minimum Payment Due: $35.00 Credit Limit: $5,000";

    #[test]
    fn test_long_text_layer_skips_ocr() {
        let pdf = FakePdf { pages: vec![LONG_PAGE], images: true };
        let ocr = FakeRecognizer::returning("ocr text");

        let recovered = TextRecovery::default().recover_from(&pdf, Some(&ocr)).unwrap();

        assert_eq!(recovered.source, TextSource::TextLayer);
        assert_eq!(recovered.text, LONG_PAGE);
        assert_eq!(ocr.calls.get(), 0);
    }

    #[test]
    fn test_short_text_layer_uses_ocr() {
        let pdf = FakePdf { pages: vec!["Chase", "page two"], images: true };
        let ocr = FakeRecognizer::returning("New Balance: $10.00");

        let recovered = TextRecovery::default().recover_from(&pdf, Some(&ocr)).unwrap();

        assert_eq!(recovered.source, TextSource::Ocr);
        assert_eq!(recovered.text, "New Balance: $10.00");
        assert_eq!(recovered.pages, vec!["New Balance: $10.00", "page two"]);
        assert_eq!(recovered.page_count, 2);
        // Only the first page is OCR'd by default.
        assert_eq!(ocr.calls.get(), 1);
    }

    #[test]
    fn test_ocr_failure_keeps_short_text() {
        let pdf = FakePdf { pages: vec!["Chase"], images: true };
        let ocr = FakeRecognizer::failing("model crashed");

        let recovered = TextRecovery::default().recover_from(&pdf, Some(&ocr)).unwrap();

        assert_eq!(recovered.source, TextSource::TextLayer);
        assert_eq!(recovered.text, "Chase");
        assert_eq!(recovered.warnings.len(), 1);
        assert!(recovered.warnings[0].contains("model crashed"));
    }

    #[test]
    fn test_no_images_and_no_text_is_unreadable() {
        let pdf = FakePdf { pages: vec!["   "], images: false };
        let ocr = FakeRecognizer::returning("unused");

        let result = TextRecovery::default().recover_from(&pdf, Some(&ocr));

        assert!(matches!(
            result,
            Err(CcparseError::Recovery(RecoveryError::Unreadable(_)))
        ));
        assert_eq!(ocr.calls.get(), 0);
    }

    #[test]
    fn test_short_text_without_recognizer_warns() {
        let pdf = FakePdf { pages: vec!["Chase"], images: true };

        let recovered = TextRecovery::default().recover_from(&pdf, None).unwrap();

        assert_eq!(recovered.text, "Chase");
        assert_eq!(recovered.warnings, vec!["text layer is short and OCR is unavailable"]);
    }

    #[test]
    fn test_ocr_forced_when_text_layer_not_preferred() {
        let config = RecoveryConfig {
            prefer_text_layer: false,
            max_ocr_pages: 2,
            ..RecoveryConfig::default()
        };
        let pdf = FakePdf { pages: vec![LONG_PAGE, LONG_PAGE], images: true };
        let ocr = FakeRecognizer::returning("scanned");

        let recovered = TextRecovery::new(config).recover_from(&pdf, Some(&ocr)).unwrap();

        assert_eq!(recovered.source, TextSource::Ocr);
        assert_eq!(recovered.text, "scanned\nscanned");
        assert_eq!(ocr.calls.get(), 2);
    }

    #[test]
    fn test_invalid_pdf_bytes_are_unreadable() {
        let result = TextRecovery::default().recover(b"%PDF-garbage", None);
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("could not read document"));
    }

    #[test]
    fn test_recover_image() {
        let image = DynamicImage::new_rgb8(8, 8);
        let recovery = TextRecovery::default();

        let recovered = recovery
            .recover_image(&image, &FakeRecognizer::returning("Amex"))
            .unwrap();
        assert_eq!(recovered.source, TextSource::Ocr);
        assert_eq!(recovered.pages, vec!["Amex"]);

        let blank = recovery.recover_image(&image, &FakeRecognizer::returning("  "));
        assert!(matches!(
            blank,
            Err(CcparseError::Recovery(RecoveryError::Unreadable(_)))
        ));

        let failed = recovery.recover_image(&image, &FakeRecognizer::failing("boom"));
        assert!(matches!(failed, Err(CcparseError::Ocr(_))));
    }
}
