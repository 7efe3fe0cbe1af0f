//! WASM bindings for credit card statement parsing.
//!
//! Text comes from the page (pdf.js text layer or a browser-side OCR pass);
//! records go back as plain objects with `null` for missing fields.

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

use ccparse_core::ocr::{OcrResult, TextBox};
use ccparse_core::{StatementExtractor as _, StatementParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract a statement record from text.
#[wasm_bindgen]
pub fn extract(
    text: &str,
    file_name: Option<String>,
    file_size: Option<String>,
) -> Result<JsValue, JsValue> {
    to_js(&ccparse_core::extract(
        text,
        file_name.as_deref(),
        file_size.as_deref(),
    ))
}

/// Registry key of the issuer detected in `text` (e.g. `"capitalOne"`).
#[wasm_bindgen]
pub fn detect_issuer(text: &str) -> String {
    ccparse_core::detect_issuer(text).key().to_string()
}

/// File size as reported alongside a record (`"12.34 KB"`).
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    ccparse_core::format_file_size(bytes.max(0.0) as u64)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractionSummary {
    record: ccparse_core::ExtractedRecord,
    issuer: &'static str,
    issuer_matches: usize,
    used_fallback: bool,
    fallback_fields: Vec<&'static str>,
    warnings: Vec<String>,
}

/// Statement extractor class for browser use.
#[wasm_bindgen]
pub struct StatementExtractor {
    parser: StatementParser,
}

#[wasm_bindgen]
impl StatementExtractor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: StatementParser::new(),
        }
    }

    /// Issuer-rule match count below which generic rules are also applied.
    #[wasm_bindgen]
    pub fn set_fallback_threshold(&mut self, threshold: usize) {
        self.parser = StatementParser::new().with_fallback_threshold(threshold);
    }

    #[wasm_bindgen]
    pub fn extract(
        &self,
        text: &str,
        file_name: Option<String>,
        file_size: Option<String>,
    ) -> Result<JsValue, JsValue> {
        to_js(&self.parser.extract(
            text,
            file_name.as_deref(),
            file_size.as_deref(),
        ))
    }

    /// Extract with the issuer, fallback decision and validation warnings.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);
        to_js(&ExtractionSummary {
            issuer: result.issuer.key(),
            issuer_matches: result.issuer_matches,
            used_fallback: result.used_fallback,
            fallback_fields: result.fallback_fields.iter().map(|f| f.key()).collect(),
            warnings: result.warnings,
            record: result.record,
        })
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Boxes from a browser-side OCR pass, collected for extraction.
#[wasm_bindgen]
pub struct OcrResultJs {
    boxes: Vec<TextBox>,
}

#[wasm_bindgen]
impl OcrResultJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Add a recognized box given its four corners.
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen]
    pub fn add_box(
        &mut self,
        text: &str,
        x1: f32, y1: f32,
        x2: f32, y2: f32,
        x3: f32, y3: f32,
        x4: f32, y4: f32,
        confidence: f32,
    ) {
        self.boxes.push(TextBox {
            bbox: [x1, y1, x2, y2, x3, y3, x4, y4],
            text: text.to_string(),
            confidence,
        });
    }

    /// Text in reading order, one line per row of boxes.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        OcrResult::from_boxes(self.boxes.clone(), (0, 0), 0).text
    }

    /// Extract a statement record from the collected boxes.
    #[wasm_bindgen]
    pub fn extract_statement(
        &self,
        file_name: Option<String>,
        file_size: Option<String>,
    ) -> Result<JsValue, JsValue> {
        extract(&self.get_text(), file_name, file_size)
    }
}

impl Default for OcrResultJs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_detect_issuer_key() {
        assert_eq!(detect_issuer("Your Capital One statement"), "capitalOne");
        assert_eq!(detect_issuer("nothing here"), "generic");
    }

    #[wasm_bindgen_test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(2048.0), "2.00 KB");
    }

    #[wasm_bindgen_test]
    fn test_ocr_boxes_join_into_lines() {
        let mut result = OcrResultJs::new();
        result.add_box("$1,234.56", 200.0, 40.0, 260.0, 40.0, 260.0, 50.0, 200.0, 50.0, 0.9);
        result.add_box("New Balance:", 10.0, 40.0, 90.0, 40.0, 90.0, 50.0, 10.0, 50.0, 0.9);
        result.add_box("Chase", 10.0, 0.0, 60.0, 0.0, 60.0, 10.0, 10.0, 10.0, 0.9);
        assert_eq!(result.get_text(), "Chase\nNew Balance: $1,234.56");
    }

    #[wasm_bindgen_test]
    fn test_extract_returns_object() {
        let value = extract("Chase\nNew Balance: $10.00", Some("a.pdf".into()), None).unwrap();
        assert!(value.is_object());
    }
}
