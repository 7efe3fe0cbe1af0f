//! Configuration structures for recovery and extraction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::statement::DEFAULT_FALLBACK_THRESHOLD;

/// Main configuration for the ccparse pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CcparseConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Text recovery configuration.
    pub recovery: RecoveryConfig,

    /// OCR model configuration.
    pub ocr: OcrConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Issuer-rule match count below which the generic rules are also run.
    pub fallback_threshold: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fallback_threshold: DEFAULT_FALLBACK_THRESHOLD,
        }
    }
}

/// Text recovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Minimum text-layer length before OCR is attempted.
    pub min_text_length: usize,

    /// Number of leading pages to OCR when the text layer is too short.
    pub max_ocr_pages: u32,

    /// Use the embedded text layer when it is long enough.
    pub prefer_text_layer: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            min_text_length: 100,
            max_ocr_pages: 1,
            prefer_text_layer: true,
        }
    }
}

/// OCR model files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unknown: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unknown: false,
        }
    }
}

impl OcrConfig {
    /// Whether the detection and recognition models exist in `dir`.
    pub fn models_present(&self, dir: &std::path::Path) -> bool {
        dir.join(&self.detection_model).exists() && dir.join(&self.recognition_model).exists()
    }
}

impl CcparseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CcparseConfig::default();
        assert_eq!(config.extraction.fallback_threshold, 3);
        assert_eq!(config.recovery.min_text_length, 100);
        assert_eq!(config.recovery.max_ocr_pages, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CcparseConfig =
            serde_json::from_str(r#"{"extraction": {"fallback_threshold": 5}}"#).unwrap();
        assert_eq!(config.extraction.fallback_threshold, 5);
        assert_eq!(config.ocr.detection_model, "det.onnx");
    }
}
