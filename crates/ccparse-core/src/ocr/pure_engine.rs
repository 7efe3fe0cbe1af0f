//! OCR engine backed by `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::{OcrResult, TextBox, TextRecognizer};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Pure Rust OCR engine (no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    keep_unknown: bool,
}

impl PureOcrEngine {
    /// Create an engine from the model directory named in `config`.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        Self::from_dir(&config.model_dir, config)
    }

    /// Create an engine from model files in `model_dir`, using the file names in `config`.
    pub fn from_dir(model_dir: &Path, config: &OcrConfig) -> Result<Self, OcrError> {
        if !config.models_present(model_dir) {
            return Err(OcrError::ModelLoad(format!(
                "models not found in {}",
                model_dir.display()
            )));
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&model_dir.join(&config.detection_model))
            .rec_model_path(&model_dir.join(&config.recognition_model))
            .dictionary_path(&model_dir.join(&config.dictionary))
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine,
            keep_unknown: config.keep_unknown,
        })
    }

    /// Run OCR and return boxes in reading order.
    pub fn process(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        debug!("Running OCR on {}x{} image", width, height);

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let boxes = results
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: if self.keep_unknown {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                },
                confidence: r.confidence,
            })
            .collect();

        let elapsed = start.elapsed().as_millis() as u64;
        let result = OcrResult::from_boxes(boxes, (width, height), elapsed);
        info!(
            "OCR complete: {} text boxes in {}ms",
            result.boxes.len(),
            elapsed
        );
        Ok(result)
    }
}

impl TextRecognizer for PureOcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        Ok(self.process(image)?.text)
    }
}

/// First four exterior points of the polygon as `[x1, y1, ..., x4, y4]`.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_models_fail_to_load() {
        let dir = std::env::temp_dir().join("ccparse-no-models");
        let result = PureOcrEngine::from_dir(&dir, &OcrConfig::default());
        assert!(matches!(result, Err(OcrError::ModelLoad(_))));
    }
}
