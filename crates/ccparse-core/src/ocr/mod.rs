//! Image text recognition for statements without a usable text layer.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Vertical distance (pixels) within which boxes count as the same line.
const ROW_HEIGHT: f32 = 20.0;

/// Recognizes text in a page image.
pub trait TextRecognizer {
    /// Recognize all text in `image`, lines separated by `\n`.
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// A recognized text box with its quadrilateral coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Corners as (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    pub text: String,

    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Axis-aligned bounding rectangle as (min_x, min_y, max_x, max_y).
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }

    fn row(&self) -> i32 {
        (self.rect().1 / ROW_HEIGHT) as i32
    }
}

/// Result of OCR on one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Boxes in reading order.
    pub boxes: Vec<TextBox>,

    /// Boxes on the same row joined by spaces, rows joined by newlines.
    pub text: String,

    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Build a result from unordered boxes.
    pub fn from_boxes(
        mut boxes: Vec<TextBox>,
        image_size: (u32, u32),
        processing_time_ms: u64,
    ) -> Self {
        sort_by_reading_order(&mut boxes);
        let text = join_rows(&boxes);
        Self {
            boxes,
            text,
            processing_time_ms,
            image_size,
        }
    }
}

/// Sort boxes top-to-bottom, then left-to-right within a row.
pub fn sort_by_reading_order(boxes: &mut [TextBox]) {
    boxes.sort_by(|a, b| {
        a.row().cmp(&b.row()).then_with(|| {
            a.rect()
                .0
                .partial_cmp(&b.rect().0)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });
}

/// Join sorted boxes into lines.
///
/// Statement labels and their values are often separate boxes on one row;
/// keeping them on one line lets the field rules see `Label: value`.
fn join_rows(boxes: &[TextBox]) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current_row = None;

    for text_box in boxes.iter().filter(|b| !b.text.trim().is_empty()) {
        let row = text_box.row();
        match lines.last_mut() {
            Some(line) if current_row == Some(row) => {
                line.push(' ');
                line.push_str(text_box.text.trim());
            }
            _ => lines.push(text_box.text.trim().to_string()),
        }
        current_row = Some(row);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_rect() {
        assert_eq!(text_box("a", 10.0, 5.0).rect(), (10.0, 5.0, 60.0, 15.0));
    }

    #[test]
    fn test_reading_order_and_row_joining() {
        let boxes = vec![
            text_box("$1,234.56", 200.0, 42.0),
            text_box("Chase", 10.0, 2.0),
            text_box("New Balance:", 10.0, 45.0),
            text_box("  ", 300.0, 45.0),
        ];
        let result = OcrResult::from_boxes(boxes, (640, 480), 7);

        assert_eq!(result.boxes[0].text, "Chase");
        assert_eq!(result.text, "Chase\nNew Balance: $1,234.56");
        assert_eq!(result.image_size, (640, 480));
    }

    #[test]
    fn test_empty_boxes_give_empty_text() {
        let result = OcrResult::from_boxes(Vec::new(), (1, 1), 0);
        assert!(result.text.is_empty());
    }
}
