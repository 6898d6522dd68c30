//! Local OCR adapter: image in, recognized text plus confidence out.

mod engine;

pub use engine::LocalOcrEngine;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::OcrError;
use crate::models::receipt::{ReceiptData, ReceiptImage};
use crate::pipeline::OcrExtractor;
use crate::receipt::ReceiptParser;

/// Progress observer for a recognition run. Receives an integer
/// percentage 0-100, monotonically non-decreasing.
pub type ProgressCallback<'a> = &'a (dyn Fn(u8) + Send + Sync);

/// A recognized text region with its quadrilateral bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRegion {
    /// Corner coordinates (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Engine confidence for this region (0.0 - 1.0).
    pub score: f32,
}

impl TextRegion {
    /// Axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of one recognition run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Recognized regions in reading order.
    pub regions: Vec<TextRegion>,

    /// Full text (regions joined with newlines).
    pub text: String,

    /// Engine confidence on the 0-100 scale (mean region score).
    pub confidence: f32,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrOutput {
    /// Sort regions by reading order (top-to-bottom, left-to-right)
    /// and rebuild the joined text.
    pub fn sort_by_reading_order(&mut self) {
        self.regions.sort_by(|a, b| {
            let (_, ay, _, _) = a.rect();
            let (_, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                let (ax, _, _, _) = a.rect();
                let (bx, _, _, _) = b.rect();
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        self.text = self
            .regions
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
    }
}

/// OCR-based receipt extraction: recognize text locally, then run the
/// pattern parser over it. This is the offline fallback strategy.
pub struct LocalOcrExtractor {
    engine: LocalOcrEngine,
    parser: ReceiptParser,
}

impl LocalOcrExtractor {
    pub fn new(engine: LocalOcrEngine, parser: ReceiptParser) -> Self {
        Self { engine, parser }
    }
}

impl OcrExtractor for LocalOcrExtractor {
    fn extract(
        &self,
        image: &ReceiptImage,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<ReceiptData, OcrError> {
        let decoded = image
            .decode()
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let output = self.engine.recognize(&decoded, progress)?;
        debug!(
            "OCR produced {} chars at {:.1}% confidence",
            output.text.len(),
            output.confidence
        );

        Ok(self.parser.parse(&output.text, output.confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn region(text: &str, x: f32, y: f32) -> TextRegion {
        TextRegion {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_reading_order_sort() {
        let mut output = OcrOutput {
            regions: vec![
                region("Rp 15.000", 120.0, 80.0),
                region("TOKO MAJU", 10.0, 5.0),
                region("Total", 10.0, 82.0),
            ],
            text: String::new(),
            confidence: 90.0,
            processing_time_ms: 0,
            image_size: (200, 100),
        };

        output.sort_by_reading_order();
        assert_eq!(output.text, "TOKO MAJU\nTotal\nRp 15.000");
    }
}
