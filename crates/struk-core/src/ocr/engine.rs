//! Recognition engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{OcrOutput, ProgressCallback, TextRegion};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX
/// Runtime). The latin recognition model covers mixed
/// Indonesian+English receipt text.
pub struct LocalOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: OcrConfig,
}

impl LocalOcrEngine {
    /// Create an engine from the model files named in the config.
    pub fn from_dir(model_dir: &Path, config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = model_dir.join(&config.detection_model);
        let rec_path = model_dir.join(&config.recognition_model);
        let dict_path = model_dir.join(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine, config })
    }

    /// Recognize text in an image, reporting progress as regions are
    /// collected.
    ///
    /// The callback sees integer percentages, monotonically
    /// non-decreasing from 0 to 100. `pure-onnx-ocr` exposes no mid-run
    /// hook, so the per-region fractions are only reported once
    /// `run_from_image` has returned; most of the wall time passes
    /// between the 0 and the first per-region report.
    pub fn recognize(
        &self,
        image: &DynamicImage,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<OcrOutput, OcrError> {
        let start = Instant::now();

        let image = self.bounded(image);
        let (width, height) = image.dimensions();
        info!("Recognizing image: {}x{}", width, height);

        let mut last_reported = 0u8;
        let mut report = |percent: u8| {
            if let Some(cb) = progress {
                if percent >= last_reported {
                    cb(percent);
                    last_reported = percent;
                }
            }
        };

        report(0);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let total = results.len();
        let mut regions = Vec::with_capacity(total);
        for (i, r) in results.iter().enumerate() {
            if r.confidence >= self.config.recognition_threshold {
                regions.push(TextRegion {
                    bbox: polygon_to_bbox(&r.bounding_box),
                    text: r.text.replace("[UNK]", " "),
                    score: r.confidence,
                });
            }
            report((((i + 1) * 100) / total) as u8);
        }
        report(100);

        let confidence = if regions.is_empty() {
            0.0
        } else {
            let mean: f32 =
                regions.iter().map(|r| r.score).sum::<f32>() / regions.len() as f32;
            (mean * 100.0).clamp(0.0, 100.0)
        };

        let mut output = OcrOutput {
            regions,
            text: String::new(),
            confidence,
            processing_time_ms: start.elapsed().as_millis() as u64,
            image_size: (width, height),
        };
        output.sort_by_reading_order();

        info!(
            "OCR complete: {} regions in {}ms",
            output.regions.len(),
            output.processing_time_ms
        );

        Ok(output)
    }

    /// Downscale oversized images so the longer side fits the
    /// configured maximum.
    fn bounded(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let max = self.config.max_image_size;
        if max == 0 || width.max(height) <= max {
            image.clone()
        } else {
            debug!("Downscaling {}x{} to fit {}", width, height, max);
            image.resize(max, max, image::imageops::FilterType::Triangle)
        }
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
