//! Extraction pipeline: AI vision first, local OCR as fallback.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{OcrError, StrukError, VisionError};
use crate::models::receipt::{ReceiptData, ReceiptImage};
use crate::ocr::ProgressCallback;

/// Which strategy produced a successful extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Ai,
    Ocr,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Ai => f.write_str("ai"),
            Strategy::Ocr => f.write_str("ocr"),
        }
    }
}

/// A successful extraction and the strategy that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub receipt: ReceiptData,
    pub strategy: Strategy,
}

/// Primary strategy: structured extraction from a vision model.
pub trait VisionExtractor {
    fn extract(
        &self,
        image: &ReceiptImage,
    ) -> impl Future<Output = Result<ReceiptData, VisionError>> + Send;
}

/// Fallback strategy: local recognition plus pattern parsing. Fully
/// offline; the only strategy that reports incremental progress.
pub trait OcrExtractor {
    fn extract(
        &self,
        image: &ReceiptImage,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<ReceiptData, OcrError>;
}

/// Single entry point for receipt extraction.
///
/// Per invocation: try the vision extractor; on any vision failure run
/// the OCR extractor once. Strategies run sequentially, never
/// concurrently, and no state is kept between invocations. An OCR
/// failure after a vision failure is surfaced to the caller as-is.
pub struct ReceiptPipeline<V, O> {
    vision: V,
    ocr: O,
}

impl<V: VisionExtractor, O: OcrExtractor> ReceiptPipeline<V, O> {
    pub fn new(vision: V, ocr: O) -> Self {
        Self { vision, ocr }
    }

    /// Extract a structured record from one receipt image.
    ///
    /// `progress` is only surfaced during the OCR fallback; the vision
    /// call has no intermediate progress signal.
    pub async fn extract(
        &self,
        image: &ReceiptImage,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<ScanResult, StrukError> {
        info!("Extracting receipt ({} byte image)", image.bytes.len());

        match self.vision.extract(image).await {
            Ok(receipt) => {
                debug!("Vision strategy succeeded");
                Ok(ScanResult {
                    receipt,
                    strategy: Strategy::Ai,
                })
            }
            Err(e) => {
                warn!("Vision extraction failed, falling back to local OCR: {}", e);
                let receipt = self.ocr.extract(image, progress)?;
                Ok(ScanResult {
                    receipt,
                    strategy: Strategy::Ocr,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::ImageMime;
    use crate::receipt::ReceiptParser;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const OCR_TEXT: &str = "TOKO MAJU\n12/05/24\nTotal: Rp 10.000\n";

    fn sample_image() -> ReceiptImage {
        ReceiptImage::new(vec![0xFF, 0xD8, 0xFF], ImageMime::Jpeg)
    }

    /// Vision double with a scripted outcome and a call counter.
    struct FakeVision {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeVision {
        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn succeeding() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl VisionExtractor for FakeVision {
        async fn extract(&self, _image: &ReceiptImage) -> Result<ReceiptData, VisionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(VisionError::EmptyResponse)
            } else {
                Ok(ReceiptData {
                    store_name: Some("Alfamart".to_string()),
                    date: None,
                    total: Some(55000),
                    items: Vec::new(),
                    raw_text: "{}".to_string(),
                    confidence: crate::vision::AI_CONFIDENCE,
                })
            }
        }
    }

    /// OCR double that parses a fixed text dump, counting calls and
    /// replaying a progress sequence.
    struct FakeOcr {
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeOcr {
        fn new() -> Self {
            Self {
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl OcrExtractor for FakeOcr {
        fn extract(
            &self,
            _image: &ReceiptImage,
            progress: Option<ProgressCallback<'_>>,
        ) -> Result<ReceiptData, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(OcrError::Recognition("engine crashed".to_string()));
            }
            if let Some(cb) = progress {
                for p in [0, 40, 80, 100] {
                    cb(p);
                }
            }
            Ok(ReceiptParser::new().parse(OCR_TEXT, 81.5))
        }
    }

    #[tokio::test]
    async fn test_ai_success_short_circuits_ocr() {
        let vision = FakeVision::succeeding();
        let ocr = FakeOcr::new();
        let pipeline = ReceiptPipeline::new(vision, ocr);

        let result = pipeline.extract(&sample_image(), None).await.unwrap();
        assert_eq!(result.strategy, Strategy::Ai);
        assert_eq!(result.receipt.confidence, 95.0);
        assert_eq!(pipeline.vision.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_vision_failure_falls_back_to_ocr() {
        let pipeline = ReceiptPipeline::new(FakeVision::failing(), FakeOcr::new());

        let result = pipeline.extract(&sample_image(), None).await.unwrap();
        assert_eq!(result.strategy, Strategy::Ocr);

        // The fallback record matches what the parser alone produces.
        let expected = ReceiptParser::new().parse(OCR_TEXT, 81.5);
        assert_eq!(result.receipt.store_name, expected.store_name);
        assert_eq!(result.receipt.date, expected.date);
        assert_eq!(result.receipt.total, expected.total);
        assert_eq!(result.receipt.confidence, expected.confidence);
        assert_eq!(pipeline.vision.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pipeline.ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_strategies_failing_surfaces_ocr_error() {
        let pipeline = ReceiptPipeline::new(FakeVision::failing(), FakeOcr::failing());

        let err = pipeline.extract(&sample_image(), None).await.unwrap_err();
        assert!(matches!(err, StrukError::Ocr(OcrError::Recognition(_))));
    }

    #[tokio::test]
    async fn test_progress_reaches_ocr_fallback() {
        use std::sync::Mutex;

        let pipeline = ReceiptPipeline::new(FakeVision::failing(), FakeOcr::new());
        let seen: Mutex<Vec<u8>> = Mutex::new(Vec::new());
        let cb = |p: u8| seen.lock().unwrap().push(p);

        pipeline.extract(&sample_image(), Some(&cb)).await.unwrap();

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen, vec![0, 40, 80, 100]);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_success_confidence_in_bounds() {
        for pipeline in [
            ReceiptPipeline::new(FakeVision::succeeding(), FakeOcr::new()),
            ReceiptPipeline::new(FakeVision::failing(), FakeOcr::new()),
        ] {
            let result = pipeline.extract(&sample_image(), None).await.unwrap();
            assert!(result.receipt.confidence >= 0.0);
            assert!(result.receipt.confidence <= 100.0);
        }
    }
}
