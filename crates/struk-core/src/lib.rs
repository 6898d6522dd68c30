//! Core library for Indonesian receipt (struk) scanning.
//!
//! This crate provides:
//! - An AI vision extractor that asks a vision-capable chat model for
//!   structured receipt data
//! - A local OCR fallback built on `pure-onnx-ocr`
//! - Pattern-based field extraction for Indonesian receipt text
//!   (store name, date, total, line items)
//! - A pipeline that tries the AI path first and falls back to OCR

pub mod error;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod receipt;
pub mod vision;

pub use error::{OcrError, Result, StrukError, VisionError};
pub use models::config::{ExtractionConfig, OcrConfig, StrukConfig, VisionConfig};
pub use models::receipt::{ImageMime, ReceiptData, ReceiptImage, ReceiptItem};
pub use ocr::{LocalOcrEngine, LocalOcrExtractor, OcrOutput, ProgressCallback};
pub use pipeline::{OcrExtractor, ReceiptPipeline, ScanResult, Strategy, VisionExtractor};
pub use receipt::{ReceiptParser, normalize_amount, normalize_date};
pub use vision::AiVisionExtractor;
