//! Receipt record and input image types.

use std::path::Path;

use chrono::NaiveDate;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Structured data extracted from one receipt.
///
/// Every field except `raw_text` and `confidence` is best-effort: when a
/// field cannot be located it stays `None` so the caller can tell "not
/// found" apart from a real empty value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptData {
    /// Merchant name, usually the first line of the receipt.
    pub store_name: Option<String>,

    /// Transaction date (serialized as `YYYY-MM-DD`).
    pub date: Option<NaiveDate>,

    /// Total amount in whole rupiah.
    pub total: Option<u64>,

    /// Purchased items in document order.
    pub items: Vec<ReceiptItem>,

    /// Full text as seen by the extracting strategy (OCR dump or raw
    /// model reply). Kept for audit and manual correction.
    pub raw_text: String,

    /// Extractor-reported reliability, 0-100.
    pub confidence: f32,
}

/// One purchased line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item name as printed.
    pub name: String,

    /// Quantity, at least 1.
    pub quantity: u32,

    /// Unit price in whole rupiah.
    pub price: u64,
}

/// Supported receipt image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    /// The MIME string sent to the AI backend in the data URI.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "png" => Some(ImageMime::Png),
            "webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A receipt image as handed to the pipeline: raw bytes plus MIME type.
#[derive(Debug, Clone)]
pub struct ReceiptImage {
    pub bytes: Vec<u8>,
    pub mime: ImageMime,
}

impl ReceiptImage {
    pub fn new(bytes: Vec<u8>, mime: ImageMime) -> Self {
        Self { bytes, mime }
    }

    /// Read an image file, guessing the MIME type from the extension.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let mime = ImageMime::from_extension(ext).ok_or_else(|| {
            crate::StrukError::Config(format!("unsupported image extension: {:?}", ext))
        })?;
        let bytes = std::fs::read(path)?;
        Ok(Self { bytes, mime })
    }

    /// Decode the raw bytes into a pixel buffer for the local OCR path.
    pub fn decode(&self) -> Result<DynamicImage, image::ImageError> {
        image::load_from_memory(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(ImageMime::from_extension("JPG"), Some(ImageMime::Jpeg));
        assert_eq!(ImageMime::from_extension("png"), Some(ImageMime::Png));
        assert_eq!(ImageMime::from_extension("webp"), Some(ImageMime::Webp));
        assert_eq!(ImageMime::from_extension("gif"), None);
    }

    #[test]
    fn test_receipt_date_serializes_iso() {
        let receipt = ReceiptData {
            store_name: Some("Indomaret".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 5, 12),
            total: Some(55000),
            items: Vec::new(),
            raw_text: String::new(),
            confidence: 95.0,
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["date"], "2024-05-12");
        assert_eq!(json["total"], 55000);
    }
}
