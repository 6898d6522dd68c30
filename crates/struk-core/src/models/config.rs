//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the struk pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrukConfig {
    /// Local OCR configuration.
    pub ocr: OcrConfig,

    /// AI vision backend configuration.
    pub vision: VisionConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Local OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing the ONNX model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name (latin covers Indonesian+English).
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Maximum image dimension (longer side) for processing.
    pub max_image_size: u32,

    /// Recognition confidence threshold (0.0 - 1.0); regions below it
    /// are dropped from the text dump.
    pub recognition_threshold: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            max_image_size: 2048,
            recognition_threshold: 0.0, // Disabled - CTC confidence scores are inherently low
        }
    }
}

/// AI vision backend configuration.
///
/// The backend is any chat-completion endpoint that accepts an inline
/// base64 image; the default points at a local proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Base URL of the chat-completion API.
    pub base_url: String,

    /// Bearer token for the API. Empty means unauthenticated.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Model identifier.
    pub model: String,

    /// Token budget for the completion.
    pub max_tokens: u32,

    /// Request timeout in seconds. Exceeding it counts as a vision
    /// failure and triggers the OCR fallback.
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8045".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

impl VisionConfig {
    /// Overlay environment variables onto the config.
    ///
    /// `STRUK_AI_BASE_URL`, `STRUK_AI_API_KEY` and `STRUK_AI_MODEL`
    /// take precedence over file values when set.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("STRUK_AI_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(key) = std::env::var("STRUK_AI_API_KEY") {
            self.api_key = key;
        }
        if let Ok(model) = std::env::var("STRUK_AI_MODEL") {
            self.model = model;
        }
        self
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Smallest total (whole rupiah) accepted as plausible. `0`
    /// disables the check; a normalized `0` is always rejected.
    pub min_total: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { min_total: 0 }
    }
}

impl StrukConfig {
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

    /// Get full path to an OCR model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_dir.join(model_name)
    }
}
