//! Error types for the struk-core library.

use thiserror::Error;

/// Main error type for the struk library.
#[derive(Error, Debug)]
pub enum StrukError {
    /// Local OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// AI vision extraction error.
    #[error("vision error: {0}")]
    Vision(#[from] VisionError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the local OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors from the AI vision backend.
#[derive(Error, Debug)]
pub enum VisionError {
    /// Transport-level failure calling the model endpoint.
    #[error("request to AI backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("AI backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The completion held no message content.
    #[error("no response content from AI backend")]
    EmptyResponse,

    /// No balanced `{...}` JSON region found in the model reply.
    #[error("no JSON object found in AI response")]
    NoJson,

    /// The located JSON region failed to parse.
    #[error("invalid JSON in AI response: {0}")]
    Json(#[from] serde_json::Error),

    /// Client construction or configuration failure.
    #[error("vision configuration error: {0}")]
    Config(String),
}

/// Result type for the struk library.
pub type Result<T> = std::result::Result<T, StrukError>;
