//! AI vision extraction: ask a vision-capable chat model for
//! structured receipt data directly.

mod json_scan;

pub use json_scan::find_json_object;

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::VisionError;
use crate::models::config::VisionConfig;
use crate::models::receipt::{ReceiptData, ReceiptImage, ReceiptItem};
use crate::pipeline::VisionExtractor;
use crate::receipt::{normalize_amount, normalize_date};

/// Fixed confidence reported for AI extractions. The model does not
/// self-report calibrated confidence, so a constant high value tells
/// callers to trust this over OCR without claiming per-field precision.
pub const AI_CONFIDENCE: f32 = 95.0;

/// Extraction prompt: exact JSON shape, null for unreadable fields,
/// JSON-only output.
const EXTRACTION_PROMPT: &str = r#"Kamu adalah AI yang ahli membaca struk belanja Indonesia.
Ekstrak informasi dari gambar struk dengan format JSON berikut:

{
  "storeName": "nama toko",
  "date": "YYYY-MM-DD",
  "total": 12345,
  "items": [
    {"name": "nama item", "quantity": 1, "price": 1000}
  ]
}

Aturan:
- storeName: Nama toko/merchant (biasanya di bagian atas struk)
- date: Tanggal transaksi dalam format YYYY-MM-DD
- total: Total pembayaran dalam angka (tanpa Rp, titik, atau koma)
- items: Array item yang dibeli dengan quantity dan harga satuan
- Jika tidak bisa membaca, isi dengan null
- HANYA output JSON, tanpa penjelasan tambahan"#;

/// Chat-completion client for the vision extraction path.
pub struct AiVisionExtractor {
    client: reqwest::Client,
    config: VisionConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart<'a> {
    #[serde(rename = "text")]
    Text { text: &'a str },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// The JSON shape the prompt asks for. Everything is optional; the
/// model is told to use null for unreadable fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiReceipt {
    #[serde(default)]
    store_name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    total: Option<serde_json::Value>,
    #[serde(default)]
    items: Option<Vec<AiItem>>,
}

#[derive(Debug, Deserialize)]
struct AiItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    quantity: Option<serde_json::Value>,
    #[serde(default)]
    price: Option<serde_json::Value>,
}

impl AiVisionExtractor {
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VisionError::Config(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn request_completion(&self, image: &ReceiptImage) -> Result<String, VisionError> {
        let encoded = BASE64.encode(&image.bytes);
        let data_uri = format!("data:{};base64,{}", image.mime, encoded);

        let body = ChatRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: EXTRACTION_PROMPT,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_uri },
                    },
                ],
            }],
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("Requesting vision extraction from {}", url);

        let mut request = self.client.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Status { status, body });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(VisionError::EmptyResponse)
    }
}

impl VisionExtractor for AiVisionExtractor {
    async fn extract(&self, image: &ReceiptImage) -> Result<ReceiptData, VisionError> {
        let content = self.request_completion(image).await?;

        // The model may wrap the JSON in prose or code fences.
        let parsed: AiReceipt = {
            let json = find_json_object(&content).ok_or(VisionError::NoJson)?;
            serde_json::from_str(json)?
        };

        let receipt = receipt_from_ai(parsed, content);
        info!(
            "AI extraction succeeded: store={:?} total={:?} items={}",
            receipt.store_name,
            receipt.total,
            receipt.items.len()
        );

        Ok(receipt)
    }
}

/// Map the model's JSON into the common record shape. Missing or null
/// fields become absent; the full reply text is kept for audit.
fn receipt_from_ai(parsed: AiReceipt, raw_text: String) -> ReceiptData {
    let items = parsed
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|item| ReceiptItem {
            name: item.name,
            quantity: item
                .quantity
                .as_ref()
                .and_then(value_as_amount)
                .and_then(|q| u32::try_from(q).ok())
                .filter(|q| *q > 0)
                .unwrap_or(1),
            price: item.price.as_ref().and_then(value_as_amount).unwrap_or(0),
        })
        .collect();

    ReceiptData {
        store_name: parsed.store_name.filter(|s| !s.trim().is_empty()),
        date: parsed.date.as_deref().and_then(parse_ai_date),
        total: parsed
            .total
            .as_ref()
            .and_then(value_as_amount)
            .filter(|t| *t > 0),
        items,
        raw_text,
        confidence: AI_CONFIDENCE,
    }
}

/// The prompt asks for `YYYY-MM-DD`, but models stray; fall back to
/// the locale date patterns before giving up.
fn parse_ai_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| normalize_date(raw))
}

/// Accept amounts as JSON numbers or as formatted strings.
fn value_as_amount(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        serde_json::Value::String(s) => match normalize_amount(s) {
            0 => None,
            n => Some(n),
        },
        _ => None,
    }
}
