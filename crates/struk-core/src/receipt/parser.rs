//! Pattern-based receipt parser: raw OCR text in, structured record out.

use tracing::{debug, info};

use crate::models::receipt::{ReceiptData, ReceiptItem};

use super::rules::normalize::{normalize_amount, normalize_date};
use super::rules::patterns::{ITEM_NAME_BLOCKLIST, TOTAL_PATTERNS, item_patterns};

/// Heuristic field extractor for Indonesian receipt text.
///
/// The parser never fails: a field that cannot be located is reported
/// as absent, and the caller-supplied confidence is passed through
/// verbatim.
#[derive(Debug, Clone)]
pub struct ReceiptParser {
    /// Smallest total accepted as plausible; `0` disables the check.
    min_total: u64,
}

impl ReceiptParser {
    pub fn new() -> Self {
        Self { min_total: 0 }
    }

    pub fn with_min_total(mut self, min_total: u64) -> Self {
        self.min_total = min_total;
        self
    }

    /// Parse recognized receipt text into a [`ReceiptData`].
    ///
    /// `confidence` is whatever the producing engine reported for the
    /// text, on the 0-100 scale.
    pub fn parse(&self, text: &str, confidence: f32) -> ReceiptData {
        info!("Parsing receipt from {} characters of text", text.len());

        let store_name = self.extract_store_name(text);
        let date = normalize_date(text);
        let total = self.extract_total(text);
        let items = self.extract_items(text);

        debug!(
            "Extracted store={:?} date={:?} total={:?} items={}",
            store_name,
            date,
            total,
            items.len()
        );

        ReceiptData {
            store_name,
            date,
            total,
            items,
            raw_text: text.to_string(),
            confidence,
        }
    }

    /// The first non-blank line is taken as the merchant name.
    fn extract_store_name(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }

    /// Walk the total tiers in priority order, accepting the first
    /// candidate that normalizes to a plausible positive amount.
    fn extract_total(&self, text: &str) -> Option<u64> {
        for pattern in TOTAL_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let amount = normalize_amount(&caps[1]);
                if amount > 0 && amount >= self.min_total {
                    return Some(amount);
                }
            }
        }
        None
    }

    /// Collect item candidates from both line shapes in match order.
    fn extract_items(&self, text: &str) -> Vec<ReceiptItem> {
        let mut items = Vec::new();

        for (pattern, qty_group, price_group) in item_patterns() {
            for caps in pattern.captures_iter(text) {
                let name = caps[1].trim();
                // Summary lines match the item shape too; drop them.
                if ITEM_NAME_BLOCKLIST.is_match(name) {
                    continue;
                }

                let quantity = caps[qty_group]
                    .parse::<u32>()
                    .ok()
                    .filter(|q| *q > 0)
                    .unwrap_or(1);

                items.push(ReceiptItem {
                    name: name.to_string(),
                    quantity,
                    price: normalize_amount(&caps[price_group]),
                });
            }
        }

        items
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}
