//! Common regex patterns for Indonesian receipt extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date patterns. DD-first is deliberately tried before the ISO
    // order: DD-MM-YYYY is the common layout on Indonesian receipts,
    // and an ambiguous DD-MM-YY must not be read as YYYY-MM-DD.
    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})[/\-](\d{1,2})[/\-](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})\b"
    ).unwrap();

    // "5 Mei 2024" or "03 Des 23"; full month names share the 3-letter prefix.
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s+(jan|feb|mar|apr|mei|jun|jul|agu|sep|okt|nov|des)[a-z]*\s+(\d{4}|\d{2})\b"
    ).unwrap();

    // Total patterns, strongest anchor first.
    pub static ref TOTAL_KEYWORD_STRONG: Regex = Regex::new(
        r"(?i)(?:grand\s*total|total\s*belanja|total\s*bayar)[:\s]*(?:rp\.?\s*)?([\d.,]+)"
    ).unwrap();

    pub static ref TOTAL_KEYWORD_WEAK: Regex = Regex::new(
        r"(?i)(?:total|jumlah)[:\s]*(?:rp\.?\s*)?([\d.,]+)"
    ).unwrap();

    // An Rp-prefixed number closing a line is likely the grand total.
    pub static ref TOTAL_CURRENCY_EOL: Regex = Regex::new(
        r"(?im)rp\.?\s*([\d.,]+)\s*$"
    ).unwrap();

    /// Total extraction tiers in fixed priority order. The first tier
    /// that yields a nonzero normalized amount wins, regardless of
    /// where the match sits in the text.
    pub static ref TOTAL_PATTERNS: [&'static Regex; 3] = [
        &TOTAL_KEYWORD_STRONG,
        &TOTAL_KEYWORD_WEAK,
        &TOTAL_CURRENCY_EOL,
    ];

    // Item line shapes: "name qty x price" and "name price x qty".
    pub static ref ITEM_QTY_FIRST: Regex = Regex::new(
        r"(?i)(.+?)\s+(\d+)\s*[x@]\s*(?:rp\.?\s*)?([\d.,]+)"
    ).unwrap();

    pub static ref ITEM_PRICE_FIRST: Regex = Regex::new(
        r"(?i)(.+?)\s+(?:rp\.?\s*)?([\d.,]+)\s*x\s*(\d+)"
    ).unwrap();

    // Summary/adjustment lines that must never become line items.
    pub static ref ITEM_NAME_BLOCKLIST: Regex = Regex::new(
        r"(?i)total|jumlah|subtotal|pajak|tax|diskon"
    ).unwrap();
}

/// Item patterns with their capture-group layout: `(pattern,
/// quantity_group, price_group)`. Name is always group 1; both
/// patterns run over the whole text and every match is a candidate.
pub fn item_patterns() -> [(&'static Regex, usize, usize); 2] {
    [(&ITEM_QTY_FIRST, 2, 3), (&ITEM_PRICE_FIRST, 3, 2)]
}
