//! Extraction rules: regex patterns and locale normalization.

pub mod normalize;
pub mod patterns;
