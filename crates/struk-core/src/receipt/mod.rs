//! Rule-based field extraction for Indonesian receipt text.

pub mod parser;
pub mod rules;

pub use parser::ReceiptParser;
pub use rules::normalize::{normalize_amount, normalize_date};
