//! CLI subcommands.

pub mod config;
pub mod parse;
pub mod scan;

use std::path::Path;

use struk_core::{ReceiptData, StrukConfig};

/// Load the config from an explicit path, or fall back to defaults.
/// Vision settings honor `STRUK_AI_*` environment overrides.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StrukConfig> {
    let mut config = if let Some(path) = config_path {
        StrukConfig::from_file(Path::new(path))?
    } else {
        StrukConfig::default()
    };
    config.vision = config.vision.with_env();
    Ok(config)
}

/// Format a whole-rupiah amount the way receipts print it: `Rp 24.000`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("Rp {}", grouped)
}

/// Plain-text summary of an extracted receipt.
pub fn format_receipt_text(receipt: &ReceiptData) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Store: {}\n",
        receipt.store_name.as_deref().unwrap_or("(not found)")
    ));
    out.push_str(&format!(
        "Date:  {}\n",
        receipt
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "(not found)".to_string())
    ));
    out.push_str(&format!(
        "Total: {}\n",
        receipt
            .total
            .map(format_rupiah)
            .unwrap_or_else(|| "(not found)".to_string())
    ));

    if !receipt.items.is_empty() {
        out.push_str("Items:\n");
        for item in &receipt.items {
            out.push_str(&format!(
                "  {} x {} @ {}\n",
                item.quantity,
                item.name,
                format_rupiah(item.price)
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah_grouping() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(500), "Rp 500");
        assert_eq!(format_rupiah(24000), "Rp 24.000");
        assert_eq!(format_rupiah(1234567), "Rp 1.234.567");
    }
}
