//! Parse command - run the pattern extractor on already-recognized text.
//!
//! Useful for debugging extraction rules without models or a network
//! connection: feed it a text dump and inspect what the parser finds.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use struk_core::ReceiptParser;

use super::{format_receipt_text, load_config};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file with receipt content
    #[arg(required = true)]
    input: PathBuf,

    /// Confidence to record on the result
    #[arg(long, default_value = "100.0")]
    confidence: f32,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: super::scan::OutputFormat,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let text = fs::read_to_string(&args.input)?;
    info!("Parsing {} chars of receipt text", text.len());

    let parser = ReceiptParser::new().with_min_total(config.extraction.min_total);
    let receipt = parser.parse(&text, args.confidence);

    let output = match args.format {
        super::scan::OutputFormat::Json => serde_json::to_string_pretty(&receipt)?,
        super::scan::OutputFormat::Text => format_receipt_text(&receipt),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
