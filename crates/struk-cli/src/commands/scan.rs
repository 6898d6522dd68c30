//! Scan command - extract structured data from a receipt image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use struk_core::{
    AiVisionExtractor, LocalOcrEngine, LocalOcrExtractor, OcrExtractor, ReceiptImage,
    ReceiptParser, ReceiptPipeline, ScanResult, Strategy, VisionExtractor,
};

use super::{format_receipt_text, load_config};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input image (jpg, png or webp)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Directory containing the OCR model files
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip the AI backend and use only local OCR
    #[arg(long, conflicts_with = "ai_only")]
    ocr_only: bool,

    /// Use only the AI backend, never fall back to OCR
    #[arg(long)]
    ai_only: bool,

    /// Show extraction confidence
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.model_dir {
        config.ocr.model_dir = dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning receipt: {}", args.input.display());

    let image = ReceiptImage::from_path(&args.input)?;
    let parser = ReceiptParser::new().with_min_total(config.extraction.min_total);

    // Progress bar only moves during local OCR; the AI call has no
    // intermediate signal, so it stays a spinner until then.
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    let report = |p: u8| pb.set_position(p as u64);

    let result = if args.ai_only {
        pb.set_message("Asking AI backend...");
        let vision = AiVisionExtractor::new(config.vision.clone())?;
        let receipt = vision.extract(&image).await?;
        ScanResult {
            receipt,
            strategy: Strategy::Ai,
        }
    } else if args.ocr_only {
        pb.set_message("Running local OCR...");
        let engine = LocalOcrEngine::from_dir(&config.ocr.model_dir, config.ocr.clone())?;
        let ocr = LocalOcrExtractor::new(engine, parser);
        let receipt = ocr.extract(&image, Some(&report))?;
        ScanResult {
            receipt,
            strategy: Strategy::Ocr,
        }
    } else {
        pb.set_message("Extracting...");
        let vision = AiVisionExtractor::new(config.vision.clone())?;
        let engine = LocalOcrEngine::from_dir(&config.ocr.model_dir, config.ocr.clone())?;
        let ocr = LocalOcrExtractor::new(engine, parser);
        let pipeline = ReceiptPipeline::new(vision, ocr);
        pipeline.extract(&image, Some(&report)).await?
    };

    pb.finish_with_message("Done");

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => format_receipt_text(&result.receipt),
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

    if args.show_confidence {
        println!();
        println!(
            "{} Strategy: {}",
            style("ℹ").blue(),
            result.strategy
        );
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            result.receipt.confidence
        );
    }

    debug!("Total scan time: {:?}", start.elapsed());

    Ok(())
}
