//! Process command - extract fields from a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ccparse_core::ocr::TextRecognizer;
use ccparse_core::{StatementExtractor, StatementParser};

use super::format::{format_record, OutputFormat};
use super::{file_metadata, load_config, load_recognizer, recover_input};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, image or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR and use only the PDF text layer
    #[arg(long)]
    text_only: bool,

    /// Issuer-rule match count below which generic rules are also applied
    #[arg(long)]
    fallback_threshold: Option<usize>,

    /// Print consistency warnings for the extracted record
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    let recognizer = if args.text_only {
        None
    } else {
        pb.set_message("Loading OCR models...");
        pb.set_position(10);
        load_recognizer(&config, args.model_dir.as_deref())?
    };

    pb.set_message("Recovering text...");
    pb.set_position(30);
    let recovered = recover_input(
        &args.input,
        &config,
        recognizer.as_ref().map(|r| r as &dyn TextRecognizer),
    )?;
    debug!(
        "Recovered {} pages via {}",
        recovered.page_count, recovered.source
    );

    pb.set_message("Extracting fields...");
    pb.set_position(70);
    let threshold = args
        .fallback_threshold
        .unwrap_or(config.extraction.fallback_threshold);
    let parser = StatementParser::new().with_fallback_threshold(threshold);
    let (file_name, file_size) = file_metadata(&args.input)?;
    let record = parser.extract(&recovered.text, Some(&file_name), Some(&file_size));

    pb.finish_and_clear();

    for warning in &recovered.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if args.validate {
        let issues = record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_record(&record, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
