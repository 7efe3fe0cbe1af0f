//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ccparse_core::models::config::CcparseConfig;
use ccparse_core::ocr::TextRecognizer;
use ccparse_core::{ExtractedRecord, Field, StatementExtractor, StatementParser};

use super::format::{format_record, OutputFormat, MISSING};
use super::{file_metadata, load_config, load_recognizer, recover_input, InputKind};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input glob pattern (e.g. "statements/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Output directory (default: print each record to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write summary.csv
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR and use only the PDF text layer
    #[arg(long)]
    text_only: bool,

    /// Issuer-rule match count below which generic rules are also applied
    #[arg(long)]
    fallback_threshold: Option<usize>,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<ExtractedRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// Fields copied into summary.csv next to the file status.
const SUMMARY_FIELDS: [Field; 6] = [
    Field::Issuer,
    Field::StatementDate,
    Field::PaymentDueDate,
    Field::NewBalance,
    Field::MinimumPayment,
    Field::CreditLimit,
];

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| InputKind::from_path(p).is_some())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let recognizer = if args.text_only {
        None
    } else {
        load_recognizer(&config, args.model_dir.as_deref())?
    };
    let recognizer = recognizer.as_ref().map(|r| r as &dyn TextRecognizer);

    let threshold = args
        .fallback_threshold
        .unwrap_or(config.extraction.fallback_threshold);
    let parser = StatementParser::new().with_fallback_threshold(threshold);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &parser, &config, recognizer);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(record) => {
                results.push(ProcessResult {
                    path,
                    record: Some(record),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Processing {} failed: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    for result in &results {
        let Some(record) = &result.record else {
            continue;
        };
        let content = format_record(record, args.format)?;

        match &args.output_dir {
            Some(output_dir) => {
                let stem = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");
                let output_path =
                    output_dir.join(format!("{}.{}", stem, args.format.extension()));
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => println!("{}", content),
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &StatementParser,
    config: &CcparseConfig,
    recognizer: Option<&dyn TextRecognizer>,
) -> anyhow::Result<ExtractedRecord> {
    let recovered = recover_input(path, config, recognizer)?;
    for warning in &recovered.warnings {
        warn!("{}: {}", path.display(), warning);
    }

    let (file_name, file_size) = file_metadata(path)?;
    Ok(parser.extract(&recovered.text, Some(&file_name), Some(&file_size)))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(SUMMARY_FIELDS.iter().map(|f| f.key()));
    header.extend(["fields", "processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut row = vec![filename];
        match &result.record {
            Some(record) => {
                row.push("success".to_string());
                row.extend(
                    SUMMARY_FIELDS
                        .iter()
                        .map(|f| record.get(*f).unwrap_or(MISSING).to_string()),
                );
                let statement_fields = record
                    .populated_fields()
                    .into_iter()
                    .filter(|f| !f.is_metadata())
                    .count();
                row.push(statement_fields.to_string());
            }
            None => {
                row.push("error".to_string());
                row.extend(std::iter::repeat_n(String::new(), SUMMARY_FIELDS.len() + 1));
            }
        }
        row.push(result.processing_time_ms.to_string());
        row.push(result.error.clone().unwrap_or_default());

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
