//! Dump command - export the raw recovered text of a statement.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use ccparse_core::models::config::CcparseConfig;
use ccparse_core::ocr::TextRecognizer;
use ccparse_core::{RecoveredText, TextSource};

use super::{load_config, load_recognizer, recover_input};

/// Arguments for the dump command.
#[derive(Args)]
pub struct DumpArgs {
    /// Input file (PDF, image or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "txt")]
    format: DumpFormat,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Skip OCR and use only the PDF text layer
    #[arg(long)]
    text_only: bool,

    /// OCR every page, ignoring the text layer and the page limit
    #[arg(long, conflicts_with = "text_only")]
    ocr_all: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum DumpFormat {
    /// Page text separated by `--- Page N ---` markers
    Txt,
    /// JSON document with filename, page count and text
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextExport<'a> {
    filename: &'a str,
    num_pages: u32,
    source: TextSource,
    extracted_text: String,
}

pub async fn run(args: DumpArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if args.ocr_all {
        force_full_ocr(&mut config);
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let recognizer = if args.text_only {
        None
    } else {
        load_recognizer(&config, args.model_dir.as_deref())?
    };
    if args.ocr_all && recognizer.is_none() {
        anyhow::bail!("--ocr-all needs OCR models; point --model-dir at them");
    }
    let recovered = recover_input(
        &args.input,
        &config,
        recognizer.as_ref().map(|r| r as &dyn TextRecognizer),
    )?;

    let filename = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let output = match args.format {
        DumpFormat::Txt => paged_text(&recovered),
        DumpFormat::Json => serde_json::to_string_pretty(&TextExport {
            filename,
            num_pages: recovered.page_count,
            source: recovered.source,
            extracted_text: paged_text(&recovered),
        })?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Text written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Recover every page with OCR.
fn force_full_ocr(config: &mut CcparseConfig) {
    config.recovery.prefer_text_layer = false;
    config.recovery.max_ocr_pages = u32::MAX;
}

/// Page texts, each preceded by a `--- Page N ---` marker.
fn paged_text(recovered: &RecoveredText) -> String {
    // Some PDFs only decode through the whole-document text layer.
    if recovered.pages.iter().all(|p| p.trim().is_empty()) {
        return format!("--- Page 1 ---\n\n{}", recovered.text.trim());
    }

    recovered
        .pages
        .iter()
        .enumerate()
        .map(|(i, text)| format!("--- Page {} ---\n\n{}", i + 1, text.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_full_ocr_overrides_recovery_limits() {
        let mut config = CcparseConfig::default();
        force_full_ocr(&mut config);

        assert!(!config.recovery.prefer_text_layer);
        assert_eq!(config.recovery.max_ocr_pages, u32::MAX);
        assert_eq!(
            config.recovery.min_text_length,
            CcparseConfig::default().recovery.min_text_length
        );
    }

    #[test]
    fn test_paged_text_markers() {
        let recovered = RecoveredText {
            text: String::new(),
            pages: vec!["first\n".to_string(), "second".to_string()],
            page_count: 2,
            source: TextSource::TextLayer,
            warnings: Vec::new(),
        };
        assert_eq!(
            paged_text(&recovered),
            "--- Page 1 ---\n\nfirst\n\n--- Page 2 ---\n\nsecond"
        );
    }
}
