//! Output formats for extracted records.

use ccparse_core::{ExtractedRecord, Field};

/// Text shown for a field with no value, in text and CSV output.
pub const MISSING: &str = "N/A";

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_record(record: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// One header row of field keys, one value row.
///
/// Absent fields are written as [`MISSING`] so they differ from present empty values.
fn format_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(Field::ALL.iter().map(|f| f.key()))?;
    wtr.write_record(Field::ALL.iter().map(|f| record.get(*f).unwrap_or(MISSING)))?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(record: &ExtractedRecord) -> String {
    let width = Field::ALL.iter().map(|f| f.label().len()).max().unwrap_or(0);

    let mut output = String::new();
    output.push_str(&format!(
        "{}\n\n",
        record.get(Field::Issuer).unwrap_or(MISSING)
    ));
    for field in Field::ALL.iter().filter(|f| **f != Field::Issuer) {
        output.push_str(&format!(
            "{:width$}  {}\n",
            format!("{}:", field.label()),
            record.get(*field).unwrap_or(MISSING),
            width = width + 1
        ));
    }
    output
}
