//! Subcommands and the input handling they share.

pub mod batch;
pub mod config;
pub mod dump;
pub mod format;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use ccparse_core::models::config::CcparseConfig;
use ccparse_core::ocr::TextRecognizer;
use ccparse_core::{PureOcrEngine, RecoveredText, TextRecovery, TextSource};

/// Kind of statement file, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Image,
    /// Already-extracted plain text.
    Text,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "webp" | "tiff" | "tif" | "bmp" => Some(Self::Image),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Load the config named on the command line, else the user config, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CcparseConfig> {
    if let Some(path) = config_path {
        return Ok(CcparseConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(CcparseConfig::from_file(&default_path)?)
    } else {
        Ok(CcparseConfig::default())
    }
}

/// Load the OCR engine if its models are available.
pub fn load_recognizer(
    config: &CcparseConfig,
    model_dir: Option<&Path>,
) -> anyhow::Result<Option<PureOcrEngine>> {
    let model_dir: PathBuf = model_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.ocr.model_dir.clone());

    if !config.ocr.models_present(&model_dir) {
        debug!("No OCR models in {}", model_dir.display());
        return Ok(None);
    }

    let engine = PureOcrEngine::from_dir(&model_dir, &config.ocr)
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))?;
    Ok(Some(engine))
}

/// Recover the text of one statement file.
pub fn recover_input(
    path: &Path,
    config: &CcparseConfig,
    recognizer: Option<&dyn TextRecognizer>,
) -> anyhow::Result<RecoveredText> {
    let Some(kind) = InputKind::from_path(path) else {
        anyhow::bail!(
            "Unsupported file format: {}",
            path.extension().and_then(|e| e.to_str()).unwrap_or("")
        );
    };
    info!("Recovering text from {} ({:?})", path.display(), kind);

    let recovery = TextRecovery::new(config.recovery.clone());
    let recovered = match kind {
        InputKind::Pdf => recovery.recover(&fs::read(path)?, recognizer)?,
        InputKind::Image => {
            let Some(recognizer) = recognizer else {
                anyhow::bail!("Image input needs OCR models; point --model-dir at them");
            };
            let image = image::open(path)?;
            recovery.recover_image(&image, recognizer)?
        }
        InputKind::Text => {
            let text = fs::read_to_string(path)?;
            RecoveredText {
                pages: vec![text.clone()],
                text,
                page_count: 1,
                source: TextSource::TextLayer,
                warnings: Vec::new(),
            }
        }
    };

    debug!(
        "Recovered {} characters from {} via {}",
        recovered.text.len(),
        path.display(),
        recovered.source
    );
    Ok(recovered)
}

/// File name and size as reported alongside an extracted record.
pub fn file_metadata(path: &Path) -> anyhow::Result<(String, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let size = ccparse_core::format_file_size(fs::metadata(path)?.len());
    Ok((name, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_from_extension() {
        assert_eq!(InputKind::from_path(Path::new("a.PDF")), Some(InputKind::Pdf));
        assert_eq!(InputKind::from_path(Path::new("scan.jpeg")), Some(InputKind::Image));
        assert_eq!(InputKind::from_path(Path::new("dump.txt")), Some(InputKind::Text));
        assert_eq!(InputKind::from_path(Path::new("sheet.xlsx")), None);
        assert_eq!(InputKind::from_path(Path::new("noext")), None);
    }
}
