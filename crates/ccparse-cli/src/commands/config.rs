//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use ccparse_core::models::config::CcparseConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "extraction.fallback_threshold")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

/// `<platform config dir>/ccparse/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ccparse")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<CcparseConfig> {
    if path.exists() {
        Ok(CcparseConfig::from_file(path)?)
    } else {
        Ok(CcparseConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn init_config(args: InitArgs, default_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(default_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    CcparseConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;

    let mut current = &json;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }

    println!("{}", serde_json::to_string_pretty(current)?);
    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;

    // Bare words that are not valid JSON are stored as strings.
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    let (parents, last) = match key.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, key),
    };

    let mut current = &mut json;
    for part in parents.into_iter().flat_map(|p| p.split('.')) {
        current = current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }

    let Some(object) = current.as_object_mut() else {
        anyhow::bail!("Cannot set value at non-object path");
    };
    if !object.contains_key(last) {
        anyhow::bail!("Configuration key not found: {}", key);
    }
    object.insert(last.to_string(), parsed_value.clone());

    let config: CcparseConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'ccparse config init' to create a configuration file.");
    }

    Ok(())
}
