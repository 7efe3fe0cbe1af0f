//! CLI application for credit card statement parsing.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, dump, process};

/// Credit card statement parser - extract balances, dates and rates from statements
#[derive(Parser)]
#[command(name = "ccparse")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from a single statement
    Process(process::ProcessArgs),

    /// Extract fields from many statements
    Batch(batch::BatchArgs),

    /// Export the raw recovered text of a statement
    Dump(dump::DumpArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Dump(args) => dump::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
