use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ticket_mask::cli;

#[derive(Parser)]
#[command(name = "ticket-mask", version, about = "Redact PII from support ticket messages")]
struct Cli {
    /// Config file (default: ~/.config/ticket-mask/config.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mask `{"messages": [...]}` and print `{"masked_messages": [...]}`
    Mask {
        /// Read the request body from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Mask `{"batches": [...]}` and stream NDJSON ticket records
    MaskBatch {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Embed `{"message": ...}` and print `{"embedding": [...]}`
    Embed {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Embed `{"batches": [...]}` and stream NDJSON `{ticketId, embedding}` records
    EmbedBatch {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TICKET_MASK_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let config = cli::load_config(args.config.as_deref())?;

    match args.command {
        Commands::Mask { input } => cli::mask::run_mask(&config, input.as_deref()).await?,
        Commands::MaskBatch { input } => {
            let summary = cli::mask::run_mask_batch(&config, input.as_deref()).await?;
            if !summary.failed_tickets.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Embed { input } => cli::embed::run_embed(&config, input.as_deref()).await?,
        Commands::EmbedBatch { input } => {
            cli::embed::run_embed_batch(&config, input.as_deref()).await?
        }
        Commands::Config => cli::config_cmd::run_show(&config)?,
    }

    Ok(())
}
