//! Claim service command line interface
//!
//! Usage:
//!   claimd start      - Start the claim API server
//!   claimd validate   - Validate the allocation file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use claim_core::logging::LogLevel;

mod commands;

#[derive(Parser)]
#[command(name = "claimd")]
#[command(about = "Token claim service")]
#[command(version)]
struct Cli {
    /// Allocation CSV file (address,kind_a,kind_b)
    #[arg(long, env = "CLAIM_ALLOCATIONS", default_value = "allocations.csv")]
    allocations: PathBuf,

    /// Data directory for the persistent store
    #[arg(long, env = "CLAIM_DATA_DIR", default_value = "./claim_data")]
    data_dir: PathBuf,

    /// Log level (error/warn/info/debug/trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the claim API server
    Start {
        /// Host to bind to
        #[arg(short = 'H', long, env = "CLAIM_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, env = "CLAIM_PORT", default_value = "8080")]
        port: u16,
        /// Use a non-persistent in-memory store
        #[arg(long)]
        in_memory: bool,
    },

    /// Validate the allocation file and report the entry count
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let level = LogLevel::from_str(&cli.log_level).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level.as_str()))
        .init();

    match cli.command {
        Commands::Start {
            host,
            port,
            in_memory,
        } => commands::start(&cli.allocations, &cli.data_dir, host, port, in_memory).await,
        Commands::Validate => commands::validate(&cli.allocations),
    }
}
