//! Filmgate CLI — entry point.
//!
//! # Commands
//!
//! - `filmgate run` — start the bot (long polling)
//! - `filmgate status` — show resolved configuration

mod run;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Filmgate — subscription-gated film catalog bot for Telegram
#[derive(Parser)]
#[command(name = "filmgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot (long polling)
    Run {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show resolved configuration and store contents
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { logs } => {
            init_logging(logs);
            run::run().await
        }
        Commands::Status => {
            init_logging(false);
            status::run().await
        }
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("filmgate=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
