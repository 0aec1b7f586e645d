//! reactclaw CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize config directory and default config file
//! - `chat`    — Interactive chat or single-message mode
//! - `tools`   — List the tools available to the agent

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "reactclaw",
    about = "reactclaw — a ReAct text-protocol agent runtime",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Chat with the agent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List the tools available to the agent
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Tools => commands::tools_cmd::run().await?,
    }

    Ok(())
}
