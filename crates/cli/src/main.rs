//! BauBot CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize config & case storage
//! - `serve`   — Start the HTTP gateway
//! - `ask`     — Answer one question from the terminal
//! - `close`   — Close a support case with feedback
//! - `doctor`  — Diagnose configuration and backend health

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "baubot",
    about = "BauBot — support chatbot backend for construction-equipment manuals",
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
    /// Initialize configuration and case storage
    Onboard,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer a single question from the terminal
    Ask {
        /// The question to answer
        question: String,
    },

    /// Close a support case with resolution/feedback data
    Close {
        /// The case to close
        case_id: String,

        /// Mark the resolution as successful
        #[arg(long)]
        success: bool,

        /// Feedback rating (1-5)
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Diagnose configuration and backend health
    Doctor,
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
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask { question } => commands::ask::run(&question).await?,
        Commands::Close {
            case_id,
            success,
            rating,
        } => commands::close::run(&case_id, success, rating).await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
