//! tokenloom CLI
//!
//! Builds platform files from a design-token document and validates the
//! document's structure.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// tokenloom - design tokens for web, iOS, and Android
#[derive(Parser)]
#[command(name = "tokenloom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file or project directory
    #[arg(short, long, default_value = "tokenloom.yaml", env = "TOKENLOOM_CONFIG")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tokenloom.yaml and a starter token document
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Build every configured platform
    Build {
        /// Token document, overriding the configured source
        #[arg(short, long)]
        tokens: Option<String>,

        /// Rewrite files even when unchanged
        #[arg(long)]
        force: bool,
    },

    /// Check the token document's structure
    Validate {
        /// Token document, overriding the configured source
        #[arg(short, long)]
        tokens: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Build { tokens, force } => {
            commands::build::run(&cli.config, tokens.as_deref(), force).await?;
        }
        Commands::Validate { tokens } => {
            commands::validate::run(&cli.config, tokens.as_deref()).await?;
        }
    }

    Ok(())
}
