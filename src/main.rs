//! Main entry point for the medical safety translation CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod core;
mod processors;
mod storage;

use crate::cli::commands::Commands;
use crate::core::errors::TranslationError;

/// Medical Safety Japanese Translation Tool
#[derive(Parser, Debug)]
#[command(name = "medsafety-translator", version, about, long_about = None)]
struct Args {
    /// API key for OpenRouter (optional, defaults to OPENROUTER_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("OPENROUTER_API_KEY", api_key);
    }

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    // Execute command
    let result = match args.command {
        Some(Commands::Translate { input, output, yes }) => {
            cli::commands::handle_translate(input, output, yes).await
        }
        Some(Commands::Filter { input, output }) => cli::commands::handle_filter(input, output),
        Some(Commands::Sample { data_dir, output }) => {
            cli::commands::handle_sample(data_dir, output)
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
            Ok(())
        }
    };

    if let Err(err) = result {
        match &err {
            TranslationError::Interrupted => {
                println!("\nTranslation interrupted by user.");
                std::process::exit(130);
            }
            TranslationError::ConfigError { .. } => {
                eprintln!("\n{}", err);
                eprintln!("Please ensure OPENROUTER_API_KEY is set in your .env file");
                eprintln!("\nExample .env file:");
                eprintln!("OPENROUTER_API_KEY=your-api-key-here");
                std::process::exit(1);
            }
            _ => {
                tracing::error!("Fatal error: {}", err);
                eprintln!("\nError: {}", err);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
