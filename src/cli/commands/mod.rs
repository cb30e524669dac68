//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod ask;
mod clean;
mod config_cmd;
mod llm;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use reviewlens::Config;

#[derive(Parser)]
#[command(name = "reviewlens")]
#[command(about = "LLM-assisted customer review sentiment analysis")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single prompt to the LLM and print the reply
    Ask {
        /// Prompt text (defaults to a one-sentence explanation of generative AI)
        prompt: Option<String>,
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
        /// Override the reply token budget
        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// Normalize review text into CLEANED_SUMMARY and show the result
    Clean {
        /// Dataset path (overrides config)
        #[arg(short, long)]
        path: Option<String>,
        /// Rows to display
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Sample reviews, score their sentiment with the LLM, and chart the results
    Analyze {
        /// Dataset path (overrides config)
        #[arg(short, long)]
        path: Option<String>,
        /// Number of reviews to sample (1-20, default from config)
        #[arg(short = 'n', long)]
        sample: Option<usize>,
        /// Only show this product ("All Products" for everything)
        #[arg(long)]
        product: Option<String>,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start the web dashboard
    Serve {
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show LLM configuration and available models
    Models,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the discovered config file path
    Path,
}

async fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from_path(&path)
                .await
                .map_err(|e| anyhow::anyhow!(e))
        }
        None => Ok(Config::load().await),
    }
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config).await?;

    match cli.command {
        Commands::Ask {
            prompt,
            model,
            max_tokens,
        } => ask::cmd_ask(&config, prompt.as_deref(), model.as_deref(), max_tokens).await,
        Commands::Clean { path, limit } => clean::cmd_clean(&config, path.as_deref(), limit).await,
        Commands::Analyze {
            path,
            sample,
            product,
            seed,
            model,
        } => {
            analyze::cmd_analyze(
                &config,
                analyze::AnalyzeOptions {
                    path,
                    sample,
                    product,
                    seed,
                    model,
                },
            )
            .await
        }
        Commands::Serve { host, port } => serve::cmd_serve(&config, host, port).await,
        Commands::Models => llm::cmd_llm_models(&config).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
            ConfigCommands::Path => config_cmd::cmd_config_path(&config),
        },
    }
}
