//! Financial Inclusion Predictor CLI
//!
//! A command-line client for requesting bank-account-usage predictions
//! from the prediction service and checking its health.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, predict};

/// Financial Inclusion Predictor CLI
#[derive(Parser)]
#[command(name = "fip")]
#[command(author, version, about = "CLI for the Financial Inclusion Predictor", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via FIP_API_URL env var)
    #[arg(long, env = "FIP_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict bank account usage for one individual
    Predict(predict::PredictArgs),

    /// Check service health and readiness
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Predict(args) => predict::run(&client, args, cli.format).await?,
        Commands::Health => health::run(&client, cli.format).await?,
    }

    Ok(())
}
