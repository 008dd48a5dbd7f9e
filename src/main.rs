use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sona::cli::{Cli, Commands};
use sona::config::Config;
use sona::pipeline::{Pipeline, RunOptions};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_directive = if cli.verbose { "sona=debug" } else { "sona=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().await?;

    match cli.command {
        Commands::Transcribe {
            source,
            output,
            model,
        } => {
            let model = model.unwrap_or_else(|| config.default_model.clone());
            let pipeline = Pipeline::new(config)?;

            tracing::info!("Starting transcription for source: {}", source);

            let result = pipeline.run(&source, RunOptions { model, output }).await?;

            println!(
                "Saved to: {} ({} chars)",
                result.destination.display(),
                result.text.chars().count()
            );
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                println!("Edit the config file at: {}", Config::config_path()?.display());
            }
        }
        Commands::Models => {
            println!("Available speech models:");
            println!("  • slam-1 - best accuracy for English (default)");
            println!("  • best   - highest quality multilingual model");
            println!("  • nano   - fastest and cheapest");
        }
    }

    Ok(())
}
