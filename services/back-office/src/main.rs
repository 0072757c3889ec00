use anyhow::Result;
use clap::Parser;

use back_office::Cli;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    tracing::info!("Starting back office");
    let summary = back_office::run(&config, cli.init)?;
    tracing::info!(?summary, "Back office finished");

    Ok(())
}
