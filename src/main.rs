use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eddy::app::AppContext;
use eddy::cli::{commands, Cli, Commands};
use eddy::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Digest {
            url,
            json,
            no_summary,
        } => {
            let ctx = AppContext::new(&config)?;
            commands::digest_thread(&ctx, &url, json, no_summary).await?;
        }
        Commands::Resolve { url, offline } => {
            commands::resolve_url(&config, &url, offline).await?;
        }
    }

    Ok(())
}
