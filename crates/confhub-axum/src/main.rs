//! Server entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use confhub_axum::{Cli, start_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().into_config();
    start_server(config).await
}
