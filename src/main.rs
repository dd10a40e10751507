mod cli;
mod config;
mod search;
mod service;
mod view;

pub const USER_AGENT: &str = concat!("pubscout/", env!("CARGO_PKG_VERSION"));

use clap::Parser;
use cli::Cli;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pubscout=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    debug!(?cli, "parsed arguments");

    cli::run(cli)
        .await
        .inspect_err(|e| tracing::error!("pubscout failed: {e}"))
}
