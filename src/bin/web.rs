#![cfg(not(tarpaulin_include))]

use clap::Parser;
use rollcall_wheel::app;
use rollcall_wheel::config::Config;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Serve the roll-call wheel.
#[derive(Debug, Parser)]
#[command(name = "rollcall-web", version)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// JSON file with a custom roster and colour table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Main entry point for the web application
///
/// Loads the optional configuration file, builds the extractor from it and
/// runs the web server until ctrl-c.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = match &args.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            Config::load(path)?
        }
        None => Config::default(),
    };
    let extractor = config.extractor()?;
    tracing::info!(
        roster = extractor.roster().len(),
        colors = extractor.colors().len(),
        "extractor ready"
    );

    app::run(args.bind, extractor).await
}
