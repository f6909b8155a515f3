//! Fairline server binary.
//!
//! Loads configuration, builds the engine over the in-memory ledger
//! gateway, and serves the HTTP API.

use clap::Parser;
use fairline::api::ApiServer;
use fairline::config::AppConfig;
use fairline::engine::Engine;
use fairline::ledger::InMemoryLedger;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fairline")]
#[command(about = "Provably-fair casino outcome engine", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// API server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// API server port (overrides config)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairline=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!("📋 Engine configuration");
    info!("   Stake limits: {}-{}", config.engine.min_stake, config.engine.max_stake);
    info!("   Dice edge: {}%", config.engine.edges.dice);
    info!("   Crash cap: {}x", config.engine.crash_max);

    let ledger = Arc::new(InMemoryLedger::new(config.engine.starting_balance));
    let engine = Arc::new(Engine::new(config.engine.clone(), ledger));

    let server = ApiServer::new(config.server.clone(), engine);
    server.run().await
}
