//! Gateway binary entry point

use std::error::Error;
use std::net::SocketAddr;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

use unichat_server::config::{EnvSnapshot, GatewayConfig};
use unichat_server::model::ModelRegistry;
use unichat_server::server;

#[derive(Parser)]
#[command(name = "unichat-server", about = "Streaming chat gateway")]
struct Args {
    /// Bind address for the HTTP listener
    #[arg(long, default_value = "127.0.0.1:3001")]
    addr: SocketAddr,

    /// Path to an env file loaded before reading configuration
    #[arg(long)]
    env_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            // Optional; a missing .env is fine when the environment is
            // already populated.
            let _ = dotenvy::dotenv();
        }
    }

    init_tracing();
    info!("Starting unichat gateway");

    let env = EnvSnapshot::capture();
    let config = GatewayConfig::from_env(&env);
    let registry = ModelRegistry::builtin()?;
    debug!(models = registry.len(), "Model registry loaded");

    server::serve(config, env, registry, args.addr).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}
