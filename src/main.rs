use anyhow::Result;
use clap::Parser;
use gemini_bridge::app::App;
use gemini_bridge::models::Config;
use gemini_bridge::server;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-bridge")]
#[command(about = "Relay prompts to Gemini over HTTP")]
struct CliArgs {
    /// Address to listen on; overrides BRIDGE_BIND_ADDR.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_bridge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gemini-bridge");

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let bind_addr = config.bind_addr;
    let app = Arc::new(App::new(config)?);

    let listener = TcpListener::bind(bind_addr).await?;
    server::serve(app, listener).await?;

    info!("Shutdown complete");
    Ok(())
}
