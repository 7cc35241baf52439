//! Generative AI Relay Server
//!
//! Serves the relay over HTTP. Upstream settings come from the environment
//! (`GOOGLE_AI_API_KEY`, `GOOGLE_AI_API_BASE`, `UPSTREAM_TIMEOUT_SECS`,
//! `RELAY_MAX_BODY_BYTES`).

use anyhow::Result;
use clap::Parser;
use genai_relay::{run_server, RelayConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "genai-relay")]
#[command(about = "Relay text and image generation requests to Google AI")]
struct Args {
    /// Server port
    #[arg(short, long, default_value = "8080", env = "RELAY_PORT")]
    port: u16,

    /// Server host
    #[arg(long, default_value = "0.0.0.0", env = "RELAY_HOST")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("genai_relay=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = RelayConfig::from_env()?;

    info!("Starting Generative AI Relay");
    info!("  Upstream: {}", config.upstream_base);
    if let Some(timeout) = config.upstream_timeout {
        info!("  Upstream timeout: {}s", timeout.as_secs());
    }
    info!("  Max body: {} bytes", config.max_body_bytes);

    run_server(config, &args.host, args.port).await?;

    Ok(())
}
