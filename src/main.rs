use std::env;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use price_forecaster::config::AppConfig;
use price_forecaster::llm::GeminiClient;
use price_forecaster::server;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "price_forecaster=info,tower_http=info";

fn init_logging() {
    let filter = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    // also installs the `log` bridge, so library records show up here
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let config = AppConfig::from_env().context("loading configuration")?;
    let addr = config.socket_addr()?;

    let client = GeminiClient::new(config.gemini.clone()).context("building Gemini client")?;
    log::info!("Using Gemini model {}", client.model());

    server::serve(addr, Arc::new(client)).await?;
    Ok(())
}
