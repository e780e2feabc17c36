//! Binary entrypoint for the calculator API server.
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ecalc_core::RunConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ecalc=info,tower_http=info")),
        )
        .init();

    let config = match std::env::var("ECALC_CONFIG") {
        Ok(path) => RunConfig::from_path(&path)
            .with_context(|| format!("loading config {}", path))?,
        Err(_) => RunConfig::default(),
    };

    // Default listen address can be overridden with ECALC_ADDR
    let addr = std::env::var("ECALC_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());
    ecalc_api::run(&addr, config).await
}
