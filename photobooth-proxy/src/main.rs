use std::net::IpAddr;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use photobooth::{API_KEY_ENV, DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL, GeminiStylizer};
use photobooth_proxy::{ProxyState, router};

#[derive(Parser, Debug)]
#[command(name = "photobooth-proxy", version)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Upstream image model.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Upstream API base URL.
    #[arg(long, default_value = DEFAULT_GEMINI_BASE_URL)]
    upstream: String,

    /// Upstream request timeout in milliseconds.
    #[arg(long, default_value_t = 120_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty());
    if api_key.is_none() {
        tracing::warn!("{API_KEY_ENV} is not set; every stylize request will fail");
    }

    let upstream = GeminiStylizer::new(
        cli.upstream,
        api_key,
        cli.model,
        Duration::from_millis(cli.timeout_ms),
    );
    let app = router(ProxyState::new(std::sync::Arc::new(upstream)));

    let listener = tokio::net::TcpListener::bind((cli.bind, cli.port))
        .await
        .with_context(|| format!("bind {}:{}", cli.bind, cli.port))?;
    tracing::info!(addr = %listener.local_addr()?, "photobooth-proxy listening");
    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}
