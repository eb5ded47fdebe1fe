use anyhow::Context;
use estimation_gateway::{build_app, run_server, AppConfig, AppState, GroqClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env()?;
    let provider = GroqClient::new(&config)?;
    let app = build_app(AppState::new(provider));

    run_server(app, config.port)
        .await
        .context("server failed")
}
