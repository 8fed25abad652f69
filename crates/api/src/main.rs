use anyhow::Context;

use vendorguard_api::app::{AppState, build_app};
use vendorguard_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vendorguard_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!(?config, "configuration loaded");

    let state = AppState::from_config(&config)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
