use std::sync::Arc;

use anyhow::Context;
use stremfin_jellyfin::{Endpoints, JellyfinClient};
use stremfin_server::config::AddonConfig;
use stremfin_server::state::AppState;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AddonConfig::from_env().context("failed to load configuration")?;

    let endpoints = Endpoints::new(&config.jellyfin_url, config.api_key.clone())
        .context("invalid Jellyfin URL")?;
    let client = JellyfinClient::new(
        endpoints.clone(),
        config.user_id.clone(),
        config.upstream_timeout,
    )
    .context("failed to build Jellyfin client")?;
    info!(
        jellyfin = %config.jellyfin_url,
        server_name = %config.server_name,
        user_scoped = config.user_id.is_some(),
        "upstream configured"
    );

    let state = AppState::new(
        Arc::new(client),
        endpoints,
        &config.server_name,
        config.catalog_page_size,
    );
    let app = stremfin_server::routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind, "addon listening");

    axum::serve(listener, app).await?;
    Ok(())
}
