use std::sync::Arc;

use cinefav_api::api::{create_router, AppState};
use cinefav_api::config::Config;
use cinefav_api::db::JsonFavoritesStore;
use cinefav_api::services::providers::OmdbProvider;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinefav_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = OmdbProvider::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
        config.search_timeout(),
    )?;
    let favorites = JsonFavoritesStore::open(&config.favorites_path).await?;

    tracing::info!(
        favorites_path = %favorites.path().display(),
        provider_url = %config.omdb_api_url,
        "Initialized movie catalog"
    );

    let state = AppState::new(Arc::new(provider), Arc::new(favorites));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server running on http://{}", address);
    axum::serve(listener, app).await?;

    Ok(())
}
