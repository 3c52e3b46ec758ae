use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use perfume_finder_api::{
    config::Config,
    db::{create_redis_client, InMemorySessionStore, RedisSessionStore, SessionStore},
    routes::{create_router, AppState},
    services::{open_catalog, RecommendationEngine},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("perfume_finder_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = open_catalog(&config.catalog_path, config.catalog_preload)?;
    let engine = RecommendationEngine::new(catalog);

    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(redis_url) => {
            let client = create_redis_client(redis_url)?;
            Arc::new(RedisSessionStore::new(client, config.session_ttl_secs))
        }
        None => Arc::new(InMemorySessionStore::new(config.session_ttl_secs)),
    };
    tracing::info!(store = sessions.name(), "Session store ready");

    let app = create_router(Arc::new(AppState::new(sessions, engine)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
