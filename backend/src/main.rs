//! Service entry-point: configuration, storage, and HTTP wiring.

use std::sync::Arc;

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::state::HttpState;
use backend::outbound::googlebooks::GoogleBooksSource;
use backend::outbound::persistence::{
    DbPool, DieselBookRepository, DieselReviewRepository, DieselUserRepository, PoolConfig,
};
use backend::server::{AppConfig, create_server, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()?;
    let key = load_session_key()?;

    let pool = DbPool::new(&PoolConfig::new(config.database_url.as_str()))
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    pool.run_migrations()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let metadata =
        GoogleBooksSource::new(config.metadata_endpoint.as_str(), config.metadata_timeout)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = HttpState::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselBookRepository::new(pool.clone())),
        Arc::new(DieselReviewRepository::new(pool)),
        Arc::new(metadata),
    );

    create_server(state, key, &config)?.await
}
