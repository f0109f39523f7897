//! Server: loads config, prepares the store, serves until ctrl-c, then closes the pool.

use devportal::{
    app, connect_pool, ensure_account_tables, ensure_database_exists, AccountStore, AppConfig,
    AppState, ConfigError, MemoryAccountStore, PgAccountStore, StoreBackend,
};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("devportal=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(?config, "configuration loaded");

    let (store, pool): (Arc<dyn AccountStore>, Option<PgPool>) = match config.store {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            ensure_database_exists(url).await?;
            let pool = connect_pool(url, config.db_max_connections).await?;
            ensure_account_tables(&pool).await?;
            let pg = PgAccountStore::new(pool);
            let pool = pg.pool().clone();
            let store: Arc<dyn AccountStore> = Arc::new(pg);
            (store, Some(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; accounts are lost on restart");
            let store: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
            (store, None)
        }
    };

    let bind_addr = config.bind_addr;
    let state = AppState::new(store, config);
    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("database pool closed");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
