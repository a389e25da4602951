use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rentx_server::{build_sqlite_url, connect_pool, routes, run_migrations, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env().context("load configuration")?;
    // Senza database il server non parte: ogni errore qui è fatale
    let db_url = build_sqlite_url(&config.database_url).context("build sqlite DATABASE_URL")?;
    tracing::info!(database_url = %db_url, password_scheme = ?config.password_scheme, "using database");
    let pool = connect_pool(&db_url).await.context("connect to sqlite")?;
    run_migrations(&pool).await.context("run migrations")?;
    tracing::info!("database initialized successfully");

    let state = Arc::new(AppState::new(pool, &config));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("bind tcp listener")?;
    tracing::info!("server running at http://{}", config.bind_addr);
    axum::serve(listener, app.into_make_service())
        .await
        .context("server shutdown")?;

    Ok(())
}

// Log su stderr, livello da RUST_LOG (default "info")
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
