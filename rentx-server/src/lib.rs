use anyhow::Context;
use axum::http::StatusCode;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

pub mod config;
pub mod controllers;
pub mod cors;
pub mod credentials;
pub mod error;
pub mod form_fields;
pub mod identity;
pub mod listings;
pub mod routes;
pub mod static_files;
pub mod store;

pub use config::Config;
pub use error::ServiceError;
pub use identity::IdentityService;
pub use listings::{ListingService, ListingSubmission, UploadedImage};
pub use store::{NewListing, SqliteStore, Store, StoreError};

/// Stato condiviso fra gli handler: il pool (per /health), i servizi e le directory su disco.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub identity: IdentityService,
    pub listings: ListingService,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Collega i servizi allo store SQLite e allo schema di password scelto in configurazione.
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool.clone()));
        let scheme = config.password_scheme.build();
        Self {
            identity: IdentityService::new(store.clone(), scheme),
            listings: ListingService::new(store, config.upload_dir.clone()),
            pool,
            upload_dir: config.upload_dir.clone(),
            static_dir: config.static_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

// Dato un percorso di file, restituisce un URL SQLite valido. Crea le directory genitrici se non esistono.
pub fn sqlite_url_for_path(p: &Path) -> anyhow::Result<String> {
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&abs)
        .with_context(|| format!("create/open sqlite file {:?}", abs))?;
    let s = abs.to_string_lossy().replace('\\', "/");
    Ok(format!("sqlite:///{}", s.trim_start_matches('/')))
}

/// Normalizza il valore di DATABASE_URL (un percorso o un URL "sqlite://...") in un URL SQLite.
/// "sqlite::memory:" passa invariato.
pub fn build_sqlite_url(raw: &str) -> anyhow::Result<String> {
    if raw == "sqlite::memory:" {
        return Ok(raw.to_string());
    }
    // Rimuovi il prefisso "sqlite://" (o "sqlite:") se presente, per ottenere il percorso del file.
    let path_part = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
        .unwrap_or(raw);
    sqlite_url_for_path(Path::new(path_part))
}

/// Apre il pool con le foreign key attive su ogni connessione.
/// Un database in memoria vive quanto la sua connessione, quindi il pool ne tiene una sola, per sempre.
pub async fn connect_pool(db_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("parse sqlite url {}", db_url))?
        .foreign_keys(true)
        .create_if_missing(true);
    let pool_options = if db_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(8)
    };
    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("connect to sqlite via {}", db_url))?;
    Ok(pool)
}

// Crea le tabelle se non esistono. Lo schema è quello dei database già in uso (rentx.db).
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let stmts = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name     TEXT,
            email    TEXT UNIQUE,
            password TEXT
        );"#,
        r#"
        CREATE TABLE IF NOT EXISTS listings (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER,
            name          TEXT,
            description   TEXT,
            paymentPerDay INTEGER,
            imagePath     TEXT,
            FOREIGN KEY(user_id) REFERENCES users(id)
        );"#,
    ];
    // applica ogni statement di migrazione
    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| format!("apply migration: {}", s.trim().lines().next().unwrap_or_default()))?;
    }
    Ok(())
}

/// Controlla lo stato di salute del database tentando di acquisire una connessione dal pool.
pub async fn health_with_pool(pool: &SqlitePool) -> StatusCode {
    match pool.acquire().await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
