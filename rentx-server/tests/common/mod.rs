#![allow(dead_code)]

use anyhow::Result;
use rentx_server::credentials::SchemeKind;
use rentx_server::{connect_pool, run_migrations, sqlite_url_for_path, AppState, Config};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Database e directory di upload in una TempDir che vive quanto il test.
pub struct TestEnv {
    pub dir: TempDir,
    pub pool: SqlitePool,
    pub config: Config,
    pub state: Arc<AppState>,
}

impl TestEnv {
    pub async fn new() -> Result<Self> {
        Self::with_config(|_| {}).await
    }

    pub async fn with_config(tweak: impl FnOnce(&mut Config)) -> Result<Self> {
        let dir = TempDir::new()?;
        let url = sqlite_url_for_path(&dir.path().join("rentx.db"))?;
        let pool = connect_pool(&url).await?;
        run_migrations(&pool).await?;

        let mut config = Config {
            database_url: url,
            upload_dir: dir.path().join("uploads"),
            static_dir: dir.path().join("dist"),
            password_scheme: SchemeKind::Sha256,
            ..Config::default()
        };
        tweak(&mut config);
        let state = Arc::new(AppState::new(pool.clone(), &config));
        Ok(Self { dir, pool, config, state })
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.config.upload_dir.clone()
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    pub fn uploaded_files(&self) -> Vec<String> {
        match std::fs::read_dir(self.upload_dir()) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}
