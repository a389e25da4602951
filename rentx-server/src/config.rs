use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::credentials::SchemeKind;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 << 20;

/// Configurazione del processo, letta dalle variabili d'ambiente.
///
/// | variabile          | default        |
/// |--------------------|----------------|
/// | `DATABASE_URL`     | `rentx.db`     |
/// | `BIND_ADDR`        | `0.0.0.0:8090` |
/// | `UPLOAD_DIR`       | `uploads`      |
/// | `STATIC_DIR`       | `dist`         |
/// | `MAX_UPLOAD_BYTES` | 10 MiB         |
/// | `PASSWORD_SCHEME`  | `sha256`       |
#[derive(Debug, Clone)]
pub struct Config {
    /// Valore grezzo: un percorso, un URL `sqlite://...` o `sqlite::memory:`
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub password_scheme: SchemeKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "rentx.db".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            upload_dir: PathBuf::from("uploads"),
            static_dir: PathBuf::from("dist"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            password_scheme: SchemeKind::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Come `from_env`, ma con una sorgente di variabili qualsiasi.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = Config::default();
        if let Some(v) = get("DATABASE_URL") {
            cfg.database_url = v;
        }
        if let Some(v) = get("BIND_ADDR") {
            cfg.bind_addr = v.parse().with_context(|| format!("parse BIND_ADDR {:?}", v))?;
        }
        if let Some(v) = get("UPLOAD_DIR") {
            cfg.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = get("STATIC_DIR") {
            cfg.static_dir = PathBuf::from(v);
        }
        if let Some(v) = get("MAX_UPLOAD_BYTES") {
            cfg.max_upload_bytes = v
                .parse()
                .with_context(|| format!("parse MAX_UPLOAD_BYTES {:?}", v))?;
        }
        if let Some(v) = get("PASSWORD_SCHEME") {
            cfg.password_scheme = v
                .parse()
                .map_err(anyhow::Error::msg)
                .context("parse PASSWORD_SCHEME")?;
        }
        Ok(cfg)
    }
}
