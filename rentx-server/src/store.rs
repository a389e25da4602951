//! Accesso SQL a utenti e annunci. Ogni scrittura è un singolo statement atomico:
//! unicità dell'email e integrità referenziale le garantisce SQLite, non il processo.

use async_trait::async_trait;
use rentx_core::Listing;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Violazione del vincolo UNIQUE su users.email; il messaggio è quello del database.
    #[error("{0}")]
    DuplicateEmail(String),
    /// Il proprietario dell'annuncio non esiste (FOREIGN KEY su listings.user_id).
    #[error("{0}")]
    ForeignKey(String),
    #[error("no matching row")]
    NotFound,
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::DuplicateEmail(db.message().to_string());
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKey(db.message().to_string());
            }
        }
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}

/// Riga da inserire in `listings`. L'immagine è già stata scritta su disco.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub payment_per_day: i64,
    pub image_path: String,
}

/// Operazioni sullo store iniettate nei servizi.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserisce un utente e ne restituisce l'id.
    async fn insert_user(&self, name: &str, email: &str, password: &str) -> Result<i64, StoreError>;

    /// Id dell'utente con esattamente questa email e questa password (già codificata).
    async fn find_user_by_credentials(&self, email: &str, password: &str) -> Result<i64, StoreError>;

    async fn insert_listing(&self, listing: &NewListing) -> Result<i64, StoreError>;

    async fn list_all(&self) -> Result<Vec<Listing>, StoreError>;

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Listing>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const LISTING_COLUMNS: &str = "id, user_id, name, description, paymentPerDay, imagePath";

fn listing_from_row(row: &SqliteRow) -> Result<Listing, sqlx::Error> {
    Ok(Listing {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        payment_per_day: row.try_get("paymentPerDay")?,
        image_path: row.try_get("imagePath")?,
    })
}

// Le righe che non si decodificano (es. colonne NULL in database vecchi) vengono saltate, non fanno fallire la query
fn collect_listings(rows: Vec<SqliteRow>) -> Vec<Listing> {
    rows.iter()
        .filter_map(|row| match listing_from_row(row) {
            Ok(l) => Some(l),
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable listing row");
                None
            }
        })
        .collect()
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_user(&self, name: &str, email: &str, password: &str) -> Result<i64, StoreError> {
        let res = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    async fn find_user_by_credentials(&self, email: &str, password: &str) -> Result<i64, StoreError> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ? AND password = ?")
            .bind(email)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?;
        id.ok_or(StoreError::NotFound)
    }

    async fn insert_listing(&self, listing: &NewListing) -> Result<i64, StoreError> {
        let res = sqlx::query(
            "INSERT INTO listings (user_id, name, description, paymentPerDay, imagePath) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(listing.user_id)
        .bind(&listing.name)
        .bind(&listing.description)
        .bind(listing.payment_per_day)
        .bind(&listing.image_path)
        .execute(&self.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    async fn list_all(&self) -> Result<Vec<Listing>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {} FROM listings", LISTING_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(collect_listings(rows))
    }

    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Listing>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {} FROM listings WHERE user_id = ?", LISTING_COLUMNS))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(collect_listings(rows))
    }
}
