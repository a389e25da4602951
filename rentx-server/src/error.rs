use axum::http::StatusCode;
use thiserror::Error;

use crate::store::StoreError;

/// Esito negativo di un servizio. Il testo (Display) è esattamente quello mostrato al client.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input del client non valido: campi numerici, immagine mancante, form illeggibile.
    #[error("{0}")]
    InvalidInput(String),
    /// Email o password sbagliate, senza dire quale delle due.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Vincolo dello store violato (email duplicata, proprietario inesistente).
    #[error("{0}")]
    Constraint(String),
    /// Filesystem o database non disponibili.
    #[error("{0}")]
    Resource(String),
}

impl ServiceError {
    /// Costruisce l'errore da un fallimento dello store, anteponendo `prefix` al messaggio del database.
    pub fn from_store(prefix: &str, e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail(_) | StoreError::ForeignKey(_) => {
                ServiceError::Constraint(format!("{}: {}", prefix, e))
            }
            StoreError::NotFound | StoreError::Database(_) => {
                ServiceError::Resource(format!("{}: {}", prefix, e))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::Constraint(_) | ServiceError::Resource(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Forma usata dagli handler: (status, testo)
impl From<ServiceError> for (StatusCode, String) {
    fn from(e: ServiceError) -> Self {
        (e.status(), e.to_string())
    }
}
