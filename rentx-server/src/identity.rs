//! Registrazione e verifica delle credenziali. Nessuna sessione: le credenziali
//! vengono ricontrollate ad ogni richiesta che le presenta.

use rentx_core::User;
use std::sync::Arc;

use crate::credentials::CredentialScheme;
use crate::error::ServiceError;
use crate::store::Store;

#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn Store>,
    scheme: Arc<dyn CredentialScheme>,
}

impl IdentityService {
    pub fn new(store: Arc<dyn Store>, scheme: Arc<dyn CredentialScheme>) -> Self {
        Self { store, scheme }
    }

    /// Crea l'utente. Un'email già registrata fallisce con `Constraint` e non crea righe;
    /// per riprovare serve un'altra email.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, ServiceError> {
        let stored = self.scheme.encode(password);
        match self.store.insert_user(name, email, &stored).await {
            Ok(id) => {
                tracing::info!(user_id = id, email, "signup success");
                Ok(User { id, name: name.to_string(), email: email.to_string() })
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "signup failed");
                Err(ServiceError::from_store("Signup failed", e))
            }
        }
    }

    /// Id dell'utente con queste credenziali. Email sconosciuta e password sbagliata
    /// producono lo stesso `InvalidCredentials`, così come un errore del database.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<i64, ServiceError> {
        let stored = self.scheme.encode(password);
        match self.store.find_user_by_credentials(email, &stored).await {
            Ok(id) => {
                tracing::info!(user_id = id, email, "signin success");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "signin failed");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }
}
