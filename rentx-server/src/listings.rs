//! Creazione e lettura degli annunci.
//!
//! L'immagine viene scritta su disco *prima* della riga in `listings`: ogni annuncio esistente
//! ha quindi la sua immagine. Se l'insert fallisce dopo la scrittura, il file resta come orfano
//! e non viene rimosso.

use rentx_core::{stored_image_name, Listing};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ServiceError;
use crate::store::{NewListing, Store};

/// File ricevuto nel campo `image` del form multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Nome originale dichiarato dal client, non ancora sanificato
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Campi del form di creazione, ancora come testo: il parsing numerico lo fa il servizio.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSubmission {
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub payment_per_day: String,
    pub image: Option<UploadedImage>,
}

#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn Store>,
    upload_dir: PathBuf,
}

impl ListingService {
    pub fn new(store: Arc<dyn Store>, upload_dir: PathBuf) -> Self {
        Self { store, upload_dir }
    }

    /// Valida, salva l'immagine e inserisce l'annuncio. Restituisce l'id del nuovo annuncio.
    ///
    /// Due upload dello stesso utente con lo stesso nome sanificato finiscono nello stesso file:
    /// vince l'ultimo.
    pub async fn create(&self, submission: ListingSubmission) -> Result<i64, ServiceError> {
        let ListingSubmission { user_id, name, description, payment_per_day, image } = submission;

        // 1. campi numerici, prima di qualsiasi I/O
        let user_id: i64 = user_id.parse().map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "invalid user_id");
            ServiceError::InvalidInput("Invalid user_id".to_string())
        })?;
        let payment_per_day: i64 = match payment_per_day.parse::<i64>() {
            Ok(p) if p >= 0 => p,
            _ => {
                tracing::warn!(payment = %payment_per_day, "invalid paymentPerDay");
                return Err(ServiceError::InvalidInput("Invalid paymentPerDay".to_string()));
            }
        };

        // 2. immagine presente
        let image = image.ok_or_else(|| {
            tracing::warn!(user_id, "image upload error: missing image file");
            ServiceError::InvalidInput("Image upload error: missing image file".to_string())
        })?;

        // 3-5. directory, nome sanificato, scrittura
        tokio::fs::create_dir_all(&self.upload_dir).await.map_err(|e| {
            tracing::error!(dir = ?self.upload_dir, error = %e, "failed to create upload dir");
            ServiceError::Resource(format!("Failed to save image: {}", e))
        })?;
        let path = self.upload_dir.join(stored_image_name(user_id, &image.file_name));
        tokio::fs::write(&path, &image.bytes).await.map_err(|e| {
            tracing::error!(path = ?path, error = %e, "failed to save image");
            ServiceError::Resource(format!("Failed to save image: {}", e))
        })?;

        // 6. riga dell'annuncio, solo dopo la scrittura riuscita
        let row = NewListing {
            user_id,
            name,
            description,
            payment_per_day,
            image_path: path.to_string_lossy().into_owned(),
        };
        match self.store.insert_listing(&row).await {
            Ok(id) => {
                tracing::info!(listing_id = id, user_id, name = %row.name, "listing created");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(user_id, image = %row.image_path, error = %e, "failed to create listing, image left on disk");
                Err(ServiceError::from_store("Failed to create listing", e))
            }
        }
    }

    pub async fn list_all(&self) -> Result<Vec<Listing>, ServiceError> {
        self.store.list_all().await.map_err(|e| {
            tracing::error!(error = %e, "failed to fetch listings");
            ServiceError::Resource("Failed to fetch listings".to_string())
        })
    }

    /// Annunci di un proprietario; `owner` è il segmento di path così com'è arrivato.
    pub async fn list_by_owner(&self, owner: &str) -> Result<Vec<Listing>, ServiceError> {
        let user_id: i64 = owner.parse().map_err(|e| {
            tracing::warn!(owner, error = %e, "invalid userID in dashboard");
            ServiceError::InvalidInput("Invalid userID".to_string())
        })?;
        self.store.list_by_owner(user_id).await.map_err(|e| {
            tracing::error!(user_id, error = %e, "failed to fetch user listings");
            ServiceError::Resource("Failed to fetch user listings".to_string())
        })
    }
}
