use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use rentx_core::{login_message, render_listings};
use std::sync::Arc;

use crate::form_fields::FormFields;
use crate::listings::{ListingSubmission, UploadedImage};
use crate::AppState;

/// Handler per POST /api/signup
pub async fn signup(
    Extension(state): Extension<Arc<AppState>>,
    // FormFields non fallisce mai: un body vuoto o illeggibile diventa un form con campi ""
    fields: FormFields,
) -> Result<&'static str, (StatusCode, String)> {
    let form = fields.signup();
    // l'errore del servizio (email duplicata -> 500) diventa (StatusCode, String) con l'operatore ?
    state
        .identity
        .register(&form.name, &form.email, &form.password)
        .await?;
    Ok("Signup successful\n")
}

/// Handler per POST /api/signin
pub async fn signin(
    Extension(state): Extension<Arc<AppState>>,
    fields: FormFields,
) -> Result<String, (StatusCode, String)> {
    let form = fields.signin();
    // qualsiasi fallimento è 401 "Invalid credentials", senza dire quale campo era sbagliato
    let user_id = state.identity.authenticate(&form.email, &form.password).await?;
    Ok(login_message(user_id))
}

/// Handler per POST /api/create (multipart: user_id, name, description, paymentPerDay, image)
pub async fn create_listing(
    Extension(state): Extension<Arc<AppState>>,
    // Result<..> invece di Multipart: la rejection di axum la trasformiamo noi in un 400 testuale
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, (StatusCode, String)> {
    // un body che non è multipart, o che supera il limite di dimensione, è un 400
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!(error = %e, "multipart rejected");
        (StatusCode::BAD_REQUEST, format!("Could not parse form: {}", e))
    })?;
    let submission = read_submission(&mut multipart).await.map_err(|e| {
        tracing::warn!(error = %e, "could not parse multipart form");
        (StatusCode::BAD_REQUEST, format!("Could not parse form: {}", e))
    })?;

    // validazione, scrittura dell'immagine e insert le fa il servizio, in quest'ordine
    state.listings.create(submission).await?;
    Ok("Listing created\n")
}

// Legge tutti i campi del form.
// - a parità di nome vale il primo campo, come per un form HTML (`seen` tiene i nomi già letti);
// - "image" conta solo se ha un filename non vuoto: un input file lasciato vuoto nel browser
//   arriva con filename="" e va trattato come immagine mancante;
// - i campi sconosciuti vengono scartati senza leggerne il contenuto.
async fn read_submission(multipart: &mut Multipart) -> Result<ListingSubmission, MultipartError> {
    let mut s = ListingSubmission::default();
    let mut seen = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if seen.contains(&name) {
            continue;
        }
        match name.as_str() {
            "user_id" => s.user_id = field.text().await?,
            "name" => s.name = field.text().await?,
            "description" => s.description = field.text().await?,
            "paymentPerDay" => s.payment_per_day = field.text().await?,
            "image" => {
                let Some(file_name) = field
                    .file_name()
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                else {
                    continue;
                };
                // bytes() legge tutta la parte in memoria, entro il DefaultBodyLimit della rotta
                let bytes = field.bytes().await?;
                s.image = Some(UploadedImage { file_name, bytes: bytes.to_vec() });
            }
            _ => continue,
        }
        seen.push(name);
    }
    Ok(s)
}

/// Handler per GET /api/listings
pub async fn listings(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<String, (StatusCode, String)> {
    let all = state.listings.list_all().await?;
    // una riga per annuncio; nessun annuncio -> corpo vuoto con 200
    Ok(render_listings(&all))
}

/// Handler per GET /api/dashboard/{userID}.
pub async fn dashboard(
    Extension(state): Extension<Arc<AppState>>,
    // il wildcard cattura tutto il resto del path ("1/extra" compreso); senza segmento
    // (`/api/dashboard/`) Path fallisce e l'id è vuoto. In entrambi i casi il parsing dà 400.
    owner: Option<Path<String>>,
) -> Result<String, (StatusCode, String)> {
    let owner = owner.map(|Path(o)| o).unwrap_or_default();
    let mine = state.listings.list_by_owner(&owner).await?;
    Ok(render_listings(&mine))
}

/// Handler per GET /health
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> StatusCode {
    crate::health_with_pool(&state.pool).await
}
