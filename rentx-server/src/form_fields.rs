//! Lettura "permissiva" dei form di signup/signin: urlencoded o multipart, più la query string.
//! Un body illeggibile, assente o di un altro tipo vale come form vuoto; ogni campo mancante vale "".
//! Così l'esito lo decide sempre il servizio di identità, mai l'estrazione.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use rentx_core::{SigninForm, SignupForm};
use std::convert::Infallible;

/// Coppie chiave/valore nell'ordine di arrivo: prima il body, poi la query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(pub Vec<(String, String)>);

impl FormFields {
    /// Primo valore per `key`, "" se manca. I valori ripetuti dopo il primo sono ignorati.
    pub fn first(&self, key: &str) -> String {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    pub fn signup(&self) -> SignupForm {
        SignupForm {
            name: self.first("name"),
            email: self.first("email"),
            password: self.first("password"),
        }
    }

    pub fn signin(&self) -> SigninForm {
        SigninForm {
            email: self.first("email"),
            password: self.first("password"),
        }
    }
}

fn parse_urlencoded(input: &[u8]) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

// Solo le parti senza filename (o con filename vuoto) sono valori di testo
async fn read_text_fields(multipart: &mut Multipart) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                // teniamo i campi letti fin qui
                tracing::warn!(error = %e, "multipart form truncated");
                break;
            }
        };
        if field.file_name().is_some_and(|f| !f.is_empty()) {
            continue;
        }
        let name = field.name().unwrap_or_default().to_string();
        match field.text().await {
            Ok(value) => fields.push((name, value)),
            Err(e) => {
                tracing::warn!(field = %name, error = %e, "unreadable multipart field");
                break;
            }
        }
    }
    fields
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // la query va letta prima di consumare la richiesta
        let query = req
            .uri()
            .query()
            .map(|q| parse_urlencoded(q.as_bytes()))
            .unwrap_or_default();
        // solo il tipo, senza parametri (charset, boundary)
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        let mut fields = match content_type.as_str() {
            "application/x-www-form-urlencoded" => match Bytes::from_request(req, state).await {
                Ok(body) => parse_urlencoded(&body),
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable form body");
                    Vec::new()
                }
            },
            "multipart/form-data" => match Multipart::from_request(req, state).await {
                Ok(mut multipart) => read_text_fields(&mut multipart).await,
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable multipart body");
                    Vec::new()
                }
            },
            // senza Content-Type (o con un tipo diverso) il body non contiene campi
            _ => Vec::new(),
        };
        fields.extend(query);
        Ok(FormFields(fields))
    }
}
