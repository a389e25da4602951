use serde::{Deserialize, Serialize};

/// Utente registrato. La password non fa parte del modello esposto: resta nello store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}
