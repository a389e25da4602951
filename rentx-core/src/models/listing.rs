use serde::{Deserialize, Serialize};

/// Annuncio di noleggio così come è salvato nella tabella `listings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: i64,
    /// Proprietario, chiave esterna su `users.id`
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub payment_per_day: i64,
    /// Percorso relativo dell'immagine caricata (es. "uploads/3_bike.png")
    pub image_path: String,
}
