/* Le risposte dell'API sono testo semplice, una riga per annuncio.
   Il frontend divide ogni riga su ", " e poi su ": ", quindi il formato va mantenuto identico. */
use crate::models::Listing;

/// Riga di testo per un annuncio, terminata da '\n'.
pub fn listing_line(l: &Listing) -> String {
    format!(
        "ID: {}, Name: {}, Description: {}, Payment: {}, Image: {}\n",
        l.id, l.name, l.description, l.payment_per_day, l.image_path
    )
}

/// Concatena le righe di tutti gli annunci; stringa vuota se non ce ne sono.
pub fn render_listings(listings: &[Listing]) -> String {
    listings.iter().map(listing_line).collect()
}

/// Corpo della risposta di signin. Il client estrae l'id con `UserID:\s*(\d+)`.
pub fn login_message(user_id: i64) -> String {
    format!("Login successful. UserID: {}", user_id)
}
