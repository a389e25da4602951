/// Tiene solo l'ultimo componente del nome (niente directory, né '/' né '\\')
/// e sostituisce gli spazi bianchi con '_'.
///
/// Nomi diversi possono collidere ("a b.png" e "a_b.png"): in quel caso
/// l'ultimo upload sovrascrive il file precedente.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .last()
        .unwrap_or(".");
    base.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Nome del file salvato nella directory degli upload: `<userID>_<nome sanificato>`.
pub fn stored_image_name(user_id: i64, original: &str) -> String {
    format!("{}_{}", user_id, sanitize_filename(original))
}
