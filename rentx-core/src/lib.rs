//! rentx-core: tipi condivisi del servizio di noleggio (modelli, form HTTP, formato testo delle risposte).
//! Niente I/O: il server si occupa di store, file e rete.

pub mod models;
pub mod protocol;
pub mod utils;

// Re-export utili per ridurre i percorsi nel crate server
pub use models::{listing::Listing, user::User};
pub use protocol::http::{SigninForm, SignupForm};
pub use protocol::text::{listing_line, login_message, render_listings};
pub use utils::{sanitize_filename, stored_image_name};
