pub mod user;
pub mod listing;

// Re-export per comodità
pub use user::User;
pub use listing::Listing;
