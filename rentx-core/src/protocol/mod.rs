pub mod http;
pub mod text;

// Re-export comodi
pub use http::{SigninForm, SignupForm};
pub use text::{listing_line, login_message, render_listings};
