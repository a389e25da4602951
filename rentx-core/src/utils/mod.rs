pub mod filename;

pub use filename::{sanitize_filename, stored_image_name};
