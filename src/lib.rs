//! Library half of gnomebot: configuration and the image creator client the
//! Discord commands call into.

pub mod config;
pub mod utils;

pub use utils::image_creator;
