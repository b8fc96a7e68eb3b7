pub mod category;
pub mod classifier;
pub mod config;
pub mod image_input;
pub mod stats;
pub mod store;
pub mod utils;
pub mod web;

// Re-export the main types
pub use category::{Category, Prediction};
pub use config::Config;
pub use utils::error::ServiceError;

pub type Result<T> = std::result::Result<T, ServiceError>;
