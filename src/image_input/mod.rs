pub mod loader;
pub mod preprocess;

pub use loader::ImageLoader;
pub use preprocess::{to_tensor, INPUT_SIZE};
