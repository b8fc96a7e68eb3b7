pub mod decode;
pub mod model;

pub use decode::decode;
pub use model::TrashClassifier;

use crate::Result;
use ndarray::Array4;

/// Scores a preprocessed image tensor. The ONNX-backed implementation is
/// `TrashClassifier`; tests substitute a canned scorer.
pub trait Classify: Send + Sync {
    /// Raw per-category scores for a (1, 3, H, W) input tensor.
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>>;
}

impl Classify for TrashClassifier {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        TrashClassifier::predict(self, input)
    }
}
