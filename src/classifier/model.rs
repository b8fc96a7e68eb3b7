use crate::utils::error::ServiceError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use parking_lot::Mutex;

/// Pretrained waste classifier backed by an ONNX Runtime session.
///
/// Constructed once at startup and shared through the request state; ort
/// sessions need `&mut self` to run, hence the mutex.
pub struct TrashClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl TrashClassifier {
    pub fn new(config: &Config) -> Result<Self> {
        let model_path = &config.model_path;

        if !model_path.exists() {
            return Err(ServiceError::ModelLoad(format!(
                "Classifier model not found: {}",
                model_path.display()
            )));
        }

        tracing::info!("Loading classifier model from: {}", model_path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::from)?
            .with_intra_threads(config.onnx_config.intra_threads)
            .map_err(ort::Error::from)?
            .commit_from_file(model_path)?;

        // Input/output names vary by export tool, so discover them
        if session.inputs().is_empty() {
            return Err(ServiceError::ModelLoad(
                "Classifier model has no inputs".to_string(),
            ));
        }
        if session.outputs().is_empty() {
            return Err(ServiceError::ModelLoad(
                "Classifier model has no outputs".to_string(),
            ));
        }

        let input_name = session.inputs()[0].name().to_string();
        let output_name = session.outputs()[0].name().to_string();
        tracing::info!(
            "Classifier model loaded: input '{}', output '{}'",
            input_name,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }

    /// Run the model on a preprocessed (1, 3, H, W) tensor and return the
    /// raw per-category scores for the single batch element.
    pub fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let input_tensor = Tensor::from_array(input)?;

        let predictions = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    let available: Vec<String> =
                        outputs.keys().map(|s| s.to_string()).collect();
                    return Err(ServiceError::Inference(format!(
                        "Classifier output '{}' not found. Available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        let shape = predictions.shape().to_vec();
        if shape.len() != 2 || shape[0] != 1 {
            return Err(ServiceError::Inference(format!(
                "Expected (1, num_classes) score tensor, got {:?}",
                shape
            )));
        }

        Ok(predictions.iter().copied().collect())
    }
}
