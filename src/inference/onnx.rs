//! ONNX Runtime classifier
//!
//! Expects a scikit-learn style export: one `[batch, n_features]` float input,
//! an int64 `*label*` output and a float probability tensor (`zipmap=False`).

use std::path::Path;

use ndarray::Array2;
use ort::environment::Environment;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::{checked_probability, Classification, Classifier, InferenceError, POSITIVE_CLASS};
use crate::features::FeatureVector;

pub struct OnnxClassifier {
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    /// Column count declared by the graph; `None` when the dimension is dynamic
    input_width: Option<usize>,
    model_type: String,
    _environment: Environment,
}

impl OnnxClassifier {
    /// Load a model from file.
    ///
    /// ONNX Runtime allows one environment per process, so this is called
    /// once at startup.
    pub fn load(
        path: &Path,
        intra_threads: usize,
        model_type: impl Into<String>,
    ) -> Result<Self, InferenceError> {
        info!(path = %path.display(), threads = intra_threads, "Loading ONNX model");

        let environment = ort::init()
            .with_name("fraud-scoring-api")
            .build()
            .map_err(|e| InferenceError::Runtime(format!("Failed to create environment: {}", e)))?;

        let session = Session::builder(&environment)
            .map_err(|e| InferenceError::Runtime(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError::Runtime(format!("Failed to set optimization: {}", e)))?
            .with_intra_threads(intra_threads)
            .map_err(|e| InferenceError::Runtime(format!("Failed to set threads: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| InferenceError::Runtime(format!("Failed to load model: {}", e)))?;

        let input = session
            .inputs()
            .first()
            .ok_or_else(|| InferenceError::Runtime("Model declares no inputs".to_string()))?;
        let input_name = input.name().to_string();
        let input_width = input.dtype().tensor_shape().and_then(|shape| declared_width(shape));

        let output_names: Vec<&str> = session.outputs().iter().map(|o| o.name()).collect();
        info!(
            input = %input_name,
            width = ?input_width,
            outputs = ?output_names,
            "ONNX model loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            input_width,
            model_type: model_type.into(),
            _environment: environment,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, features: &FeatureVector) -> Result<Classification, InferenceError> {
        if let Some(width) = self.input_width {
            if features.len() != width {
                return Err(InferenceError::FeatureCount {
                    expected: width,
                    actual: features.len(),
                });
            }
        }

        let input = Array2::<f32>::from_shape_vec((1, features.len()), features.to_f32())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))?;
        let input_tensor = Tensor::from_array(input)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let mut label = None;
        let mut probability = None;

        for (name, value) in outputs.iter() {
            if name.contains("label") {
                if let Ok((_, data)) = value.try_extract_tensor::<i64>() {
                    label = data.first().copied();
                }
                continue;
            }
            if probability.is_none() {
                if let Ok((shape, data)) = value.try_extract_tensor::<f32>() {
                    probability = positive_probability(shape, data);
                }
            }
        }

        let probability = probability
            .ok_or_else(|| InferenceError::Runtime("No probability output".to_string()))?;
        let fraud_probability = checked_probability(probability)?;
        let predicted_class = label.unwrap_or(if fraud_probability >= 0.5 {
            POSITIVE_CLASS
        } else {
            0
        });

        debug!(predicted_class, fraud_probability, "ONNX classification");

        Ok(Classification {
            predicted_class,
            fraud_probability,
        })
    }

    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn input_width(&self) -> Option<usize> {
        self.input_width
    }
}

/// Column count of a `[batch, n_features]` input. Dynamic dimensions are `-1`.
pub fn declared_width(dims: &[i64]) -> Option<usize> {
    match dims {
        [_, width] if *width > 0 => usize::try_from(*width).ok(),
        _ => None,
    }
}

/// Positive-class probability for the first row of a probability tensor.
///
/// `[1, 2]` → column 1; `[1, 1]`, `[1]` → the value itself.
pub fn positive_probability(dims: &[i64], data: &[f32]) -> Option<f64> {
    let classes = match dims {
        [_, classes] => *classes,
        [classes] => *classes,
        _ => return None,
    };

    match classes {
        c if c >= 2 => data.get(POSITIVE_CLASS as usize).map(|&p| p as f64),
        1 => data.first().map(|&p| p as f64),
        _ => None,
    }
}
