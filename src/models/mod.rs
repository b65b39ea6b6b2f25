//! Churn classifier backends and inference

pub mod inference;
pub mod loader;
pub mod logistic;
pub mod onnx;

pub use inference::{ChurnPredictor, PredictionResult};
pub use loader::ModelLoader;
pub use logistic::LogisticClassifier;
pub use onnx::OnnxClassifier;

use crate::feature_encoder::FeatureVector;
use crate::types::prediction::ChurnLabel;
use anyhow::Result;

/// Pre-trained binary churn classifier.
///
/// Implementations are loaded once and shared read-only between requests.
pub trait ChurnClassifier: Send + Sync {
    /// Name used in logs and responses
    fn name(&self) -> &str;

    /// Predicted class for one encoded customer
    fn predict(&self, features: &FeatureVector) -> Result<ChurnLabel>;

    /// Probability of the churn class (1) for one encoded customer
    fn predict_probability(&self, features: &FeatureVector) -> Result<f64>;

    /// Label and churn probability together.
    ///
    /// Backends that produce both from a single run should override this.
    fn classify(&self, features: &FeatureVector) -> Result<(ChurnLabel, f64)> {
        Ok((self.predict(features)?, self.predict_probability(features)?))
    }
}
