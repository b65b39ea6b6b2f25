//! Encode, classify and interpret one customer

use crate::feature_encoder::{FeatureEncoder, FeatureVector};
use crate::models::ChurnClassifier;
use crate::types::customer::CustomerRecord;
use crate::types::prediction::{ChurnLabel, Verdict};
use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Result of model inference for one request
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResult {
    /// Unique request identifier
    pub request_id: String,
    /// Classifier that produced the prediction
    pub model: String,
    /// Label decided by the classifier
    pub label: ChurnLabel,
    /// Probability of the churn class (0.0 - 1.0)
    pub probability: f64,
    /// Vector the classifier saw
    pub features: FeatureVector,
    /// Prediction timestamp
    pub timestamp: DateTime<Utc>,
}

impl PredictionResult {
    /// User-facing verdict for this prediction
    pub fn verdict(&self) -> Verdict {
        Verdict::interpret(self.label, self.probability)
    }
}

/// Runs the encode → classify sequence against a shared classifier
#[derive(Clone)]
pub struct ChurnPredictor {
    encoder: FeatureEncoder,
    classifier: Arc<dyn ChurnClassifier>,
}

impl ChurnPredictor {
    pub fn new(classifier: Arc<dyn ChurnClassifier>) -> Self {
        Self {
            encoder: FeatureEncoder::new(),
            classifier,
        }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Predict churn for one customer.
    ///
    /// Classifier failures are returned to the caller; nothing is retried.
    pub fn predict(&self, record: &CustomerRecord) -> Result<PredictionResult> {
        let features = self.encoder.encode(record);

        let (label, probability) = self
            .classifier
            .classify(&features)
            .with_context(|| format!("Model {} failed to classify", self.classifier.name()))?;

        ensure!(
            probability.is_finite() && (0.0..=1.0).contains(&probability),
            "Model {} returned probability {} outside [0, 1]",
            self.classifier.name(),
            probability
        );

        let result = PredictionResult {
            request_id: uuid::Uuid::new_v4().to_string(),
            model: self.classifier.name().to_string(),
            label,
            probability,
            features,
            timestamp: Utc::now(),
        };

        debug!(
            request_id = %result.request_id,
            label = %label,
            probability = probability,
            "Prediction complete"
        );

        Ok(result)
    }
}
