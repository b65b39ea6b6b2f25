//! Logistic regression classifier read from a JSON coefficient file

use crate::feature_encoder::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::models::ChurnClassifier;
use crate::types::prediction::ChurnLabel;
use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// On-disk layout of a logistic model
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticArtifact {
    #[serde(default = "default_name")]
    pub name: String,
    /// Training column order, checked against the encoder when present
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Decision threshold on the churn probability
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_name() -> String {
    "logistic".to_string()
}

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression over the encoded feature vector
#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    name: String,
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    threshold: f64,
}

impl LogisticClassifier {
    pub fn new(
        name: impl Into<String>,
        coefficients: [f64; FEATURE_COUNT],
        intercept: f64,
        threshold: f64,
    ) -> Self {
        Self {
            name: name.into(),
            coefficients,
            intercept,
            threshold,
        }
    }

    /// Build a classifier from a parsed artifact, checking its shape
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self> {
        if let Some(names) = &artifact.feature_names {
            ensure!(
                names.iter().map(String::as_str).eq(FEATURE_NAMES.iter().copied()),
                "model {} was trained on features {:?}, encoder produces {:?}",
                artifact.name,
                names,
                FEATURE_NAMES
            );
        }

        let coefficients: [f64; FEATURE_COUNT] =
            artifact.coefficients.as_slice().try_into().map_err(|_| {
                anyhow::anyhow!(
                    "model {} has {} coefficients, expected {}",
                    artifact.name,
                    artifact.coefficients.len(),
                    FEATURE_COUNT
                )
            })?;

        ensure!(
            (0.0..=1.0).contains(&artifact.threshold),
            "model {} threshold {} is outside [0, 1]",
            artifact.name,
            artifact.threshold
        );

        Ok(Self::new(
            artifact.name,
            coefficients,
            artifact.intercept,
            artifact.threshold,
        ))
    }

    /// Load a model from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        let artifact: LogisticArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse model file {}", path.display()))?;
        Self::from_artifact(artifact)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn churn_probability(&self, features: &FeatureVector) -> f64 {
        let z = self
            .coefficients
            .iter()
            .zip(features.iter())
            .map(|(w, &x)| w * x as f64)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }
}

impl ChurnClassifier for LogisticClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<ChurnLabel> {
        let (label, _) = self.classify(features)?;
        Ok(label)
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64> {
        Ok(self.churn_probability(features))
    }

    fn classify(&self, features: &FeatureVector) -> Result<(ChurnLabel, f64)> {
        let probability = self.churn_probability(features);
        let label = if probability >= self.threshold {
            ChurnLabel::Churn
        } else {
            ChurnLabel::NoChurn
        };
        Ok((label, probability))
    }
}
