//! Classifier artifact loader

use crate::config::{ModelConfig, ModelKind};
use crate::models::{ChurnClassifier, LogisticClassifier, OnnxClassifier};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Loader for pre-trained churn classifiers
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier described by the model configuration
    pub fn load(&self, config: &ModelConfig) -> Result<Arc<dyn ChurnClassifier>> {
        self.load_model(&config.path, config.kind)
    }

    /// Load a single classifier artifact from file
    pub fn load_model<P: AsRef<Path>>(
        &self,
        path: P,
        kind: ModelKind,
    ) -> Result<Arc<dyn ChurnClassifier>> {
        let path = path.as_ref();

        if !path.exists() {
            anyhow::bail!("Model file not found: {}", path.display());
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("churn_model");

        let classifier: Arc<dyn ChurnClassifier> = match kind {
            ModelKind::Onnx => Arc::new(OnnxClassifier::load(path, name, self.onnx_threads)?),
            ModelKind::Logistic => Arc::new(
                LogisticClassifier::from_file(path)
                    .with_context(|| format!("Failed to load logistic model {}", name))?,
            ),
        };

        info!(
            model = %classifier.name(),
            kind = ?kind,
            path = %path.display(),
            "Classifier ready"
        );

        Ok(classifier)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
