//! ONNX Runtime churn classifier.
//!
//! Expects a graph exported from a scikit-learn style classifier: one float
//! input of shape `[batch, 10]`, a label output (`int64`) and a probability
//! output that is either a `[batch, classes]` tensor or the zipmap form
//! `seq(map(int64, float))`.

use crate::feature_encoder::FeatureVector;
use crate::models::ChurnClassifier;
use crate::types::prediction::ChurnLabel;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Churn classifier backed by an ONNX Runtime session
pub struct OnnxClassifier {
    name: String,
    /// Running a session needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    probability_output: String,
}

impl OnnxClassifier {
    /// Load a classifier graph from file
    pub fn load<P: AsRef<Path>>(path: P, name: &str, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {}", path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone())
            .with_context(|| format!("Model {} has no label output", name))?;

        let probability_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .or_else(|| session.outputs.iter().find(|o| o.name != label_output))
            .map(|o| o.name.clone())
            .with_context(|| format!("Model {} has no probability output", name))?;

        info!(
            model = %name,
            input = %input_name,
            label = %label_output,
            probability = %probability_output,
            "Model loaded successfully"
        );

        Ok(Self {
            name: name.to_string(),
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        })
    }

    /// Run the graph once and read both outputs
    fn run(&self, features: &FeatureVector) -> Result<(ChurnLabel, f64)> {
        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, features.to_vec())).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        let label = self.extract_label(&outputs)?;
        let probability = self.extract_probability(&outputs)?;

        debug!(model = %self.name, label = %label, probability = probability, "ONNX inference complete");

        Ok((label, probability))
    }

    fn extract_label(&self, outputs: &SessionOutputs) -> Result<ChurnLabel> {
        let output = outputs
            .get(self.label_output.as_str())
            .with_context(|| format!("Missing output {}", self.label_output))?;

        let (_, data) = output
            .try_extract_tensor::<i64>()
            .context("Label output is not an int64 tensor")?;

        let class = data
            .first()
            .copied()
            .context("Label output is empty")?;

        ChurnLabel::from_class(class)
    }

    /// Extract churn probability from model output.
    /// Handles both tensor outputs and seq(map) outputs (zipmap)
    fn extract_probability(&self, outputs: &SessionOutputs) -> Result<f64> {
        let output = outputs
            .get(self.probability_output.as_str())
            .with_context(|| format!("Missing output {}", self.probability_output))?;

        let dtype = output.dtype();

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return churn_prob_from_tensor(&dims, data);
        }

        if DynSequenceValueType::can_downcast(&dtype) {
            return self.extract_from_sequence_map(output);
        }

        anyhow::bail!(
            "Unsupported probability output type for model {}: {:?}",
            self.name,
            dtype
        )
    }

    /// Extract probability from seq(map(int64, float)) format
    fn extract_from_sequence_map(&self, output: &DynValue) -> Result<f64> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

        // Only batch_size=1 is ever submitted
        let map_value = maps.first().context("Empty probability sequence")?;
        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        churn_prob_from_pairs(&kv_pairs)
    }
}

/// Churn class probability from a `[batch, classes]` or `[classes]` tensor
fn churn_prob_from_tensor(dims: &[i64], data: &[f32]) -> Result<f64> {
    let classes = dims.last().copied().unwrap_or(0);
    match classes {
        c if c >= 2 => data
            .get(1)
            .map(|&p| p as f64)
            .context("Probability tensor is empty"),
        // Single column holds the positive class
        1 => data
            .first()
            .map(|&p| p as f64)
            .context("Probability tensor is empty"),
        _ => anyhow::bail!("Unexpected probability tensor shape {:?}", dims),
    }
}

/// Churn class probability from zipmap `(class, probability)` pairs
fn churn_prob_from_pairs(pairs: &[(i64, f32)]) -> Result<f64> {
    if let Some((_, p)) = pairs.iter().find(|(class, _)| *class == 1) {
        return Ok(*p as f64);
    }
    if let Some((_, p)) = pairs.iter().find(|(class, _)| *class == 0) {
        return Ok(1.0 - *p as f64);
    }
    anyhow::bail!("No class probability found in map")
}

impl ChurnClassifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<ChurnLabel> {
        self.run(features).map(|(label, _)| label)
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64> {
        self.run(features).map(|(_, probability)| probability)
    }

    fn classify(&self, features: &FeatureVector) -> Result<(ChurnLabel, f64)> {
        self.run(features)
    }
}
