//! Customer Churn Prediction Library
//!
//! Encodes customer attributes into the feature vector a pre-trained
//! classifier expects, runs the classifier and turns its output into a
//! verdict served from a single-page form.

pub mod config;
pub mod feature_encoder;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use feature_encoder::{FeatureEncoder, FeatureVector, FEATURE_COUNT};
pub use models::{ChurnClassifier, ChurnPredictor, ModelLoader, PredictionResult};
pub use types::{customer::CustomerRecord, prediction::Verdict};
