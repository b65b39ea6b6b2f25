//! Feature encoding for churn model inference.
//!
//! Turns a customer record into the numeric vector the classifier was
//! trained on. Column order and category codes must match training.

use crate::types::customer::CustomerRecord;

/// Number of features the classifier expects
pub const FEATURE_COUNT: usize = 10;

/// Encoded model input, fixed to the trained shape
pub type FeatureVector = [f32; FEATURE_COUNT];

/// Training column names, in vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "tenure",
    "OnlineSecurity",
    "TechSupport",
    "Contract",
    "PaperlessBilling",
    "MonthlyCharges",
    "TotalCharges",
];

/// Feature encoder that transforms customer records into model input features.
///
/// Binary answers become 0/1, the contract class becomes 0/1/2 and the
/// numeric fields pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Create a new feature encoder.
    pub fn new() -> Self {
        Self
    }

    /// Encode a customer record.
    pub fn encode(&self, record: &CustomerRecord) -> FeatureVector {
        [
            record.senior_citizen.code(),
            record.partner.code(),
            record.dependents.code(),
            record.tenure_months as f32,
            record.online_security.code(),
            record.tech_support.code(),
            record.contract.code(),
            record.paperless_billing.code(),
            record.monthly_charges as f32,
            record.total_charges as f32,
        ]
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names (matching training order).
    pub fn feature_names(&self) -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }
}
