//! HTTP surface: the prediction form, a JSON API and service endpoints

pub mod error;
pub mod handlers;
pub mod page;

pub use error::ServiceError;
pub use handlers::PredictionResponse;

use crate::metrics::ServiceMetrics;
use crate::models::ChurnPredictor;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<ChurnPredictor>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(predictor: Arc<ChurnPredictor>, metrics: Arc<ServiceMetrics>) -> Self {
        Self { predictor, metrics }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict_form))
        .route("/api/predict", post(handlers::predict_json))
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
