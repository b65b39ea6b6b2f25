//! Route handlers

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::feature_encoder::FeatureVector;
use crate::metrics::MetricsSnapshot;
use crate::models::PredictionResult;
use crate::types::customer::CustomerRecord;
use crate::types::prediction::ChurnLabel;
use crate::web::error::ServiceError;
use crate::web::page::{render_page, Outcome};
use crate::web::AppState;

/// JSON body returned by `POST /api/predict`
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub request_id: String,
    pub label: ChurnLabel,
    pub churn: bool,
    pub verdict: String,
    pub probability: f64,
    pub probability_display: String,
    pub message: String,
    pub model: String,
    pub features: FeatureVector,
    pub timestamp: DateTime<Utc>,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        let verdict = result.verdict();
        Self {
            request_id: result.request_id,
            label: result.label,
            churn: result.label.is_churn(),
            message: verdict.message(),
            verdict: verdict.verdict,
            probability: result.probability,
            probability_display: verdict.probability_display,
            model: result.model,
            features: result.features,
            timestamp: result.timestamp,
        }
    }
}

impl AppState {
    /// Validate, predict and account for one record
    fn run_prediction(&self, record: &CustomerRecord) -> Result<PredictionResult, ServiceError> {
        if let Err(e) = record.validate() {
            self.metrics.record_rejection();
            warn!(error = %e, "Rejected customer record");
            return Err(e.into());
        }

        let start_time = Instant::now();
        match self.predictor.predict(record) {
            Ok(result) => {
                let processing_time = start_time.elapsed();
                self.metrics
                    .record_prediction(processing_time, result.label, result.probability);
                info!(
                    request_id = %result.request_id,
                    label = %result.label,
                    probability = result.probability,
                    processing_time_us = processing_time.as_micros(),
                    "Churn prediction served"
                );
                Ok(result)
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(model = %self.predictor.model_name(), error = ?e, "Inference failed");
                Err(e.into())
            }
        }
    }
}

/// `GET /`: empty form
pub async fn index() -> Html<String> {
    Html(render_page(&CustomerRecord::default(), None))
}

/// `POST /predict`: form submission, answered with the page and its verdict
pub async fn predict_form(
    State(state): State<AppState>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let (record, errors) = match form {
        Ok(Form(fields)) => CustomerRecord::from_form_fields(&fields),
        Err(rejection) => {
            state.metrics.record_rejection();
            let message = rejection.body_text();
            warn!(error = %message, "Rejected form submission");
            let outcome = Outcome::Error(format!("Invalid input: {}", message));
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_page(&CustomerRecord::default(), Some(&outcome))),
            )
                .into_response();
        }
    };

    if !errors.is_empty() {
        state.metrics.record_rejection();
        let message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        warn!(error = %message, "Rejected form submission");
        let outcome = Outcome::Error(format!("Invalid input: {}", message));
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(render_page(&record, Some(&outcome))),
        )
            .into_response();
    }

    match state.run_prediction(&record) {
        Ok(result) => {
            let outcome = Outcome::Verdict(result.verdict());
            Html(render_page(&record, Some(&outcome))).into_response()
        }
        Err(e) => {
            let outcome = Outcome::Error(e.to_string());
            (e.status(), Html(render_page(&record, Some(&outcome)))).into_response()
        }
    }
}

/// `POST /api/predict`: JSON record in, JSON prediction out
pub async fn predict_json(
    State(state): State<AppState>,
    payload: Result<Json<CustomerRecord>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ServiceError> {
    let Json(record) = payload.map_err(|rejection| {
        state.metrics.record_rejection();
        warn!(error = %rejection.body_text(), "Rejected JSON record");
        ServiceError::InvalidInput(rejection.body_text())
    })?;

    let result = state.run_prediction(&record)?;
    Ok(Json(result.into()))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model": state.predictor.model_name(),
        "features": state.predictor.encoder().feature_names(),
    }))
}

/// `GET /stats`
pub async fn stats(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
