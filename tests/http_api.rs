//! End-to-end tests of the HTTP surface, driven through the router in-process

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use churn_prediction::feature_encoder::FeatureVector;
use churn_prediction::metrics::ServiceMetrics;
use churn_prediction::models::{ChurnClassifier, ChurnPredictor, LogisticClassifier};
use churn_prediction::types::prediction::ChurnLabel;
use churn_prediction::web::{self, AppState};
use http_body_util::BodyExt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower::ServiceExt;

const EXAMPLE_FORM: &str = "SeniorCitizen=Yes&Partner=No&Dependents=No&tenure=12\
    &OnlineSecurity=No&TechSupport=No&Contract=Month-to-month&PaperlessBilling=Yes\
    &MonthlyCharges=70.5&TotalCharges=846.0";

const EXAMPLE_JSON: &str = r#"{
    "SeniorCitizen": "Yes", "Partner": "No", "Dependents": "No", "tenure": 12,
    "OnlineSecurity": "No", "TechSupport": "No", "Contract": "Month-to-month",
    "PaperlessBilling": "Yes", "MonthlyCharges": 70.5, "TotalCharges": 846.0
}"#;

struct FixedClassifier {
    label: ChurnLabel,
    probability: f64,
}

impl ChurnClassifier for FixedClassifier {
    fn name(&self) -> &str {
        "fixed"
    }

    fn predict(&self, _features: &FeatureVector) -> Result<ChurnLabel> {
        Ok(self.label)
    }

    fn predict_probability(&self, _features: &FeatureVector) -> Result<f64> {
        Ok(self.probability)
    }
}

struct BrokenClassifier;

impl ChurnClassifier for BrokenClassifier {
    fn name(&self) -> &str {
        "broken"
    }

    fn predict(&self, _features: &FeatureVector) -> Result<ChurnLabel> {
        anyhow::bail!("session unavailable")
    }

    fn predict_probability(&self, _features: &FeatureVector) -> Result<f64> {
        anyhow::bail!("session unavailable")
    }
}

fn app_with(classifier: Arc<dyn ChurnClassifier>) -> (Router, Arc<ServiceMetrics>) {
    let metrics = Arc::new(ServiceMetrics::new());
    let predictor = Arc::new(ChurnPredictor::new(classifier));
    (web::router(AppState::new(predictor, metrics.clone())), metrics)
}

fn churn_app() -> (Router, Arc<ServiceMetrics>) {
    app_with(Arc::new(FixedClassifier {
        label: ChurnLabel::Churn,
        probability: 0.73,
    }))
}

fn form_request(body: &str) -> Request<Body> {
    Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(body: &str) -> Request<Body> {
    Request::post("/api/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_renders_empty_form() {
    let (app, _) = churn_app();

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Customer Churn Prediction"));
    assert!(html.contains("name=\"Contract\""));
    assert!(html.contains("Predict Churn"));
    assert!(!html.contains("Probability:"));
}

#[tokio::test]
async fn form_submission_shows_churn_verdict() {
    let (app, metrics) = churn_app();

    let response = app.oneshot(form_request(EXAMPLE_FORM)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Customer is likely to churn (Probability: 0.73)"));
    // Submitted answers stay selected
    assert!(html.contains("value=\"12\""));
    assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.churn_predicted.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn form_submission_shows_no_churn_verdict() {
    let (app, _) = app_with(Arc::new(FixedClassifier {
        label: ChurnLabel::NoChurn,
        probability: 0.12,
    }));

    let response = app.oneshot(form_request(EXAMPLE_FORM)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("Customer is NOT likely to churn (Probability: 0.12)"));
}

#[tokio::test]
async fn form_rejects_unknown_option() {
    let (app, metrics) = churn_app();
    let body = EXAMPLE_FORM.replace("Contract=Month-to-month", "Contract=Weekly");

    let response = app.oneshot(form_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("Invalid input: Contract: unknown option &quot;Weekly&quot;"));
    assert_eq!(metrics.inputs_rejected.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn rejected_form_keeps_valid_answers() {
    let (app, _) = churn_app();
    let body = EXAMPLE_FORM
        .replace("Contract=Month-to-month", "Contract=Weekly")
        .replace("&TechSupport=No", "");

    let response = app.oneshot(form_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("TechSupport is missing"));
    assert!(html.contains("Contract: unknown option"));
    // Fields that parsed are shown as submitted, not reset
    assert!(html.contains("value=\"12\""));
    assert!(html.contains("value=\"70.50\""));
    assert!(html.contains("value=\"846.00\""));
}

#[tokio::test]
async fn form_rejects_negative_tenure() {
    let (app, _) = churn_app();
    let body = EXAMPLE_FORM.replace("tenure=12", "tenure=-1");

    let response = app.oneshot(form_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("tenure: &quot;-1&quot; is not a valid number"));
}

#[tokio::test]
async fn form_rejects_negative_charges() {
    let (app, metrics) = churn_app();
    let body = EXAMPLE_FORM.replace("MonthlyCharges=70.5", "MonthlyCharges=-70.5");

    let response = app.oneshot(form_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("MonthlyCharges"));
    assert_eq!(metrics.inputs_rejected.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn form_rejects_charges_beyond_f32() {
    let (app, metrics) = churn_app();
    let body = EXAMPLE_FORM.replace("TotalCharges=846.0", "TotalCharges=1e39");

    let response = app.oneshot(form_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("TotalCharges must be a finite, non-negative number"));
    assert_eq!(metrics.inputs_rejected.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.predictions_served.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn json_rejects_charges_beyond_f32() {
    let (app, _) = churn_app();
    let body = EXAMPLE_JSON.replace("\"MonthlyCharges\": 70.5", "\"MonthlyCharges\": 1e39");

    let response = app.oneshot(json_request(&body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn json_prediction() {
    let (app, _) = churn_app();

    let response = app.oneshot(json_request(EXAMPLE_JSON)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["label"], "churn");
    assert_eq!(body["churn"], true);
    assert_eq!(body["verdict"], "likely to churn");
    assert_eq!(body["probability_display"], "0.73");
    assert_eq!(body["model"], "fixed");
    assert_eq!(
        body["features"],
        serde_json::json!([1.0, 0.0, 0.0, 12.0, 0.0, 0.0, 0.0, 1.0, 70.5, 846.0])
    );
}

#[tokio::test]
async fn json_rejects_missing_field() {
    let (app, _) = churn_app();
    let body = r#"{"SeniorCitizen": "Yes"}"#;

    let response = app.oneshot(json_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("invalid input"));
}

#[tokio::test]
async fn classifier_failure_is_a_server_error() {
    let (app, metrics) = app_with(Arc::new(BrokenClassifier));

    let response = app.oneshot(json_request(EXAMPLE_JSON)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("session unavailable"));
    assert_eq!(metrics.prediction_failures.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn logistic_model_end_to_end() {
    let mut coefficients = [0.0; 10];
    coefficients[6] = -1.5; // longer contracts churn less
    coefficients[7] = 0.5;
    let classifier = LogisticClassifier::new("logistic_test", coefficients, 0.2, 0.5);
    let (app, _) = app_with(Arc::new(classifier));

    let response = app.oneshot(json_request(EXAMPLE_JSON)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    // sigmoid(0.2 + 0.5) ≈ 0.67
    assert_eq!(body["label"], "churn");
    assert_eq!(body["probability_display"], "0.67");
}

#[tokio::test]
async fn health_and_stats() {
    let (app, _) = churn_app();

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["features"].as_array().unwrap().len(), 10);

    app.clone().oneshot(json_request(EXAMPLE_JSON)).await.unwrap();

    let response = app
        .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["predictions_served"], 1);
    assert_eq!(body["churn_predicted"], 1);
}
