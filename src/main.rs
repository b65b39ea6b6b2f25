//! Churn Prediction Service - Main Entry Point
//!
//! Loads the pre-trained classifier once, then serves the prediction form
//! and JSON API over HTTP until interrupted.

use anyhow::{Context, Result};
use churn_prediction::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    metrics::{MetricsReporter, ServiceMetrics},
    models::{ChurnPredictor, ModelLoader},
    web::{self, AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load_from_path(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting Churn Prediction Service");
    info!(path = %config_path, "Configuration loaded successfully");

    // Load the classifier once; it is shared read-only from here on
    let loader = ModelLoader::with_threads(config.model.onnx_threads);
    let classifier = loader.load(&config.model)?;
    let predictor = Arc::new(ChurnPredictor::new(classifier));
    info!(
        model = %predictor.model_name(),
        features = predictor.encoder().feature_count(),
        "Predictor initialized"
    );

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let app = web::router(AppState::new(predictor, metrics.clone()));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Serving churn prediction form");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    // Print final summary
    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("churn_prediction={}", logging.level).parse()?)
        .add_directive(format!("tower_http={}", logging.level).parse()?);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format.as_str() {
        "json" => builder.json().init(),
        "pretty" => builder.pretty().init(),
        _ => builder.init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
