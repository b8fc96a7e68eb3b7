pub mod handlers;
pub mod middleware;
pub mod ui;

use crate::classifier::{Classify, TrashClassifier};
use crate::store::{CounterStore, FirestoreCounterStore, MemoryCounterStore, StoreCredentials};
use crate::{Config, Result};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

/// Everything a request handler needs, constructed once at startup and
/// passed through axum state. No ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub classifier: Arc<dyn Classify>,
    pub store: Arc<dyn CounterStore>,
}

pub async fn serve(config: Config) -> Result<()> {
    // Fatal if the model artifact or credential file is missing
    let classifier: Arc<dyn Classify> = Arc::new(TrashClassifier::new(&config)?);

    let store: Arc<dyn CounterStore> = if config.offline {
        tracing::warn!("Offline mode: counters are in-process and not persisted");
        Arc::new(MemoryCounterStore::new())
    } else {
        let credentials = StoreCredentials::load(&config.credentials_path)?;
        tracing::info!("Counter store: Firestore project '{}'", credentials.project_id);
        Arc::new(FirestoreCounterStore::new(credentials))
    };

    let state = AppState {
        config: config.clone(),
        classifier,
        store,
    };

    let app = create_app(state, &config);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .map_err(|e| crate::ServiceError::Config(format!(
            "Invalid bind address {}: {}",
            config.bind_addr, e
        )))?;

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /                     - Web UI");
    tracing::info!("  POST /api/classify         - Multipart file upload");
    tracing::info!("  POST /api/classify/base64  - JSON base64 upload");
    tracing::info!("  GET  /api/stats            - Aggregate counters");
    tracing::info!("  GET  /health               - Health check");
    tracing::info!("  GET  /api/info             - Service information");

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        crate::ServiceError::Internal(format!("Failed to bind to address {}: {}", addr, e))
    })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::ServiceError::Internal(format!("Server failed: {}", e)))?;

    Ok(())
}

fn create_app(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/api/classify", post(handlers::classify_upload_handler))
        .route("/api/classify/base64", post(handlers::classify_base64_handler))
        .route("/api/stats", get(handlers::stats_handler))
        .route("/", get(ui::index_handler))
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler))
        .layer(axum::middleware::from_fn(middleware::request_logging))
        .layer(RequestBodyLimitLayer::new(config.server_config.max_request_size))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server_config.request_timeout,
        )))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Service information endpoint
async fn info_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let categories: Vec<&str> = crate::Category::ALL.iter().map(|c| c.name()).collect();
    Json(json!({
        "service": "Waste Classification Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "categories": categories,
        "store": if state.config.offline { "memory" } else { "firestore" },
        "model": state.config.model_path.display().to_string(),
    }))
}
