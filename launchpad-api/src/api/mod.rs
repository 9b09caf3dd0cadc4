//! REST API for the token launchpad

mod handlers;
mod responses;
mod routes;
mod token_builder;

pub use routes::*;

use crate::config::ApiConfig;
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Router};
use launchpad_sdk::{MetadataUploader, NetworkReader};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Shared API state
#[derive(Clone)]
pub struct ApiState {
    pub uploader: Arc<dyn MetadataUploader>,
    pub network: Arc<dyn NetworkReader>,
    pub explorer_cluster: String,
}

impl ApiState {
    pub fn new(
        uploader: Arc<dyn MetadataUploader>,
        network: Arc<dyn NetworkReader>,
        explorer_cluster: impl Into<String>,
    ) -> Self {
        Self {
            uploader,
            network,
            explorer_cluster: explorer_cluster.into(),
        }
    }
}

/// Start the API server
pub async fn start_server(
    state: ApiState,
    config: &ApiConfig,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = create_app(state, config);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Create the main API application
pub fn create_app(state: ApiState, config: &ApiConfig) -> Router {
    let mut app = Router::new()
        .merge(create_upload_routes())
        .merge(create_token_routes())
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_size_mb * 1024 * 1024))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));
    if config.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}

/// Health check handler
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "service": "launchpad-api"
    }))
}
