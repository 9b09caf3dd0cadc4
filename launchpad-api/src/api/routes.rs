//! API route definitions

use super::{handlers::*, token_builder::*, ApiState};
use axum::{routing::post, Router};

/// Create upload-relay routes
pub fn create_upload_routes() -> Router<ApiState> {
    Router::new().route("/api/upload", post(upload_metadata))
}

/// Create token transaction-build routes
pub fn create_token_routes() -> Router<ApiState> {
    Router::new().route("/api/tokens/build", post(build_token_transaction))
}
