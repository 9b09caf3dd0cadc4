//! API request handlers

use super::{responses::*, ApiState};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use launchpad_sdk::LaunchpadError;
use tracing::error;

/// Relay a token image and descriptive fields to durable storage.
///
/// Multipart fields: `file` (binary), `name`, `symbol`, `description`.
/// Responds 200 with the metadata document URL, 400 when a field is
/// missing or malformed, 500 on upstream storage failure.
pub async fn upload_metadata(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut file: Option<Vec<u8>> = None;
    let mut name: Option<String> = None;
    let mut symbol: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.to_string()))?
    {
        match field.name() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(e.to_string()))?;
                file = Some(bytes.to_vec());
            }
            Some("name") => name = Some(field.text().await.map_err(|e| bad_request(e.to_string()))?),
            Some("symbol") => {
                symbol = Some(field.text().await.map_err(|e| bad_request(e.to_string()))?)
            }
            Some("description") => {
                description = Some(field.text().await.map_err(|e| bad_request(e.to_string()))?)
            }
            _ => {}
        }
    }

    let (Some(file), Some(name), Some(symbol), Some(description)) =
        (file, name, symbol, description)
    else {
        return Err(bad_request("Missing required fields"));
    };

    match state
        .uploader
        .upload(&file, &name, &symbol, &description)
        .await
    {
        Ok(metadata_url) => Ok(Json(UploadResponse {
            message: "Metadata uploaded successfully".to_string(),
            metadata_url,
        })),
        Err(LaunchpadError::Validation(message)) => Err(bad_request(message)),
        Err(e) => {
            error!("upload failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error uploading file")),
            ))
        }
    }
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{multipart_request, test_app, PNG_HEADER};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn upload_returns_metadata_url() {
        let app = test_app(false);
        let request = multipart_request(
            "/api/upload",
            &[
                ("file", PNG_HEADER),
                ("name", b"Coin"),
                ("symbol", b"CN"),
                ("description", b"A test token"),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json["metadataUrl"],
            "https://store/tokens/metadata_1.json"
        );
        assert_eq!(json["message"], "Metadata uploaded successfully");
    }

    #[tokio::test]
    async fn missing_field_is_a_400() {
        let app = test_app(false);
        let request = multipart_request(
            "/api/upload",
            &[("name", b"Coin"), ("symbol", b"CN")],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_500() {
        let app = test_app(true);
        let request = multipart_request(
            "/api/upload",
            &[
                ("file", PNG_HEADER),
                ("name", b"Coin"),
                ("symbol", b"CN"),
                ("description", b"A test token"),
            ],
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
