//! Cloudinary-backed metadata storage
//!
//! Two independent durable writes per upload: the image first, then the
//! JSON metadata document referencing the image's URL. The writes are
//! not transactional — a failed document write can leave an orphaned
//! image object behind, and no cleanup or retry happens here.

use async_trait::async_trait;
use launchpad_sdk::{
    detect_image_format, LaunchpadError, LaunchpadResult, MetadataDocument, MetadataUploader,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::StorageConfig;

pub struct CloudinaryStorage {
    http: reqwest::Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
    folder: String,
}

#[derive(Deserialize)]
struct UploadResult {
    secure_url: String,
}

impl CloudinaryStorage {
    pub fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
            folder: config.folder.clone(),
        })
    }

    fn endpoint(&self, resource_type: &str) -> String {
        format!(
            "{}/{}/{}/upload",
            self.base_url, self.cloud_name, resource_type
        )
    }

    async fn upload_object(
        &self,
        resource_type: &str,
        part: Part,
        public_id: Option<String>,
    ) -> LaunchpadResult<String> {
        let mut form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone());
        if let Some(id) = public_id {
            form = form.text("public_id", id);
        }

        let response = self
            .http
            .post(self.endpoint(resource_type))
            .multipart(form)
            .send()
            .await
            .map_err(|e| LaunchpadError::UploadFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LaunchpadError::UploadFailed(format!(
                "storage service returned {status}"
            )));
        }
        let result: UploadResult = response
            .json()
            .await
            .map_err(|e| LaunchpadError::UploadFailed(e.to_string()))?;
        Ok(result.secure_url)
    }
}

#[async_trait]
impl MetadataUploader for CloudinaryStorage {
    async fn upload(
        &self,
        image: &[u8],
        name: &str,
        symbol: &str,
        description: &str,
    ) -> LaunchpadResult<String> {
        if name.trim().is_empty() || symbol.trim().is_empty() || description.trim().is_empty() {
            return Err(LaunchpadError::Validation(
                "name, symbol and description are required".to_string(),
            ));
        }
        if image.is_empty() {
            return Err(LaunchpadError::Validation("image is required".to_string()));
        }
        let extension = detect_image_format(image).ok_or_else(|| {
            LaunchpadError::Validation("image must be png or jpeg".to_string())
        })?;

        // Image write must land before the document that references it.
        let image_url = self
            .upload_object(
                "image",
                Part::bytes(image.to_vec()).file_name(format!("token.{extension}")),
                None,
            )
            .await?;
        debug!(%image_url, "image uploaded");

        let document = MetadataDocument {
            name: name.to_string(),
            symbol: symbol.to_string(),
            image: image_url,
            description: description.to_string(),
        };
        let json = serde_json::to_vec(&document)
            .map_err(|e| LaunchpadError::Serialization(e.to_string()))?;

        // Uniquely timestamped path: uploads never contend for a key, so
        // the store needs no locking.
        let public_id = format!("metadata_{}.json", chrono::Utc::now().timestamp_millis());
        let metadata_url = self
            .upload_object("raw", Part::bytes(json).file_name(public_id.clone()), Some(public_id))
            .await?;
        info!(%metadata_url, "metadata document uploaded");
        Ok(metadata_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> CloudinaryStorage {
        CloudinaryStorage::new(&StorageConfig::default()).unwrap()
    }

    #[test]
    fn endpoint_is_namespaced_by_cloud_and_resource_type() {
        let storage = storage();
        assert_eq!(
            storage.endpoint("image"),
            "https://api.cloudinary.com/v1_1/demo/image/upload"
        );
        assert_eq!(
            storage.endpoint("raw"),
            "https://api.cloudinary.com/v1_1/demo/raw/upload"
        );
    }

    #[tokio::test]
    async fn empty_fields_are_rejected_before_any_write() {
        let storage = storage();
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let err = storage.upload(&png, "", "CN", "desc").await.unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));

        let err = storage.upload(&[], "Coin", "CN", "desc").await.unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));

        let err = storage
            .upload(b"not an image", "Coin", "CN", "desc")
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));
    }
}
