//! Metadata upload boundary and packed-size computation

use async_trait::async_trait;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use spl_pod::optional_keys::OptionalNonZeroPubkey;
use spl_token_metadata_interface::state::TokenMetadata;
use std::time::Duration;

use crate::error::{LaunchpadError, LaunchpadResult};

/// Uploads an image plus a JSON metadata document to durable object
/// storage and returns the document's URL.
///
/// The two writes are independent and non-transactional: an image upload
/// failure aborts before the JSON write, and a JSON write failure may
/// leave an orphaned image object behind. No retries are performed here;
/// the caller decides whether to retry the whole operation.
#[async_trait]
pub trait MetadataUploader: Send + Sync {
    async fn upload(
        &self,
        image: &[u8],
        name: &str,
        symbol: &str,
        description: &str,
    ) -> LaunchpadResult<String>;
}

/// Size of the TLV entry the metadata record occupies on the mint:
/// type tag + length prefix + packed `{update_authority, mint, name,
/// symbol, uri, additional_metadata: []}`. Added to the mint account
/// size when computing rent exemption.
pub fn packed_metadata_len(
    mint: &Pubkey,
    name: &str,
    symbol: &str,
    uri: &str,
    update_authority: Option<Pubkey>,
) -> LaunchpadResult<usize> {
    let metadata = TokenMetadata {
        update_authority: OptionalNonZeroPubkey::try_from(update_authority)
            .map_err(|e| LaunchpadError::Serialization(e.to_string()))?,
        mint: *mint,
        name: name.to_string(),
        symbol: symbol.to_string(),
        uri: uri.to_string(),
        additional_metadata: vec![],
    };
    metadata
        .tlv_size_of()
        .map_err(|e| LaunchpadError::Serialization(e.to_string()))
}

/// Accepted image encodings, recognized by magic bytes.
pub fn detect_image_format(image: &[u8]) -> Option<&'static str> {
    if image.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("png")
    } else if image.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else {
        None
    }
}

/// Uploader that relays through a running launchpad-api instance
/// (`POST /api/upload`, multipart), the way the reference front end
/// posted to its own upload route.
pub struct HttpUploader {
    endpoint: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    metadata_url: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> LaunchpadResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LaunchpadError::UploadFailed(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }
}

#[async_trait]
impl MetadataUploader for HttpUploader {
    async fn upload(
        &self,
        image: &[u8],
        name: &str,
        symbol: &str,
        description: &str,
    ) -> LaunchpadResult<String> {
        if image.is_empty() {
            return Err(LaunchpadError::Validation("image is required".to_string()));
        }
        let extension = detect_image_format(image).ok_or_else(|| {
            LaunchpadError::Validation("image must be png or jpeg".to_string())
        })?;
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(image.to_vec())
                    .file_name(format!("token.{extension}")),
            )
            .text("name", name.to_string())
            .text("symbol", symbol.to_string())
            .text("description", description.to_string());

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LaunchpadError::UploadFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(LaunchpadError::UploadFailed(format!(
                "upload endpoint returned {}",
                response.status()
            )));
        }
        let body: RelayResponse = response
            .json()
            .await
            .map_err(|e| LaunchpadError::UploadFailed(e.to_string()))?;
        Ok(body.metadata_url)
    }
}
