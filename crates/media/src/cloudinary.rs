//! Cloudinary Upload API Implementation
//!
//! Signed multipart upload to `{base_url}/v1_1/{cloud_name}/auto/upload`.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{MediaConfig, MediaError, MediaStorage, MediaUpload, UploadedMedia};

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    #[serde(default)]
    bytes: Option<u64>,
}

/// Sign upload parameters: sort by key, join as `k=v&k=v`, append the
/// secret, hex-encode the SHA-256 digest.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Cloudinary media storage
pub struct CloudinaryStorage {
    client: Client,
    config: MediaConfig,
    upload_url: String,
}

impl CloudinaryStorage {
    pub fn new(config: MediaConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let upload_url = format!(
            "{}/v1_1/{}/auto/upload",
            base_url.trim_end_matches('/'),
            config.cloud_name
        );

        Self {
            client: Client::new(),
            config,
            upload_url,
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError> {
        upload.validate()?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&[("timestamp", timestamp.clone())], &self.config.api_secret);
        let size = upload.bytes.len() as u64;

        let mut file = Part::bytes(upload.bytes).file_name(upload.filename.clone());
        if let Some(content_type) = &upload.content_type {
            file = file
                .mime_str(content_type)
                .map_err(|e| MediaError::Validation(format!("Invalid content type: {}", e)))?;
        }

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        tracing::debug!(filename = %upload.filename, size_bytes = size, "Uploading to Cloudinary");

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(MediaError::Response(format!(
                "Cloudinary API returned {}: {}",
                status, body
            )));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Response(format!("Failed to parse response: {}", e)))?;

        Ok(UploadedMedia {
            url: uploaded.secure_url,
            filename: upload.filename,
            size_bytes: uploaded.bytes.unwrap_or(size),
        })
    }
}
