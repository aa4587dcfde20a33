//! Threadline Media Service
//!
//! Stores chat attachments in object storage and hands back a URL:
//! - Cloudinary signed uploads for production
//! - Mock media storage for testing and development
//!
//! The chat pipeline never touches file bytes; it only ever receives the
//! returned URL as an opaque attachment reference.

pub mod cloudinary;
pub mod mock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Media configuration error: {0}")]
    Configuration(String),

    #[error("Media validation error: {0}")]
    Validation(String),

    #[error("Media request error: {0}")]
    Request(String),

    #[error("Media response error: {0}")]
    Response(String),
}

/// A file to store
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn validate(&self) -> Result<(), MediaError> {
        if self.bytes.is_empty() {
            return Err(MediaError::Validation("Uploaded file is empty".to_string()));
        }
        Ok(())
    }
}

/// Where a stored file ended up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub url: String,
    pub filename: String,
    pub size_bytes: u64,
}

/// Media storage configuration
#[derive(Clone)]
pub struct MediaConfig {
    /// Storage provider (cloudinary, mock)
    pub provider: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Override for the Cloudinary API base URL
    pub base_url: Option<String>,
}

impl std::fmt::Debug for MediaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaConfig")
            .field("provider", &self.provider)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"[REDACTED]")
            .field("api_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MediaConfig {
    /// Create media config from environment variables
    pub fn from_env() -> Result<Self, MediaError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("MEDIA_PROVIDER").unwrap_or_else(|_| "mock".to_string());
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default();
        let api_key = std::env::var("CLOUDINARY_API_KEY").unwrap_or_default();
        let api_secret = std::env::var("CLOUDINARY_API_SECRET").unwrap_or_default();
        let base_url = std::env::var("CLOUDINARY_BASE_URL")
            .ok()
            .filter(|u| !u.is_empty());

        let config = Self {
            provider,
            cloud_name,
            api_key,
            api_secret,
            base_url,
        };
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), MediaError> {
        if self.provider == "cloudinary"
            && (self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty())
        {
            return Err(MediaError::Configuration(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET are required"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Media storage trait for different backends
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store a file and return its public URL
    async fn upload(&self, upload: MediaUpload) -> Result<UploadedMedia, MediaError>;
}

/// Factory for creating MediaStorage implementations
pub struct MediaStorageFactory;

impl MediaStorageFactory {
    pub fn create(config: MediaConfig) -> Result<Box<dyn MediaStorage>, MediaError> {
        config.check()?;
        match config.provider.as_str() {
            "cloudinary" => {
                tracing::info!(
                    cloud_name = %config.cloud_name,
                    "Creating Cloudinary media storage"
                );
                Ok(Box::new(cloudinary::CloudinaryStorage::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock media storage");
                Ok(Box::new(mock::MockMediaStorage::new()))
            }
            provider => Err(MediaError::Configuration(format!(
                "Unknown media provider: {}. Supported providers: cloudinary, mock",
                provider
            ))),
        }
    }
}
